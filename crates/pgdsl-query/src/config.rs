//! Render-time configuration.

#[cfg(feature = "tracing")]
use tracing::Level;

/// How [`SqlQb::build_with`](crate::SqlQb::build_with) reports what it built.
///
/// ```ignore
/// use pgdsl_query::RenderConfig;
///
/// let config = RenderConfig::new()
///     .max_sql_length(80)
///     .log_queries(true);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Event level for built statements.
    #[cfg(feature = "tracing")]
    pub log_level: Level,
    /// Truncate logged SQL (in bytes). `None` logs it whole.
    pub max_sql_length: Option<usize>,
    /// Emit an event for every built statement.
    pub log_queries: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "tracing")]
            log_level: Level::DEBUG,
            max_sql_length: Some(200),
            log_queries: true,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the event level.
    #[cfg(feature = "tracing")]
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log SQL without truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn log_queries(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// `sql`, cut to `max_sql_length` on a char boundary.
    pub(crate) fn truncate<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while end > 0 && !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_sql_length, Some(200));
        assert!(config.log_queries);
        #[cfg(feature = "tracing")]
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn truncates_on_char_boundary() {
        let config = RenderConfig::new().max_sql_length(2);
        assert_eq!(config.truncate("é1234"), "é...");
        assert_eq!(config.truncate("ab"), "ab");
        assert_eq!(RenderConfig::new().no_truncate().truncate("abcdef"), "abcdef");
    }
}

//! The rendering trait shared by conditions, selects and statement steps.

use crate::config::RenderConfig;
use crate::error::{DslError, DslResult};
use crate::param::ParamList;
use tokio_postgres::types::ToSql;

/// SQL text together with its bound parameters.
#[derive(Clone, Debug)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: ParamList,
}

impl BuiltQuery {
    /// Parameters as references compatible with tokio-postgres.
    ///
    /// ```ignore
    /// let built = stmt.build_checked()?;
    /// client.execute(&built.sql, &built.params_ref()).await?;
    /// ```
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }
}

/// Base trait for everything that renders to SQL.
pub trait SqlQb {
    /// Write SQL, appending bound values to `params` and numbering them from
    /// `params.len() + 1`.
    fn render(&self, params: &mut ParamList) -> String;

    /// Report the first deferred build error.
    fn validate(&self) -> DslResult<()>;

    /// Render with placeholders starting at `$1`.
    fn build(&self) -> BuiltQuery {
        self.build_with(&RenderConfig::default())
    }

    /// Render and report the result according to `config`.
    fn build_with(&self, config: &RenderConfig) -> BuiltQuery {
        let mut params = ParamList::new();
        let sql = self.render(&mut params);
        if config.log_queries {
            emit(config, &sql, params.len());
        }
        BuiltQuery { sql, params }
    }

    /// Validate, then build.
    fn build_checked(&self) -> DslResult<BuiltQuery> {
        self.validate()?;
        Ok(self.build())
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> String {
        self.render(&mut ParamList::new())
    }
}

/// `Err(Validation)` for the first error in `errors`.
pub(crate) fn first_error(errors: impl IntoIterator<Item = Option<String>>) -> DslResult<()> {
    match errors.into_iter().flatten().next() {
        Some(msg) => Err(DslError::validation(msg)),
        None => Ok(()),
    }
}

#[cfg(feature = "tracing")]
fn emit(config: &RenderConfig, sql: &str, param_count: usize) {
    use tracing::Level;

    /// Dispatch a tracing event at a runtime-determined level.
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                Level::ERROR => tracing::error!($($field)*),
                Level::WARN  => tracing::warn!($($field)*),
                Level::INFO  => tracing::info!($($field)*),
                Level::DEBUG => tracing::debug!($($field)*),
                Level::TRACE => tracing::trace!($($field)*),
            }
        };
    }

    let sql = config.truncate(sql);
    emit_at_level!(
        config.log_level,
        target: "pgdsl.sql",
        param_count,
        sql = %sql,
        "query built"
    );
}

#[cfg(not(feature = "tracing"))]
fn emit(_config: &RenderConfig, _sql: &str, _param_count: usize) {}

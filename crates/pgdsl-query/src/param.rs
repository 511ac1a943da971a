//! Bound parameter storage.

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A bound value shared between clones of a builder.
///
/// Steps are immutable and every `set` returns a new step, so values sit behind
/// an `Arc` and cloning a step never copies them.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any `ToSql` value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// The value as a tokio-postgres parameter.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `ToSql: Debug`, so the bound value itself is printable.
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Parameters collected while rendering, numbered from `$1`.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter and return its 1-based placeholder index.
    pub fn push(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter was bound.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the bound parameters in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// All parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_sql).collect()
    }
}

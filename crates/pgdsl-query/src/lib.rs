//! # pgdsl-query
//!
//! A typed fluent builder for PostgreSQL statements.
//!
//! ## Features
//!
//! - **Typed fields**: `Field<T>` only accepts `T`-typed operands (values, fields, subqueries)
//! - **Single-pass rendering**: `$n` placeholders are numbered while rendering, never rewritten
//! - **Step types**: INSERT / UPDATE / ON CONFLICT clauses can only be added in a valid order
//! - **Deferred errors**: builders never panic; `validate()` reports bad identifiers and shapes
//! - **Execution-free**: output is SQL plus `tokio_postgres` parameters
//!
//! ```ignore
//! use pgdsl_query::*;
//!
//! let users = Table::new("users")?;
//! let id = users.field::<i64>("id");
//! let status = users.field::<String>("status");
//!
//! let built = update(&users)
//!     .set(&status, "inactive")
//!     .where_(Condition::compare(&id, CompareOp::Eq, 42i64))
//!     .build_checked()?;
//!
//! client.execute(&built.sql, &built.params_ref()).await?;
//! ```

mod assign;
pub mod condition;
pub mod config;
pub mod error;
mod expr;
pub mod field;
pub mod func;
pub mod ident;
pub mod insert;
pub mod param;
pub mod query;
pub mod select;
pub mod update;

pub use condition::{
    BetweenKind, CompareOp, Condition, IntoCondition, TextMatch, bind, exists, false_condition,
    no_condition, not_exists, plain_sql, plain_sql_with, true_condition,
};
pub use config::RenderConfig;
pub use error::{DslError, DslResult};
pub use expr::Quantifier;
pub use field::{
    AnyField, Field, IntoOperand, Operand, SortField, SortOrder, Table, excluded, field,
    inline_sql, val,
};
pub use ident::{Ident, IdentPart, IntoIdent};
pub use insert::{
    InsertOnConflictStep, InsertOnDuplicateSetMoreStep, InsertOnDuplicateSetStep,
    InsertReturningStep, InsertSetMoreStep, InsertSetStep, insert_into,
};
pub use param::{Param, ParamList};
pub use query::{BuiltQuery, SqlQb};
pub use select::{
    Projection, QuantifiedSelect, Record, Record1, RecordSet, Select, all, any, select,
    select_fields,
};
pub use update::{
    UpdateConditionStep, UpdateReturningStep, UpdateSetMoreStep, UpdateSetStep, update,
};

//! # pgdsl
//!
//! Ergonomic sugar on top of the `pgdsl-query` statement builder.
//!
//! ## Features
//!
//! - **Condition guards**: turn optional filters into conditions or the neutral condition
//! - **Operator sugar**: `eq`/`lt`/`like`/`is_in(1..=5)`/`and`/`or` on fields and conditions
//! - **SET blocks**: fill INSERT rows, UPDATE and ON CONFLICT assignments in a closure
//!
//! Everything renders through the core builder, so the sugar and the plain API
//! produce identical SQL and parameters.
//!
//! ```ignore
//! use pgdsl::prelude::*;
//!
//! let users = Table::new("users")?;
//! let id = users.field::<i64>("id");
//! let name = users.field::<String>("name");
//! let age = users.field::<i32>("age");
//!
//! // SELECT with optional filters
//! let q = select(&id).from(&users).where_(
//!     name_filter
//!         .check_condition(|n| name.contains(n))
//!         .and(age.is_in(18..=65)),
//! );
//!
//! // INSERT with a SET block
//! let built = insert_into(&users)
//!     .values(|row| {
//!         row.to(&name, "alice");
//!         row.to(&age, 30)
//!     })
//!     .build_checked()?;
//!
//! client.execute(&built.sql, &built.params_ref()).await?;
//! ```

pub mod check;
pub mod ops;
pub mod prelude;
pub mod set;

pub use pgdsl_query::*;

pub use check::{OptionCheck, check_condition, check_condition_with};
pub use ops::{
    ConditionOps, FieldOps, InSource, Is, Progression, RangeStep, StringFieldOps, down_to,
};
pub use set::{
    InsertOnDuplicateSetContext, InsertSetContext, InsertValues, OnDuplicateSetBlock,
    UpdateSetBlock, UpdateSetContext,
};

//! Operator sugar on fields and conditions.
//!
//! Every method forwards to a single `pgdsl-query` operation. The two
//! exceptions are range membership (see [`progression`]) and `is(Is::Null)`.
//!
//! ```ignore
//! use pgdsl::prelude::*;
//!
//! let adults = age.ge(18).and(name.like("a%")).and(score.is_in(1..=5));
//! ```

mod condition;
mod field;
pub mod progression;

pub use condition::ConditionOps;
pub use field::{FieldOps, Is, StringFieldOps};
pub use progression::{InSource, Progression, ProgressionValue, RangeStep, down_to};

#[cfg(test)]
mod tests;

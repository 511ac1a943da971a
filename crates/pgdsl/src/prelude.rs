//! Convenient imports for typical `pgdsl` usage:
//!
//! ```ignore
//! use pgdsl::prelude::*;
//! ```

pub use pgdsl_query::{
    AnyField, BuiltQuery, Condition, DslError, DslResult, Field, IntoCondition, IntoOperand,
    Record1, RecordSet, RenderConfig, Select, SortField, SortOrder, SqlQb, Table, all, any,
    excluded, exists, false_condition, field, inline_sql, insert_into, no_condition, not_exists,
    plain_sql, plain_sql_with, select, select_fields, true_condition, update, val,
};

pub use crate::check::{OptionCheck, check_condition, check_condition_with};
pub use crate::ops::{
    ConditionOps, FieldOps, InSource, Is, Progression, RangeStep, StringFieldOps, down_to,
};
pub use crate::set::{InsertValues, OnDuplicateSetBlock, UpdateSetBlock};

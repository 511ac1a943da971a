//! Guards that turn optional input into a condition or the neutral condition.
//!
//! Optional filters can then be combined unconditionally:
//!
//! ```ignore
//! use pgdsl::prelude::*;
//!
//! let filter = name_param
//!     .check_condition(|n| name.like(n))
//!     .and(min_age.check_condition_if(|a| *a > 0, |a| age.ge(a)))
//!     .and(check_condition(only_active, active.eq(true)));
//! ```

use pgdsl_query::{Condition, no_condition};

/// Condition guards on `Option<T>`.
pub trait OptionCheck<T> {
    /// `f(x)` for `Some(x)`, the neutral condition for `None`.
    fn check_condition<F>(self, f: F) -> Condition
    where
        F: FnOnce(T) -> Condition;

    /// `f(x)` for `Some(x)` when `predicate(&x)` holds, the neutral condition
    /// otherwise.
    fn check_condition_if<P, F>(self, predicate: P, f: F) -> Condition
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(T) -> Condition;
}

impl<T> OptionCheck<T> for Option<T> {
    fn check_condition<F>(self, f: F) -> Condition
    where
        F: FnOnce(T) -> Condition,
    {
        match self {
            Some(value) => f(value),
            None => no_condition(),
        }
    }

    fn check_condition_if<P, F>(self, predicate: P, f: F) -> Condition
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(T) -> Condition,
    {
        match self {
            Some(value) if predicate(&value) => f(value),
            _ => no_condition(),
        }
    }
}

/// `condition` when `flag` is set, the neutral condition otherwise.
pub fn check_condition(flag: bool, condition: Condition) -> Condition {
    if flag { condition } else { no_condition() }
}

/// Like [`check_condition`], but `f` only runs when `flag` is set.
pub fn check_condition_with<F>(flag: bool, f: F) -> Condition
where
    F: FnOnce() -> Condition,
{
    if flag { f() } else { no_condition() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgdsl_query::{CompareOp, SqlQb, field};

    fn age_over(min: i32) -> Condition {
        Condition::compare(&field::<i32>("age"), CompareOp::Gt, min)
    }

    #[test]
    fn none_is_neutral() {
        assert!(None::<i32>.check_condition(age_over).is_no_condition());
    }

    #[test]
    fn some_applies_f() {
        assert_eq!(Some(3).check_condition(age_over).to_sql(), "age > $1");
    }

    #[test]
    fn predicate_guards() {
        assert!(
            Some(-1)
                .check_condition_if(|v| *v > 0, age_over)
                .is_no_condition()
        );
        assert_eq!(
            Some(5).check_condition_if(|v| *v > 0, age_over).to_sql(),
            "age > $1"
        );
    }

    #[test]
    fn predicate_not_called_for_none() {
        let mut called = false;
        let c = None::<i32>.check_condition_if(
            |_| {
                called = true;
                true
            },
            age_over,
        );
        assert!(c.is_no_condition());
        assert!(!called);
    }
}

use pgdsl_query::{Condition, IntoCondition, Select, exists, not_exists};

/// Method-call combinators on [`Condition`].
///
/// Each accepts a condition, a `Field<bool>` or plain SQL text.
pub trait ConditionOps {
    fn and(self, other: impl IntoCondition) -> Condition;
    fn and_not(self, other: impl IntoCondition) -> Condition;
    fn and_exists<R>(self, select: Select<R>) -> Condition;
    fn and_not_exists<R>(self, select: Select<R>) -> Condition;
    fn or(self, other: impl IntoCondition) -> Condition;
    fn or_not(self, other: impl IntoCondition) -> Condition;
    fn or_exists<R>(self, select: Select<R>) -> Condition;
    fn or_not_exists<R>(self, select: Select<R>) -> Condition;
    fn not(self) -> Condition;
}

impl ConditionOps for Condition {
    fn and(self, other: impl IntoCondition) -> Condition {
        Condition::all(vec![self, other.into_condition()])
    }

    fn and_not(self, other: impl IntoCondition) -> Condition {
        Condition::all(vec![self, Condition::negate(other.into_condition())])
    }

    fn and_exists<R>(self, select: Select<R>) -> Condition {
        Condition::all(vec![self, exists(select)])
    }

    fn and_not_exists<R>(self, select: Select<R>) -> Condition {
        Condition::all(vec![self, not_exists(select)])
    }

    fn or(self, other: impl IntoCondition) -> Condition {
        Condition::any(vec![self, other.into_condition()])
    }

    fn or_not(self, other: impl IntoCondition) -> Condition {
        Condition::any(vec![self, Condition::negate(other.into_condition())])
    }

    fn or_exists<R>(self, select: Select<R>) -> Condition {
        Condition::any(vec![self, exists(select)])
    }

    fn or_not_exists<R>(self, select: Select<R>) -> Condition {
        Condition::any(vec![self, not_exists(select)])
    }

    fn not(self) -> Condition {
        Condition::negate(self)
    }
}

use super::progression::InSource;
use pgdsl_query::func::{self, Exponent};
use pgdsl_query::{
    BetweenKind, CompareOp, Condition, Field, IntoOperand, SortField, SortOrder, TextMatch,
};
use std::ops::RangeInclusive;
use tokio_postgres::types::ToSql;

/// Right-hand side of `is` / `is_not`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Is {
    Null,
}

/// Predicate, sort, arithmetic and bitwise methods on [`Field`].
///
/// Operands can be plain values, other fields of the same type, single-column
/// selects or `any`/`all` quantified selects.
pub trait FieldOps<T> {
    fn equal(&self, other: impl IntoOperand<T>) -> Condition;
    fn eq(&self, other: impl IntoOperand<T>) -> Condition;
    fn not_equal(&self, other: impl IntoOperand<T>) -> Condition;
    fn ne(&self, other: impl IntoOperand<T>) -> Condition;
    fn less_than(&self, other: impl IntoOperand<T>) -> Condition;
    fn lt(&self, other: impl IntoOperand<T>) -> Condition;
    fn less_or_equal(&self, other: impl IntoOperand<T>) -> Condition;
    fn le(&self, other: impl IntoOperand<T>) -> Condition;
    fn greater_than(&self, other: impl IntoOperand<T>) -> Condition;
    fn gt(&self, other: impl IntoOperand<T>) -> Condition;
    fn greater_or_equal(&self, other: impl IntoOperand<T>) -> Condition;
    fn ge(&self, other: impl IntoOperand<T>) -> Condition;

    fn is(&self, marker: Is) -> Condition;
    fn is_not(&self, marker: Is) -> Condition;
    fn is_distinct_from(&self, other: impl IntoOperand<T>) -> Condition;
    fn is_not_distinct_from(&self, other: impl IntoOperand<T>) -> Condition;

    /// Pattern operators take a text pattern whatever the field's value type.
    fn like_regex(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn not_like_regex(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn similar_to(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn not_similar_to(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn like(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn not_like(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn like_ignore_case(&self, pattern: impl IntoOperand<String>) -> Condition;
    fn not_like_ignore_case(&self, pattern: impl IntoOperand<String>) -> Condition;

    fn contains(&self, value: impl IntoOperand<T>) -> Condition;
    fn not_contains(&self, value: impl IntoOperand<T>) -> Condition;
    fn contains_ignore_case(&self, value: impl IntoOperand<T>) -> Condition;
    fn not_contains_ignore_case(&self, value: impl IntoOperand<T>) -> Condition;
    fn starts_with(&self, value: impl IntoOperand<T>) -> Condition;
    fn starts_with_ignore_case(&self, value: impl IntoOperand<T>) -> Condition;
    fn ends_with(&self, value: impl IntoOperand<T>) -> Condition;
    fn ends_with_ignore_case(&self, value: impl IntoOperand<T>) -> Condition;

    /// Membership in values, fields, a record set, a subquery or a range.
    fn is_in(&self, source: impl InSource<T>) -> Condition;
    fn not_in(&self, source: impl InSource<T>) -> Condition;

    fn between_range<V: IntoOperand<T>>(&self, range: RangeInclusive<V>) -> Condition;
    fn between_symmetric_range<V: IntoOperand<T>>(&self, range: RangeInclusive<V>) -> Condition;
    fn not_between_range<V: IntoOperand<T>>(&self, range: RangeInclusive<V>) -> Condition;
    fn not_between_symmetric_range<V: IntoOperand<T>>(
        &self,
        range: RangeInclusive<V>,
    ) -> Condition;

    fn sort(&self, order: SortOrder) -> SortField<T>;
    fn asc(&self) -> SortField<T>;
    fn desc(&self) -> SortField<T>;
    /// `values` first, in the given order.
    fn sort_asc<V: IntoOperand<T>>(&self, values: Vec<V>) -> Option<SortField<i32>>;
    /// `values` first, in reverse order.
    fn sort_desc<V: IntoOperand<T>>(&self, values: Vec<V>) -> Option<SortField<i32>>;
    /// Sort by the value each key maps to; `None` for an empty mapping.
    fn sort_by<V, Z>(&self, mapping: Vec<(V, Z)>) -> Option<SortField<Z>>
    where
        V: IntoOperand<T>,
        Z: ToSql + Send + Sync + 'static;

    fn pow(&self, exponent: impl Exponent) -> Field<f64>;
    fn power(&self, exponent: impl Exponent) -> Field<f64>;

    fn bit_and(&self, other: impl IntoOperand<T>) -> Field<T>;
    fn bit_nand(&self, other: impl IntoOperand<T>) -> Field<T>;
    fn bit_or(&self, other: impl IntoOperand<T>) -> Field<T>;
    fn bit_nor(&self, other: impl IntoOperand<T>) -> Field<T>;
    fn bit_xor(&self, other: impl IntoOperand<T>) -> Field<T>;
    fn bit_xnor(&self, other: impl IntoOperand<T>) -> Field<T>;
    fn shl<N>(&self, count: impl IntoOperand<N>) -> Field<T>;
    fn shr<N>(&self, count: impl IntoOperand<N>) -> Field<T>;
}

const CLOSED: BetweenKind = BetweenKind {
    symmetric: false,
    negated: false,
};

impl<T> FieldOps<T> for Field<T> {
    fn equal(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Eq, other)
    }

    fn eq(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Eq, other)
    }

    fn not_equal(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Ne, other)
    }

    fn ne(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Ne, other)
    }

    fn less_than(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Lt, other)
    }

    fn lt(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Lt, other)
    }

    fn less_or_equal(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Le, other)
    }

    fn le(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Le, other)
    }

    fn greater_than(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Gt, other)
    }

    fn gt(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Gt, other)
    }

    fn greater_or_equal(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Ge, other)
    }

    fn ge(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::Ge, other)
    }

    fn is(&self, marker: Is) -> Condition {
        match marker {
            Is::Null => Condition::is_null(self),
        }
    }

    fn is_not(&self, marker: Is) -> Condition {
        match marker {
            Is::Null => Condition::is_not_null(self),
        }
    }

    fn is_distinct_from(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::IsDistinctFrom, other)
    }

    fn is_not_distinct_from(&self, other: impl IntoOperand<T>) -> Condition {
        Condition::compare(self, CompareOp::IsNotDistinctFrom, other)
    }

    fn like_regex(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::LikeRegex, pattern)
    }

    fn not_like_regex(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::NotLikeRegex, pattern)
    }

    fn similar_to(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::SimilarTo, pattern)
    }

    fn not_similar_to(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::NotSimilarTo, pattern)
    }

    fn like(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::Like, pattern)
    }

    fn not_like(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::NotLike, pattern)
    }

    fn like_ignore_case(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::LikeIgnoreCase, pattern)
    }

    fn not_like_ignore_case(&self, pattern: impl IntoOperand<String>) -> Condition {
        Condition::compare(&self.coerce::<String>(), CompareOp::NotLikeIgnoreCase, pattern)
    }

    fn contains(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::Contains, value, false, false)
    }

    fn not_contains(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::Contains, value, false, true)
    }

    fn contains_ignore_case(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::Contains, value, true, false)
    }

    fn not_contains_ignore_case(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::Contains, value, true, true)
    }

    fn starts_with(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::StartsWith, value, false, false)
    }

    fn starts_with_ignore_case(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::StartsWith, value, true, false)
    }

    fn ends_with(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::EndsWith, value, false, false)
    }

    fn ends_with_ignore_case(&self, value: impl IntoOperand<T>) -> Condition {
        Condition::text_match(self, TextMatch::EndsWith, value, true, false)
    }

    fn is_in(&self, source: impl InSource<T>) -> Condition {
        source.in_condition(self)
    }

    fn not_in(&self, source: impl InSource<T>) -> Condition {
        source.not_in_condition(self)
    }

    fn between_range<V: IntoOperand<T>>(&self, range: RangeInclusive<V>) -> Condition {
        let (low, high) = range.into_inner();
        Condition::between(self, low, high, CLOSED)
    }

    fn between_symmetric_range<V: IntoOperand<T>>(&self, range: RangeInclusive<V>) -> Condition {
        let (low, high) = range.into_inner();
        let kind = BetweenKind {
            symmetric: true,
            ..CLOSED
        };
        Condition::between(self, low, high, kind)
    }

    fn not_between_range<V: IntoOperand<T>>(&self, range: RangeInclusive<V>) -> Condition {
        let (low, high) = range.into_inner();
        let kind = BetweenKind {
            negated: true,
            ..CLOSED
        };
        Condition::between(self, low, high, kind)
    }

    fn not_between_symmetric_range<V: IntoOperand<T>>(
        &self,
        range: RangeInclusive<V>,
    ) -> Condition {
        let (low, high) = range.into_inner();
        let kind = BetweenKind {
            symmetric: true,
            negated: true,
        };
        Condition::between(self, low, high, kind)
    }

    fn sort(&self, order: SortOrder) -> SortField<T> {
        SortField::new(self, order)
    }

    fn asc(&self) -> SortField<T> {
        SortField::new(self, SortOrder::Asc)
    }

    fn desc(&self) -> SortField<T> {
        SortField::new(self, SortOrder::Desc)
    }

    fn sort_asc<V: IntoOperand<T>>(&self, values: Vec<V>) -> Option<SortField<i32>> {
        SortField::by_list_asc(self, values)
    }

    fn sort_desc<V: IntoOperand<T>>(&self, values: Vec<V>) -> Option<SortField<i32>> {
        SortField::by_list_desc(self, values)
    }

    fn sort_by<V, Z>(&self, mapping: Vec<(V, Z)>) -> Option<SortField<Z>>
    where
        V: IntoOperand<T>,
        Z: ToSql + Send + Sync + 'static,
    {
        SortField::by_map(self, mapping)
    }

    fn pow(&self, exponent: impl Exponent) -> Field<f64> {
        func::power(self, exponent)
    }

    fn power(&self, exponent: impl Exponent) -> Field<f64> {
        func::power(self, exponent)
    }

    fn bit_and(&self, other: impl IntoOperand<T>) -> Field<T> {
        func::bit_and(self, other)
    }

    fn bit_nand(&self, other: impl IntoOperand<T>) -> Field<T> {
        func::bit_nand(self, other)
    }

    fn bit_or(&self, other: impl IntoOperand<T>) -> Field<T> {
        func::bit_or(self, other)
    }

    fn bit_nor(&self, other: impl IntoOperand<T>) -> Field<T> {
        func::bit_nor(self, other)
    }

    fn bit_xor(&self, other: impl IntoOperand<T>) -> Field<T> {
        func::bit_xor(self, other)
    }

    fn bit_xnor(&self, other: impl IntoOperand<T>) -> Field<T> {
        func::bit_xnor(self, other)
    }

    fn shl<N>(&self, count: impl IntoOperand<N>) -> Field<T> {
        func::shl(self, count)
    }

    fn shr<N>(&self, count: impl IntoOperand<N>) -> Field<T> {
        func::shr(self, count)
    }
}

/// Case-insensitive equality on text fields.
pub trait StringFieldOps {
    /// `lower(field) = lower(other)`
    fn equal_ignore_case(&self, other: impl IntoOperand<String>) -> Condition;
    /// `lower(field) <> lower(other)`
    fn not_equal_ignore_case(&self, other: impl IntoOperand<String>) -> Condition;
}

impl StringFieldOps for Field<String> {
    fn equal_ignore_case(&self, other: impl IntoOperand<String>) -> Condition {
        Condition::equal_ignore_case(self, other, false)
    }

    fn not_equal_ignore_case(&self, other: impl IntoOperand<String>) -> Condition {
        Condition::equal_ignore_case(self, other, true)
    }
}

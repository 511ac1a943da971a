//! Arithmetic progressions and membership sources.
//!
//! A unit-step progression becomes a single `BETWEEN`; any other step is
//! enumerated into an `IN` list:
//!
//! | progression          | SQL                         |
//! |----------------------|-----------------------------|
//! | `1..=5`              | `x BETWEEN 1 AND 5`         |
//! | `down_to(5, 1)`      | `x BETWEEN 1 AND 5`         |
//! | `(1..=10).step(2)`   | `x IN (1, 3, 5, 7, 9)`      |

use pgdsl_query::{BetweenKind, Condition, Field, IntoOperand, Record1, RecordSet, Select};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Range, RangeInclusive};
use tokio_postgres::types::ToSql;

/// Element types a [`Progression`] can walk over.
pub trait ProgressionValue: Copy {
    /// The type bound as a parameter for this element type.
    type Sql: ToSql + Send + Sync + 'static;

    fn to_i128(self) -> i128;
    /// `None` for integers with no element of this type (e.g. surrogate code points).
    fn from_i128(value: i128) -> Option<Self>;
    fn to_sql_value(self) -> Self::Sql;
}

macro_rules! impl_progression_int {
    ($($ty:ty),*) => {
        $(
            impl ProgressionValue for $ty {
                type Sql = $ty;

                fn to_i128(self) -> i128 {
                    self as i128
                }

                fn from_i128(value: i128) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                fn to_sql_value(self) -> Self::Sql {
                    self
                }
            }
        )*
    };
}

impl_progression_int!(i32, i64);

/// Characters are bound as one-character strings.
impl ProgressionValue for char {
    type Sql = String;

    fn to_i128(self) -> i128 {
        self as u32 as i128
    }

    fn from_i128(value: i128) -> Option<Self> {
        u32::try_from(value).ok().and_then(char::from_u32)
    }

    fn to_sql_value(self) -> Self::Sql {
        self.to_string()
    }
}

/// `first, first + step, ...` up to and including `last`.
///
/// `last` is normalised to the last element actually reached, so
/// `(1..=10).step(2)` ends at 9.
pub struct Progression<T> {
    first: i128,
    last: i128,
    step: i64,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Progression<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Progression<T> {}

impl<T> PartialEq for Progression<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.first, self.last, self.step) == (other.first, other.last, other.step)
    }
}

impl<T> Eq for Progression<T> {}

impl<T> fmt::Debug for Progression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progression")
            .field("first", &self.first)
            .field("last", &self.last)
            .field("step", &self.step)
            .finish()
    }
}

/// Descending progression from `first` to `last` with step `-1`.
pub fn down_to<T: ProgressionValue>(first: T, last: T) -> Progression<T> {
    Progression::from_closed_range(first, last, -1)
}

impl<T: ProgressionValue> Progression<T> {
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn from_closed_range(first: T, last: T, step: i64) -> Self {
        assert!(step != 0, "progression step must be non-zero");
        Self::normalized(first.to_i128(), last.to_i128(), step)
    }

    fn normalized(first: i128, last: i128, step: i64) -> Self {
        let s = step as i128;
        let mut last = if step > 0 && first < last {
            last - (last - first).rem_euclid(s)
        } else if step < 0 && first > last {
            last + (first - last).rem_euclid(-s)
        } else {
            last
        };
        // Step back over values with no element (chars in the surrogate gap).
        while T::from_i128(last).is_none() && reaches(first, last, step) {
            last -= s;
        }
        Self {
            first,
            last,
            step,
            _type: PhantomData,
        }
    }

    /// Same direction, new step magnitude.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not positive.
    pub fn step(self, step: i64) -> Self {
        assert!(step > 0, "step must be positive, was {step}");
        let step = if self.step > 0 { step } else { -step };
        Self::normalized(self.first, self.last, step)
    }

    pub fn step_size(&self) -> i64 {
        self.step
    }

    pub fn is_empty(&self) -> bool {
        !reaches(self.first, self.last, self.step)
    }

    /// The first element, `None` when empty.
    pub fn first(&self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            T::from_i128(self.first)
        }
    }

    /// The last element, `None` when empty.
    pub fn last(&self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            T::from_i128(self.last)
        }
    }

    /// Elements in order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let s = self.step as i128;
        let mut next = Some(self.first).filter(|_| !self.is_empty());
        std::iter::from_fn(move || {
            let current = next?;
            next = (current != self.last).then(|| current + s);
            Some(current)
        })
        .filter_map(T::from_i128)
    }

    fn membership(&self, field: &Field<T>, negated: bool) -> Condition {
        let field = field.coerce::<T::Sql>();
        let bound = |v: i128| T::from_i128(v).map(T::to_sql_value);
        let kind = BetweenKind {
            symmetric: false,
            negated,
        };
        match (self.step, bound(self.first), bound(self.last)) {
            (1, Some(low), Some(high)) => Condition::between(&field, low, high, kind),
            (-1, Some(high), Some(low)) => Condition::between(&field, low, high, kind),
            _ => {
                let values = self.iter().map(T::to_sql_value);
                if negated {
                    Condition::not_in_values(&field, values)
                } else {
                    Condition::in_values(&field, values)
                }
            }
        }
    }
}

fn reaches(first: i128, last: i128, step: i64) -> bool {
    if step > 0 { first <= last } else { first >= last }
}

impl<T: ProgressionValue> From<RangeInclusive<T>> for Progression<T> {
    fn from(range: RangeInclusive<T>) -> Self {
        let (first, last) = range.into_inner();
        Progression::from_closed_range(first, last, 1)
    }
}

impl<T: ProgressionValue> From<Range<T>> for Progression<T> {
    fn from(range: Range<T>) -> Self {
        Progression::normalized(range.start.to_i128(), range.end.to_i128() - 1, 1)
    }
}

/// Stepping helpers on std ranges: `(1..=10).step(2)`.
pub trait RangeStep<T> {
    fn step(self, step: i64) -> Progression<T>;
}

impl<T: ProgressionValue> RangeStep<T> for RangeInclusive<T> {
    fn step(self, step: i64) -> Progression<T> {
        Progression::from(self).step(step)
    }
}

impl<T: ProgressionValue> RangeStep<T> for Range<T> {
    fn step(self, step: i64) -> Progression<T> {
        Progression::from(self).step(step)
    }
}

/// Anything a field can be tested for membership in.
pub trait InSource<T> {
    fn in_condition(self, field: &Field<T>) -> Condition;
    fn not_in_condition(self, field: &Field<T>) -> Condition;
}

impl<T, V: IntoOperand<T>> InSource<T> for Vec<V> {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Condition::in_values(field, self)
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Condition::not_in_values(field, self)
    }
}

impl<T, V: IntoOperand<T>, const N: usize> InSource<T> for [V; N] {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Condition::in_values(field, self)
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Condition::not_in_values(field, self)
    }
}

impl<T, V: IntoOperand<T> + Clone> InSource<T> for &[V] {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Condition::in_values(field, self.iter().cloned())
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Condition::not_in_values(field, self.iter().cloned())
    }
}

impl<T: ToSql + Send + Sync + 'static> InSource<T> for RecordSet<Record1<T>> {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Condition::in_values(field, self.into_values())
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Condition::not_in_values(field, self.into_values())
    }
}

impl<T> InSource<T> for Select<Record1<T>> {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Condition::in_select(field, self)
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Condition::not_in_select(field, self)
    }
}

impl<T: ProgressionValue> InSource<T> for Progression<T> {
    fn in_condition(self, field: &Field<T>) -> Condition {
        self.membership(field, false)
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        self.membership(field, true)
    }
}

impl<T: ProgressionValue> InSource<T> for RangeInclusive<T> {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Progression::from(self).membership(field, false)
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Progression::from(self).membership(field, true)
    }
}

impl<T: ProgressionValue> InSource<T> for Range<T> {
    fn in_condition(self, field: &Field<T>) -> Condition {
        Progression::from(self).membership(field, false)
    }

    fn not_in_condition(self, field: &Field<T>) -> Condition {
        Progression::from(self).membership(field, true)
    }
}

//! Block-style SET clauses.
//!
//! Instead of threading the step through chained `.set(..)` calls, a block
//! receives a context and assigns with `to`:
//!
//! ```ignore
//! use pgdsl::prelude::*;
//!
//! let stmt = insert_into(&users)
//!     .values(|row| {
//!         row.to(&name, "alice");
//!         row.to(&age, 30)
//!     })
//!     .values(|row| {
//!         row.to(&name, "bob");
//!         row.to(&age, 41)
//!     });
//! ```
//!
//! Each `to` applies `set` to the most recent step, so a block is exactly
//! equivalent to the chained form. The block's return value is returned
//! as-is; it must be a step, so a block can return the last `to`, or any
//! other step of the same type.

use pgdsl_query::{
    Field, InsertOnDuplicateSetMoreStep, InsertOnDuplicateSetStep, InsertSetMoreStep,
    InsertSetStep, IntoOperand, UpdateSetMoreStep, UpdateSetStep,
};

/// Generate a SET context for one clause family.
///
/// Usage:
/// ```ignore
/// set_context! {
///     /// docs
///     pub struct UpdateSetContext: UpdateSetStep => UpdateSetMoreStep, "update";
/// }
/// ```
macro_rules! set_context {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $seed:ty => $more:ty, $clause:literal;
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            slot: Slot<$seed, $more>,
            assignments: usize,
        }

        impl $name {
            fn unset(seed: $seed) -> Self {
                Self {
                    slot: Slot::Unset(seed),
                    assignments: 0,
                }
            }

            #[allow(dead_code)]
            fn set(step: $more) -> Self {
                Self {
                    slot: Slot::Set(step),
                    assignments: 0,
                }
            }

            /// Assign `value` to `field` on the most recent step and return
            /// the resulting step.
            pub fn to<T>(&mut self, field: &Field<T>, value: impl IntoOperand<T>) -> $more {
                let next = match &self.slot {
                    Slot::Unset(seed) => seed.clone().set(field, value),
                    Slot::Set(step) => step.clone().set(field, value),
                };
                self.advance(next)
            }

            /// Assign an expression such as `excluded(&field)`.
            pub fn to_field<T>(&mut self, field: &Field<T>, value: Field<T>) -> $more {
                let next = match &self.slot {
                    Slot::Unset(seed) => seed.clone().set_field(field, value),
                    Slot::Set(step) => step.clone().set_field(field, value),
                };
                self.advance(next)
            }

            /// Number of `to` calls made so far.
            pub fn assignments(&self) -> usize {
                self.assignments
            }

            fn advance(&mut self, next: $more) -> $more {
                self.slot = Slot::Set(next.clone());
                self.assignments += 1;
                next
            }

            fn run<F>(mut self, block: F) -> $more
            where
                F: FnOnce(&mut Self) -> $more,
            {
                let result = block(&mut self);
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "pgdsl.set",
                    clause = $clause,
                    assignments = self.assignments,
                    "set block finished"
                );
                result
            }
        }
    };
}

#[derive(Debug)]
enum Slot<S, M> {
    Unset(S),
    Set(M),
}

set_context! {
    /// Row assignments for `INSERT ... VALUES`.
    pub struct InsertSetContext: InsertSetStep => InsertSetMoreStep, "insert";
}

set_context! {
    /// `UPDATE ... SET` assignments.
    pub struct UpdateSetContext: UpdateSetStep => UpdateSetMoreStep, "update";
}

set_context! {
    /// `ON CONFLICT ... DO UPDATE SET` assignments.
    pub struct InsertOnDuplicateSetContext: InsertOnDuplicateSetStep => InsertOnDuplicateSetMoreStep, "on_conflict";
}

/// `values(|row| ...)` on INSERT steps.
pub trait InsertValues {
    /// Fill one row. On a step that already has assignments, a new row is
    /// started first.
    fn values<F>(self, block: F) -> InsertSetMoreStep
    where
        F: FnOnce(&mut InsertSetContext) -> InsertSetMoreStep;
}

impl InsertValues for InsertSetStep {
    fn values<F>(self, block: F) -> InsertSetMoreStep
    where
        F: FnOnce(&mut InsertSetContext) -> InsertSetMoreStep,
    {
        InsertSetContext::unset(self).run(block)
    }
}

impl InsertValues for InsertSetMoreStep {
    fn values<F>(self, block: F) -> InsertSetMoreStep
    where
        F: FnOnce(&mut InsertSetContext) -> InsertSetMoreStep,
    {
        InsertSetContext::unset(self.new_record()).run(block)
    }
}

/// `set_with(|s| ...)` on UPDATE steps.
pub trait UpdateSetBlock {
    fn set_with<F>(self, block: F) -> UpdateSetMoreStep
    where
        F: FnOnce(&mut UpdateSetContext) -> UpdateSetMoreStep;
}

impl UpdateSetBlock for UpdateSetStep {
    fn set_with<F>(self, block: F) -> UpdateSetMoreStep
    where
        F: FnOnce(&mut UpdateSetContext) -> UpdateSetMoreStep,
    {
        UpdateSetContext::unset(self).run(block)
    }
}

impl UpdateSetBlock for UpdateSetMoreStep {
    fn set_with<F>(self, block: F) -> UpdateSetMoreStep
    where
        F: FnOnce(&mut UpdateSetContext) -> UpdateSetMoreStep,
    {
        UpdateSetContext::set(self).run(block)
    }
}

/// `set_with(|s| ...)` on `ON CONFLICT ... DO UPDATE` steps.
pub trait OnDuplicateSetBlock {
    fn set_with<F>(self, block: F) -> InsertOnDuplicateSetMoreStep
    where
        F: FnOnce(&mut InsertOnDuplicateSetContext) -> InsertOnDuplicateSetMoreStep;
}

impl OnDuplicateSetBlock for InsertOnDuplicateSetStep {
    fn set_with<F>(self, block: F) -> InsertOnDuplicateSetMoreStep
    where
        F: FnOnce(&mut InsertOnDuplicateSetContext) -> InsertOnDuplicateSetMoreStep,
    {
        InsertOnDuplicateSetContext::unset(self).run(block)
    }
}

impl OnDuplicateSetBlock for InsertOnDuplicateSetMoreStep {
    fn set_with<F>(self, block: F) -> InsertOnDuplicateSetMoreStep
    where
        F: FnOnce(&mut InsertOnDuplicateSetContext) -> InsertOnDuplicateSetMoreStep,
    {
        InsertOnDuplicateSetContext::set(self).run(block)
    }
}

//! Arithmetic and bitwise expressions.
//!
//! PostgreSQL spells XOR as `#`; NAND, NOR and XNOR have no operator of their
//! own and render as a negated `&`, `|` or `#`.

use crate::expr::Node;
use crate::field::{Field, IntoOperand, Operand};

/// Right-hand side of [`power`].
///
/// PostgreSQL resolves `power(x, $n)` to `power(float8, float8)`, so bound
/// exponents are always sent as `f64`. Columns and expressions of any numeric
/// type are passed through and cast by the server.
pub trait Exponent {
    fn into_exponent(self) -> Operand<f64>;
}

macro_rules! impl_exponent {
    ($($ty:ty),*) => {
        $(
            impl Exponent for $ty {
                fn into_exponent(self) -> Operand<f64> {
                    (self as f64).into_operand()
                }
            }
        )*
    };
}

impl_exponent!(i16, i32, i64, f32, f64);

impl<E> Exponent for Field<E> {
    fn into_exponent(self) -> Operand<f64> {
        Operand::new(self.into_node())
    }
}

impl<E> Exponent for &Field<E> {
    fn into_exponent(self) -> Operand<f64> {
        Operand::new(self.node().clone())
    }
}

/// `power(field, exponent)`
pub fn power<T>(field: &Field<T>, exponent: impl Exponent) -> Field<f64> {
    Field::from_node(Node::func(
        "power",
        vec![field.node().clone(), exponent.into_exponent().into_node()],
    ))
}

fn binary<T>(field: &Field<T>, op: &'static str, rhs: Node) -> Field<T> {
    Field::from_node(Node::binary(field.node().clone(), op, rhs))
}

fn negated<T>(field: Field<T>) -> Field<T> {
    Field::from_node(Node::Prefix {
        op: "~",
        operand: Box::new(field.into_node()),
    })
}

/// `(a & b)`
pub fn bit_and<T>(field: &Field<T>, other: impl IntoOperand<T>) -> Field<T> {
    binary(field, "&", other.into_operand().into_node())
}

/// `(a | b)`
pub fn bit_or<T>(field: &Field<T>, other: impl IntoOperand<T>) -> Field<T> {
    binary(field, "|", other.into_operand().into_node())
}

/// `(a # b)`
pub fn bit_xor<T>(field: &Field<T>, other: impl IntoOperand<T>) -> Field<T> {
    binary(field, "#", other.into_operand().into_node())
}

/// `~(a & b)`
pub fn bit_nand<T>(field: &Field<T>, other: impl IntoOperand<T>) -> Field<T> {
    negated(bit_and(field, other))
}

/// `~(a | b)`
pub fn bit_nor<T>(field: &Field<T>, other: impl IntoOperand<T>) -> Field<T> {
    negated(bit_or(field, other))
}

/// `~(a # b)`
pub fn bit_xnor<T>(field: &Field<T>, other: impl IntoOperand<T>) -> Field<T> {
    negated(bit_xor(field, other))
}

/// `(a << n)`
pub fn shl<T, N>(field: &Field<T>, count: impl IntoOperand<N>) -> Field<T> {
    binary(field, "<<", count.into_operand().into_node())
}

/// `(a >> n)`
pub fn shr<T, N>(field: &Field<T>, count: impl IntoOperand<N>) -> Field<T> {
    binary(field, ">>", count.into_operand().into_node())
}

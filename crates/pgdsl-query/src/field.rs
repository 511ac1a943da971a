//! Typed column and expression handles.

use crate::error::DslResult;
use crate::expr::Node;
use crate::ident::{Ident, IntoIdent};
use crate::param::Param;
use crate::select::{QuantifiedSelect, Record1, Select};
use std::fmt;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;

/// A table that fields can be qualified with.
///
/// ```ignore
/// let users = Table::new("public.users")?;
/// let email: Field<String> = users.field("email");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    ident: Ident,
}

impl Table {
    /// Parse a (possibly schema-qualified) table name.
    pub fn new(name: impl IntoIdent) -> DslResult<Self> {
        Ok(Self {
            ident: name.into_ident()?,
        })
    }

    /// The table identifier.
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    /// A column of this table. Bad column names surface at `validate()`.
    pub fn field<T>(&self, column: &str) -> Field<T> {
        let node = match Ident::parse(column) {
            Ok(column) => Node::column(Some(self.ident.clone()), column),
            Err(e) => Node::Invalid(e.to_string()),
        };
        Field::from_node(node)
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        self.ident.write_sql(out);
    }
}

/// A typed SQL expression: a column, a bound value or a computed expression.
///
/// `T` is the Rust type of the expression's values. It only steers which
/// operands the builder accepts; rendering never looks at it.
pub struct Field<T> {
    node: Node,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.node).finish()
    }
}

impl<T> Field<T> {
    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            node,
            _type: PhantomData,
        }
    }

    pub(crate) fn node(&self) -> &Node {
        &self.node
    }

    pub(crate) fn into_node(self) -> Node {
        self.node
    }

    /// The same SQL under another value type.
    pub fn coerce<U>(&self) -> Field<U> {
        Field::from_node(self.node.clone())
    }

    /// Drop the value type, e.g. to mix fields in a column list.
    pub fn erase(&self) -> AnyField {
        AnyField {
            node: self.node.clone(),
        }
    }

    /// Render this expression on its own (placeholders start at `$1`).
    pub fn to_sql(&self) -> String {
        self.node.build(&mut crate::param::ParamList::new())
    }
}

/// A column reference by name: `field::<i64>("id")` or `field::<i64>("users.id")`.
pub fn field<T>(name: &str) -> Field<T> {
    let node = match Ident::parse(name) {
        Ok(ident) => Node::column(ident.qualifier(), ident.unqualified()),
        Err(e) => Node::Invalid(e.to_string()),
    };
    Field::from_node(node)
}

/// A bound value used as an expression: `val(5)` renders `$n`.
pub fn val<T: ToSql + Send + Sync + 'static>(value: T) -> Field<T> {
    Field::from_node(Node::Bind(Param::new(value)))
}

/// SQL text used verbatim as an expression: `inline_sql::<i64>("now()")`.
pub fn inline_sql<T>(sql: impl Into<String>) -> Field<T> {
    Field::from_node(Node::Inline(sql.into()))
}

/// `EXCLUDED.column` for `ON CONFLICT DO UPDATE` assignments.
pub fn excluded<T>(field: &Field<T>) -> Field<T> {
    match field.node.column_name() {
        Some(column) => Field::from_node(Node::column(
            Some(Ident::bare("EXCLUDED")),
            column,
        )),
        None => Field::from_node(Node::Invalid(
            "EXCLUDED requires a column reference".to_string(),
        )),
    }
}

/// A field with its value type erased.
#[derive(Clone, Debug)]
pub struct AnyField {
    node: Node,
}

impl AnyField {
    pub(crate) fn node(&self) -> &Node {
        &self.node
    }
}

impl<T> From<&Field<T>> for AnyField {
    fn from(field: &Field<T>) -> Self {
        field.erase()
    }
}

impl<T> From<Field<T>> for AnyField {
    fn from(field: Field<T>) -> Self {
        AnyField { node: field.node }
    }
}

/// The right-hand side of a predicate on a `Field<T>`.
pub struct Operand<T> {
    node: Node,
    _type: PhantomData<fn() -> T>,
}

impl<T> Operand<T> {
    pub(crate) fn new(node: Node) -> Self {
        Self {
            node,
            _type: PhantomData,
        }
    }

    pub(crate) fn into_node(self) -> Node {
        self.node
    }
}

impl<T> fmt::Debug for Operand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operand").field(&self.node).finish()
    }
}

/// Anything usable where a `T`-typed expression is expected: a bare value,
/// another `Field<T>`, a single-column subquery or a quantified subquery.
pub trait IntoOperand<T> {
    fn into_operand(self) -> Operand<T>;
}

impl<T: ToSql + Send + Sync + 'static> IntoOperand<T> for T {
    fn into_operand(self) -> Operand<T> {
        Operand::new(Node::Bind(Param::new(self)))
    }
}

impl IntoOperand<String> for &'static str {
    fn into_operand(self) -> Operand<String> {
        Operand::new(Node::Bind(Param::new(self)))
    }
}

impl<T> IntoOperand<T> for Field<T> {
    fn into_operand(self) -> Operand<T> {
        Operand::new(self.node)
    }
}

impl<T> IntoOperand<T> for &Field<T> {
    fn into_operand(self) -> Operand<T> {
        Operand::new(self.node.clone())
    }
}

impl<T> IntoOperand<T> for Select<Record1<T>> {
    fn into_operand(self) -> Operand<T> {
        Operand::new(Node::Subquery(Box::new(self.into_query())))
    }
}

impl<T> IntoOperand<T> for QuantifiedSelect<Record1<T>> {
    fn into_operand(self) -> Operand<T> {
        Operand::new(self.into_node())
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// An `ORDER BY` item.
pub struct SortField<T> {
    node: Node,
    order: SortOrder,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for SortField<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            order: self.order,
            _type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SortField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortField")
            .field("node", &self.node)
            .field("order", &self.order)
            .finish()
    }
}

impl<T> SortField<T> {
    /// Sort by `field` in `order`.
    pub fn new(field: &Field<T>, order: SortOrder) -> Self {
        Self {
            node: field.node.clone(),
            order,
            _type: PhantomData,
        }
    }

    /// The direction.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub(crate) fn into_order_by(self) -> OrderBy {
        OrderBy {
            node: self.node,
            order: self.order,
        }
    }
}

impl<Z: ToSql + Send + Sync + 'static> SortField<Z> {
    /// Sort by the values `mapping` assigns to each value of `field`:
    /// `CASE field WHEN k1 THEN z1 ... END ASC`.
    ///
    /// Returns `None` for an empty mapping.
    pub fn by_map<K, V>(field: &Field<K>, mapping: Vec<(V, Z)>) -> Option<Self>
    where
        V: IntoOperand<K>,
    {
        if mapping.is_empty() {
            return None;
        }
        let arms = mapping
            .into_iter()
            .map(|(k, z)| (k.into_operand().into_node(), Node::Bind(Param::new(z))))
            .collect();
        Some(SortField {
            node: Node::Case {
                subject: Box::new(field.node.clone()),
                arms,
            },
            order: SortOrder::Asc,
            _type: PhantomData,
        })
    }
}

impl SortField<i32> {
    /// Sort so that `values` come first, in the given order (`0, 1, 2, ...`).
    pub fn by_list_asc<K, V>(field: &Field<K>, values: Vec<V>) -> Option<Self>
    where
        V: IntoOperand<K>,
    {
        Self::by_map(field, values.into_iter().zip(0i32..).collect())
    }

    /// Sort so that `values` come first, in reverse order (`0, -1, -2, ...`).
    pub fn by_list_desc<K, V>(field: &Field<K>, values: Vec<V>) -> Option<Self>
    where
        V: IntoOperand<K>,
    {
        Self::by_map(field, values.into_iter().zip((0i32..).map(|i| -i)).collect())
    }
}

/// A type-erased `ORDER BY` item held by a select.
#[derive(Clone, Debug)]
pub(crate) struct OrderBy {
    pub(crate) node: Node,
    order: SortOrder,
}

impl OrderBy {
    pub(crate) fn build(&self, params: &mut crate::param::ParamList) -> String {
        format!("{} {}", self.node.build(params), self.order.sql())
    }
}

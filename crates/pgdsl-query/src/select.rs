//! SELECT subqueries and in-memory results.
//!
//! Selects exist here to be embedded: as scalar operands, `IN (SELECT ...)`
//! sources, `EXISTS` tests and `ANY`/`ALL` quantified operands. The record
//! type parameter tracks the projected columns so that only single-column
//! selects of the right type are accepted where a `T` is expected.

use crate::condition::{Condition, IntoCondition, no_condition};
use crate::error::{DslError, DslResult};
use crate::expr::{Node, Quantifier};
use crate::field::{AnyField, Field, OrderBy, SortField, Table};
use crate::param::ParamList;
use crate::query::{SqlQb, first_error};
use std::fmt;
use std::marker::PhantomData;
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// A projection of exactly one column of type `T`.
pub struct Record1<T>(PhantomData<fn() -> T>);

/// A projection of any number of untyped columns.
pub struct Record;

#[derive(Clone, Debug)]
pub(crate) struct SelectQuery {
    columns: Vec<Node>,
    from: Option<Table>,
    where_: Condition,
    order_by: Vec<OrderBy>,
    limit: Option<i64>,
}

impl SelectQuery {
    fn new(columns: Vec<Node>) -> Self {
        Self {
            columns,
            from: None,
            where_: no_condition(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub(crate) fn first_error(&self) -> Option<String> {
        if self.columns.is_empty() {
            return Some("SELECT requires at least one column".to_string());
        }
        self.columns
            .iter()
            .find_map(Node::first_error)
            .or_else(|| self.where_.first_error())
            .or_else(|| self.order_by.iter().find_map(|o| o.node.first_error()))
    }

    pub(crate) fn build(&self, params: &mut ParamList) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.build(params)).collect();
        let mut sql = format!("SELECT {}", columns.join(", "));
        if let Some(table) = &self.from {
            sql.push_str(" FROM ");
            table.write_sql(&mut sql);
        }
        let where_sql = self.where_.build_fragment(params);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }
        if !self.order_by.is_empty() {
            let items: Vec<String> = self.order_by.iter().map(|o| o.build(params)).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&items.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        sql
    }
}

/// A SELECT statement projecting `R`.
pub struct Select<R> {
    query: SelectQuery,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Select<R> {
    fn clone(&self) -> Self {
        Self::wrap(self.query.clone())
    }
}

impl<R> fmt::Debug for Select<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Select").field(&self.query).finish()
    }
}

/// `SELECT field`
pub fn select<T>(field: &Field<T>) -> Select<Record1<T>> {
    Select::wrap(SelectQuery::new(vec![field.node().clone()]))
}

/// `SELECT a, b, ...`
pub fn select_fields(fields: &[AnyField]) -> Select<Record> {
    Select::wrap(SelectQuery::new(
        fields.iter().map(|f| f.node().clone()).collect(),
    ))
}

impl<R> Select<R> {
    fn wrap(query: SelectQuery) -> Self {
        Self {
            query,
            _record: PhantomData,
        }
    }

    pub(crate) fn into_query(self) -> SelectQuery {
        self.query
    }

    pub fn from(mut self, table: &Table) -> Self {
        self.query.from = Some(table.clone());
        self
    }

    /// Replace the WHERE condition.
    pub fn where_(mut self, condition: impl IntoCondition) -> Self {
        self.query.where_ = condition.into_condition();
        self
    }

    /// AND another condition onto the WHERE clause.
    pub fn and_where(mut self, condition: impl IntoCondition) -> Self {
        let current = std::mem::replace(&mut self.query.where_, no_condition());
        self.query.where_ = Condition::all(vec![current, condition.into_condition()]);
        self
    }

    /// Append an `ORDER BY` item.
    pub fn order_by<T>(mut self, sort: SortField<T>) -> Self {
        self.query.order_by.push(sort.into_order_by());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.query.limit = Some(limit);
        self
    }
}

impl<R> SqlQb for Select<R> {
    fn render(&self, params: &mut ParamList) -> String {
        self.query.build(params)
    }

    fn validate(&self) -> DslResult<()> {
        first_error([self.query.first_error()])
    }
}

/// `ANY (SELECT ...)` / `ALL (SELECT ...)` used as a comparison operand.
pub struct QuantifiedSelect<R> {
    quantifier: Quantifier,
    query: SelectQuery,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for QuantifiedSelect<R> {
    fn clone(&self) -> Self {
        Self {
            quantifier: self.quantifier,
            query: self.query.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for QuantifiedSelect<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantifiedSelect")
            .field("quantifier", &self.quantifier)
            .field("query", &self.query)
            .finish()
    }
}

impl<R> QuantifiedSelect<R> {
    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub(crate) fn into_node(self) -> Node {
        Node::Quantified {
            quantifier: self.quantifier,
            select: Box::new(self.query),
        }
    }
}

/// `= ANY (SELECT ...)`
pub fn any<R>(select: Select<R>) -> QuantifiedSelect<R> {
    QuantifiedSelect {
        quantifier: Quantifier::Any,
        query: select.query,
        _record: PhantomData,
    }
}

/// `= ALL (SELECT ...)`
pub fn all<R>(select: Select<R>) -> QuantifiedSelect<R> {
    QuantifiedSelect {
        quantifier: Quantifier::All,
        query: select.query,
        _record: PhantomData,
    }
}

/// Maps a projection marker to the Rust type of one fetched row.
pub trait Projection {
    type Row;
}

impl<T> Projection for Record1<T> {
    type Row = T;
}

/// Rows that were already fetched.
///
/// For a single-column record set, membership tests render the values as an
/// `IN` list.
pub struct RecordSet<R: Projection> {
    rows: Vec<R::Row>,
}

impl<R: Projection> Clone for RecordSet<R>
where
    R::Row: Clone,
{
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<R: Projection> fmt::Debug for RecordSet<R>
where
    R::Row: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

impl<T> RecordSet<Record1<T>> {
    pub fn from_values(values: Vec<T>) -> Self {
        Self { rows: values }
    }

    /// Decode the first column of every row.
    pub fn from_rows(rows: &[Row]) -> DslResult<Self>
    where
        T: for<'a> FromSql<'a>,
    {
        let values = rows
            .iter()
            .map(|row| {
                row.try_get::<_, T>(0).map_err(|e| {
                    let column = row
                        .columns()
                        .first()
                        .map(|c| c.name().to_string())
                        .unwrap_or_else(|| "0".to_string());
                    DslError::decode(column, e.to_string())
                })
            })
            .collect::<DslResult<Vec<T>>>()?;
        Ok(Self::from_values(values))
    }

    pub fn values(&self) -> &[T] {
        &self.rows
    }

    pub fn into_values(self) -> Vec<T> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{CompareOp, exists};
    use crate::field::{SortOrder, field};

    #[test]
    fn renders_clauses_in_order() {
        let users = Table::new("users").unwrap();
        let id = users.field::<i64>("id");
        let age = users.field::<i32>("age");
        let q = select(&id)
            .from(&users)
            .where_(Condition::compare(&age, CompareOp::Ge, 18))
            .and_where(Condition::is_not_null(&id))
            .order_by(SortField::new(&age, SortOrder::Desc))
            .limit(10);
        let built = q.build();
        assert_eq!(
            built.sql,
            "SELECT users.id FROM users WHERE users.age >= $1 AND users.id IS NOT NULL ORDER BY users.age DESC LIMIT 10"
        );
        assert_eq!(built.params.len(), 1);
    }

    #[test]
    fn neutral_where_is_omitted() {
        let q = select(&field::<i64>("id"))
            .from(&Table::new("t").unwrap())
            .where_(no_condition());
        assert_eq!(q.to_sql(), "SELECT id FROM t");
    }

    #[test]
    fn exists_continues_numbering() {
        let orders = Table::new("orders").unwrap();
        let sub = select(&orders.field::<i64>("id"))
            .from(&orders)
            .where_(Condition::compare(&orders.field::<i32>("qty"), CompareOp::Gt, 5));
        let c = Condition::all(vec![
            Condition::compare(&field::<String>("name"), CompareOp::Eq, "x"),
            exists(sub),
        ]);
        assert_eq!(
            c.to_sql(),
            "name = $1 AND EXISTS (SELECT orders.id FROM orders WHERE orders.qty > $2)"
        );
    }

    #[test]
    fn quantified_operand() {
        let c = Condition::compare(
            &field::<i32>("score"),
            CompareOp::Gt,
            all(select(&field::<i32>("score")).from(&Table::new("rivals").unwrap())),
        );
        assert_eq!(c.to_sql(), "score > ALL (SELECT score FROM rivals)");
    }

    #[test]
    fn bad_column_fails_validation() {
        let q = select(&field::<i64>("not a column")).from(&Table::new("t").unwrap());
        assert!(q.validate().unwrap_err().is_validation());
        assert!(select_fields(&[]).validate().is_err());
    }

    #[test]
    fn record_set_values() {
        let set = RecordSet::<Record1<i64>>::from_values(vec![3, 1, 2]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.values(), &[3, 1, 2]);
        assert_eq!(set.into_values(), vec![3, 1, 2]);
    }
}

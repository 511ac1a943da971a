//! Boolean predicates.
//!
//! [`Condition`] is an immutable predicate tree. Conditions are created with
//! the associated constructors (`Condition::compare`, `Condition::in_values`,
//! ...) and combined with [`Condition::all`] / [`Condition::any`] /
//! [`Condition::negate`].
//!
//! The neutral condition ([`no_condition`]) is absorbed by every combinator,
//! so callers can fold optional filters together without branching:
//!
//! ```ignore
//! let filter = Condition::all(vec![
//!     no_condition(),
//!     Condition::compare(&age, CompareOp::Ge, 18),
//! ]);
//! assert_eq!(filter.to_sql(), "age >= $1");
//! ```

use crate::error::DslResult;
use crate::expr::Node;
use crate::field::{Field, IntoOperand};
use crate::param::{Param, ParamList};
use crate::query::{SqlQb, first_error};
use crate::select::{Record1, Select, SelectQuery};
use tokio_postgres::types::ToSql;

/// Binary predicate operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    IsDistinctFrom,
    IsNotDistinctFrom,
    Like,
    NotLike,
    /// `ILIKE`
    LikeIgnoreCase,
    /// `NOT ILIKE`
    NotLikeIgnoreCase,
    /// POSIX regex match: `~`
    LikeRegex,
    /// `!~`
    NotLikeRegex,
    SimilarTo,
    NotSimilarTo,
}

impl CompareOp {
    /// The SQL operator text.
    pub fn sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::IsDistinctFrom => "IS DISTINCT FROM",
            CompareOp::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::LikeIgnoreCase => "ILIKE",
            CompareOp::NotLikeIgnoreCase => "NOT ILIKE",
            CompareOp::LikeRegex => "~",
            CompareOp::NotLikeRegex => "!~",
            CompareOp::SimilarTo => "SIMILAR TO",
            CompareOp::NotSimilarTo => "NOT SIMILAR TO",
        }
    }
}

/// Where a substring must occur for [`Condition::text_match`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextMatch {
    Contains,
    StartsWith,
    EndsWith,
}

/// Options for `BETWEEN` predicates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BetweenKind {
    pub symmetric: bool,
    pub negated: bool,
}

/// Escape character used by the LIKE helpers.
const LIKE_ESCAPE: &str = "!";

#[derive(Clone, Debug)]
enum Cond {
    /// Neutral element: vanishes inside AND/OR and from WHERE clauses.
    NoCondition,
    True,
    False,
    And(Vec<Cond>),
    Or(Vec<Cond>),
    Not(Box<Cond>),
    Compare {
        lhs: Node,
        op: &'static str,
        rhs: Node,
        escape: bool,
    },
    NullCheck {
        operand: Node,
        is_null: bool,
    },
    InList {
        operand: Node,
        values: Vec<Node>,
        negated: bool,
    },
    InSelect {
        operand: Node,
        select: Box<SelectQuery>,
        negated: bool,
    },
    Between {
        operand: Node,
        low: Node,
        high: Node,
        kind: BetweenKind,
    },
    Exists {
        select: Box<SelectQuery>,
        negated: bool,
    },
    /// A boolean expression used as a predicate.
    Field(Node),
    /// `?` placeholders replaced by `$n` at build time.
    Template {
        sql: String,
        params: Vec<Param>,
    },
}

/// An immutable SQL predicate.
#[derive(Clone, Debug)]
pub struct Condition(Cond);

/// The neutral condition: always satisfied, and dropped when combined.
pub fn no_condition() -> Condition {
    Condition(Cond::NoCondition)
}

/// `1=1`
pub fn true_condition() -> Condition {
    Condition(Cond::True)
}

/// `1=0`
pub fn false_condition() -> Condition {
    Condition(Cond::False)
}

/// `EXISTS (SELECT ...)`
pub fn exists<R>(select: Select<R>) -> Condition {
    Condition(Cond::Exists {
        select: Box::new(select.into_query()),
        negated: false,
    })
}

/// `NOT EXISTS (SELECT ...)`
pub fn not_exists<R>(select: Select<R>) -> Condition {
    Condition(Cond::Exists {
        select: Box::new(select.into_query()),
        negated: true,
    })
}

/// Plain SQL condition with `?` placeholders.
///
/// ```ignore
/// let c = plain_sql_with("age > ? OR vip", vec![Param::new(18i32)]);
/// ```
pub fn plain_sql_with(sql: impl Into<String>, params: Vec<Param>) -> Condition {
    Condition(Cond::Template {
        sql: sql.into(),
        params,
    })
}

/// Plain SQL condition without parameters.
pub fn plain_sql(sql: impl Into<String>) -> Condition {
    plain_sql_with(sql, Vec::new())
}

impl Condition {
    /// Whether this is the neutral condition (or a group made only of it).
    pub fn is_no_condition(&self) -> bool {
        self.0.is_empty()
    }

    /// AND all conditions together, dropping neutral ones and flattening
    /// nested AND groups. An empty input yields the neutral condition.
    pub fn all(conditions: Vec<Condition>) -> Condition {
        let mut parts = Vec::with_capacity(conditions.len());
        for c in conditions {
            match c.0 {
                Cond::And(inner) => parts.extend(inner.into_iter().filter(|c| !c.is_empty())),
                other if other.is_empty() => {}
                other => parts.push(other),
            }
        }
        Condition(collapse(parts, Cond::And))
    }

    /// OR all conditions together, dropping neutral ones and flattening
    /// nested OR groups. An empty input yields the neutral condition.
    pub fn any(conditions: Vec<Condition>) -> Condition {
        let mut parts = Vec::with_capacity(conditions.len());
        for c in conditions {
            match c.0 {
                Cond::Or(inner) => parts.extend(inner.into_iter().filter(|c| !c.is_empty())),
                other if other.is_empty() => {}
                other => parts.push(other),
            }
        }
        Condition(collapse(parts, Cond::Or))
    }

    /// `NOT (...)`. Negating the neutral condition yields it unchanged.
    pub fn negate(condition: Condition) -> Condition {
        match condition.0 {
            c if c.is_empty() => no_condition(),
            Cond::Not(inner) => Condition(*inner),
            c => Condition(Cond::Not(Box::new(c))),
        }
    }

    /// A `Field<bool>` used as a predicate.
    pub fn from_field(field: Field<bool>) -> Condition {
        Condition(Cond::Field(field.into_node()))
    }

    /// `field <op> operand`
    pub fn compare<T>(field: &Field<T>, op: CompareOp, operand: impl IntoOperand<T>) -> Condition {
        Condition(Cond::Compare {
            lhs: field.node().clone(),
            op: op.sql(),
            rhs: operand.into_operand().into_node(),
            escape: false,
        })
    }

    /// `field IS NULL`
    pub fn is_null<T>(field: &Field<T>) -> Condition {
        Condition(Cond::NullCheck {
            operand: field.node().clone(),
            is_null: true,
        })
    }

    /// `field IS NOT NULL`
    pub fn is_not_null<T>(field: &Field<T>) -> Condition {
        Condition(Cond::NullCheck {
            operand: field.node().clone(),
            is_null: false,
        })
    }

    /// Substring match with LIKE wildcards in the operand escaped.
    ///
    /// Escaping happens in SQL (`replace(...)`), so bound values and other
    /// fields behave the same way.
    pub fn text_match<T>(
        field: &Field<T>,
        kind: TextMatch,
        operand: impl IntoOperand<T>,
        ignore_case: bool,
        negated: bool,
    ) -> Condition {
        let escaped = escape_like(operand.into_operand().into_node());
        let percent = || Node::Inline("'%'".to_string());
        let pattern = match kind {
            TextMatch::Contains => {
                Node::binary(Node::binary(percent(), "||", escaped), "||", percent())
            }
            TextMatch::StartsWith => Node::binary(escaped, "||", percent()),
            TextMatch::EndsWith => Node::binary(percent(), "||", escaped),
        };
        let op = match (ignore_case, negated) {
            (false, false) => CompareOp::Like,
            (false, true) => CompareOp::NotLike,
            (true, false) => CompareOp::LikeIgnoreCase,
            (true, true) => CompareOp::NotLikeIgnoreCase,
        };
        Condition(Cond::Compare {
            lhs: field.node().clone(),
            op: op.sql(),
            rhs: pattern,
            escape: true,
        })
    }

    /// `lower(field) = lower(operand)`, or `<>` when `negated`.
    pub fn equal_ignore_case(
        field: &Field<String>,
        operand: impl IntoOperand<String>,
        negated: bool,
    ) -> Condition {
        let op = if negated { CompareOp::Ne } else { CompareOp::Eq };
        Condition(Cond::Compare {
            lhs: Node::func("lower", vec![field.node().clone()]),
            op: op.sql(),
            rhs: Node::func("lower", vec![operand.into_operand().into_node()]),
            escape: false,
        })
    }

    /// `field IN (v1, v2, ...)`. An empty list yields `1=0`.
    pub fn in_values<T, I>(field: &Field<T>, values: I) -> Condition
    where
        I: IntoIterator,
        I::Item: IntoOperand<T>,
    {
        in_list(field, values, false)
    }

    /// `field NOT IN (v1, v2, ...)`. An empty list yields `1=1`.
    pub fn not_in_values<T, I>(field: &Field<T>, values: I) -> Condition
    where
        I: IntoIterator,
        I::Item: IntoOperand<T>,
    {
        in_list(field, values, true)
    }

    /// `field IN (SELECT ...)`
    pub fn in_select<T>(field: &Field<T>, select: Select<Record1<T>>) -> Condition {
        Condition(Cond::InSelect {
            operand: field.node().clone(),
            select: Box::new(select.into_query()),
            negated: false,
        })
    }

    /// `field NOT IN (SELECT ...)`
    pub fn not_in_select<T>(field: &Field<T>, select: Select<Record1<T>>) -> Condition {
        Condition(Cond::InSelect {
            operand: field.node().clone(),
            select: Box::new(select.into_query()),
            negated: true,
        })
    }

    /// `field [NOT] BETWEEN [SYMMETRIC] low AND high`
    pub fn between<T>(
        field: &Field<T>,
        low: impl IntoOperand<T>,
        high: impl IntoOperand<T>,
        kind: BetweenKind,
    ) -> Condition {
        Condition(Cond::Between {
            operand: field.node().clone(),
            low: low.into_operand().into_node(),
            high: high.into_operand().into_node(),
            kind,
        })
    }

    /// First deferred error in this condition.
    pub(crate) fn first_error(&self) -> Option<String> {
        self.0.first_error()
    }

    /// Render as a predicate fragment; the neutral condition renders empty.
    pub(crate) fn build_fragment(&self, params: &mut ParamList) -> String {
        self.0.build(params)
    }

    /// Render standalone; the neutral condition renders `1=1`.
    pub(crate) fn build_standalone(&self, params: &mut ParamList) -> String {
        if self.0.is_empty() {
            "1=1".to_string()
        } else {
            self.0.build(params)
        }
    }
}

fn collapse(mut parts: Vec<Cond>, group: fn(Vec<Cond>) -> Cond) -> Cond {
    match parts.len() {
        0 => Cond::NoCondition,
        1 => parts.remove(0),
        _ => group(parts),
    }
}

fn in_list<T, I>(field: &Field<T>, values: I, negated: bool) -> Condition
where
    I: IntoIterator,
    I::Item: IntoOperand<T>,
{
    let values: Vec<Node> = values
        .into_iter()
        .map(|v| v.into_operand().into_node())
        .collect();
    if values.is_empty() {
        return if negated {
            true_condition()
        } else {
            false_condition()
        };
    }
    Condition(Cond::InList {
        operand: field.node().clone(),
        values,
        negated,
    })
}

/// `replace(replace(replace(x, '!', '!!'), '%', '!%'), '_', '!_')`
fn escape_like(node: Node) -> Node {
    let lit = |s: &str| Node::Inline(format!("'{}'", s));
    let mut escaped = node;
    for ch in [LIKE_ESCAPE, "%", "_"] {
        escaped = Node::func(
            "replace",
            vec![escaped, lit(ch), lit(&format!("{}{}", LIKE_ESCAPE, ch))],
        );
    }
    escaped
}

impl Cond {
    fn is_empty(&self) -> bool {
        match self {
            Cond::NoCondition => true,
            Cond::And(items) | Cond::Or(items) => items.iter().all(Cond::is_empty),
            Cond::Not(inner) => inner.is_empty(),
            _ => false,
        }
    }

    fn first_error(&self) -> Option<String> {
        match self {
            Cond::And(items) | Cond::Or(items) => items.iter().find_map(Cond::first_error),
            Cond::Not(inner) => inner.first_error(),
            Cond::Compare { lhs, rhs, .. } => lhs.first_error().or_else(|| rhs.first_error()),
            Cond::NullCheck { operand, .. } | Cond::Field(operand) => operand.first_error(),
            Cond::InList { operand, values, .. } => operand
                .first_error()
                .or_else(|| values.iter().find_map(Node::first_error)),
            Cond::InSelect {
                operand, select, ..
            } => operand.first_error().or_else(|| select.first_error()),
            Cond::Between {
                operand, low, high, ..
            } => operand
                .first_error()
                .or_else(|| low.first_error())
                .or_else(|| high.first_error()),
            Cond::Exists { select, .. } => select.first_error(),
            Cond::NoCondition | Cond::True | Cond::False | Cond::Template { .. } => None,
        }
    }

    fn build(&self, params: &mut ParamList) -> String {
        match self {
            Cond::NoCondition => String::new(),
            Cond::True => "1=1".to_string(),
            Cond::False => "1=0".to_string(),
            Cond::And(items) => build_group(items, " AND ", params),
            Cond::Or(items) => build_group(items, " OR ", params),
            Cond::Not(inner) => {
                let sql = inner.build(params);
                if sql.is_empty() {
                    sql
                } else {
                    format!("NOT ({})", sql)
                }
            }
            Cond::Compare {
                lhs,
                op,
                rhs,
                escape,
            } => {
                let lhs = lhs.build(params);
                let rhs = rhs.build(params);
                if *escape {
                    format!("{} {} {} ESCAPE '{}'", lhs, op, rhs, LIKE_ESCAPE)
                } else {
                    format!("{} {} {}", lhs, op, rhs)
                }
            }
            Cond::NullCheck { operand, is_null } => {
                let operand = operand.build(params);
                if *is_null {
                    format!("{} IS NULL", operand)
                } else {
                    format!("{} IS NOT NULL", operand)
                }
            }
            Cond::InList {
                operand,
                values,
                negated,
            } => {
                let operand = operand.build(params);
                let values: Vec<String> = values.iter().map(|v| v.build(params)).collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", operand, op, values.join(", "))
            }
            Cond::InSelect {
                operand,
                select,
                negated,
            } => {
                let operand = operand.build(params);
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", operand, op, select.build(params))
            }
            Cond::Between {
                operand,
                low,
                high,
                kind,
            } => {
                let operand = operand.build(params);
                let low = low.build(params);
                let high = high.build(params);
                let op = match (kind.negated, kind.symmetric) {
                    (false, false) => "BETWEEN",
                    (false, true) => "BETWEEN SYMMETRIC",
                    (true, false) => "NOT BETWEEN",
                    (true, true) => "NOT BETWEEN SYMMETRIC",
                };
                format!("{} {} {} AND {}", operand, op, low, high)
            }
            Cond::Exists { select, negated } => {
                let op = if *negated { "NOT EXISTS" } else { "EXISTS" };
                format!("{} ({})", op, select.build(params))
            }
            Cond::Field(node) => node.build(params),
            Cond::Template {
                sql,
                params: template_params,
            } => {
                let mut out = String::with_capacity(sql.len());
                let mut next = template_params.iter().peekable();
                for ch in sql.chars() {
                    match (ch, next.next_if(|_| ch == '?')) {
                        (_, Some(p)) => out.push_str(&format!("${}", params.push(p.clone()))),
                        (ch, None) => out.push(ch),
                    }
                }
                out
            }
        }
    }
}

impl Cond {
    /// Whether this must be parenthesised when joined with AND/OR.
    /// Plain SQL text and arbitrary boolean expressions may carry their own
    /// top-level AND/OR.
    fn needs_group_parens(&self) -> bool {
        match self {
            Cond::And(_) | Cond::Or(_) | Cond::Template { .. } => true,
            Cond::Field(node) => !matches!(
                node,
                Node::Column { .. } | Node::Bind(_) | Node::Func { .. } | Node::Binary { .. }
            ),
            _ => false,
        }
    }
}

fn build_group(items: &[Cond], sep: &str, params: &mut ParamList) -> String {
    let parts: Vec<String> = items
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| {
            let sql = c.build(params);
            if c.needs_group_parens() { format!("({})", sql) } else { sql }
        })
        .collect();
    parts.join(sep)
}

impl SqlQb for Condition {
    fn render(&self, params: &mut ParamList) -> String {
        self.build_standalone(params)
    }

    fn validate(&self) -> DslResult<()> {
        first_error([self.first_error()])
    }
}

/// Conversion into a [`Condition`].
///
/// Implemented for conditions, boolean fields and plain SQL strings so that
/// combinators accept all three.
pub trait IntoCondition {
    fn into_condition(self) -> Condition;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Condition {
        self
    }
}

impl IntoCondition for Field<bool> {
    fn into_condition(self) -> Condition {
        Condition::from_field(self)
    }
}

impl IntoCondition for &Field<bool> {
    fn into_condition(self) -> Condition {
        Condition::from_field(self.clone())
    }
}

impl IntoCondition for &str {
    fn into_condition(self) -> Condition {
        plain_sql(self)
    }
}

impl IntoCondition for String {
    fn into_condition(self) -> Condition {
        plain_sql(self)
    }
}

/// Bind a plain value for [`plain_sql_with`].
pub fn bind<T: ToSql + Send + Sync + 'static>(value: T) -> Param {
    Param::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{field, inline_sql};

    fn render(c: &Condition) -> (String, usize) {
        let mut params = ParamList::new();
        let sql = c.build_standalone(&mut params);
        (sql, params.len())
    }

    #[test]
    fn neutral_is_absorbed() {
        let age = field::<i32>("age");
        let c = Condition::all(vec![
            no_condition(),
            Condition::compare(&age, CompareOp::Ge, 18),
            no_condition(),
        ]);
        assert_eq!(render(&c), ("age >= $1".to_string(), 1));

        let c = Condition::any(vec![no_condition(), no_condition()]);
        assert!(c.is_no_condition());
        assert_eq!(render(&c).0, "1=1");
    }

    #[test]
    fn negate_neutral_stays_neutral() {
        assert!(Condition::negate(no_condition()).is_no_condition());
    }

    #[test]
    fn double_negation_cancels() {
        let flag = field::<bool>("active");
        let c = Condition::negate(Condition::negate(Condition::from_field(flag)));
        assert_eq!(render(&c).0, "active");
    }

    #[test]
    fn nested_groups_are_parenthesised() {
        let role = field::<String>("role");
        let status = field::<String>("status");
        let c = Condition::all(vec![
            Condition::compare(&status, CompareOp::Eq, "active"),
            Condition::any(vec![
                Condition::compare(&role, CompareOp::Eq, "admin"),
                Condition::compare(&role, CompareOp::Eq, "owner"),
            ]),
        ]);
        assert_eq!(
            render(&c),
            ("status = $1 AND (role = $2 OR role = $3)".to_string(), 3)
        );
    }

    #[test]
    fn all_flattens_and_groups() {
        let a = field::<i32>("a");
        let inner = Condition::all(vec![
            Condition::compare(&a, CompareOp::Gt, 1),
            Condition::compare(&a, CompareOp::Lt, 9),
        ]);
        let c = Condition::all(vec![inner, Condition::is_not_null(&a)]);
        assert_eq!(render(&c).0, "a > $1 AND a < $2 AND a IS NOT NULL");
    }

    #[test]
    fn empty_in_lists() {
        let id = field::<i64>("id");
        assert_eq!(render(&Condition::in_values(&id, Vec::<i64>::new())).0, "1=0");
        assert_eq!(render(&Condition::not_in_values(&id, Vec::<i64>::new())).0, "1=1");
    }

    #[test]
    fn in_values_mixes_fields_and_values() {
        let id = field::<i64>("id");
        let other = field::<i64>("owner_id");
        let c = Condition::in_values(&id, vec![other]);
        assert_eq!(render(&c).0, "id IN (owner_id)");
        let c = Condition::in_values(&id, [1i64, 2, 3]);
        assert_eq!(render(&c), ("id IN ($1, $2, $3)".to_string(), 3));
    }

    #[test]
    fn between_variants() {
        let n = field::<i32>("n");
        let kind = BetweenKind {
            symmetric: true,
            negated: true,
        };
        let c = Condition::between(&n, 10, 1, kind);
        assert_eq!(render(&c).0, "n NOT BETWEEN SYMMETRIC $1 AND $2");
    }

    #[test]
    fn text_match_escapes_in_sql() {
        let name = field::<String>("name");
        let c = Condition::text_match(&name, TextMatch::StartsWith, "a_b", true, false);
        assert_eq!(
            render(&c).0,
            "name ILIKE (replace(replace(replace($1, '!', '!!'), '%', '!%'), '_', '!_') || '%') ESCAPE '!'"
        );
    }

    #[test]
    fn equal_ignore_case_lowers_both_sides() {
        let email = field::<String>("email");
        let c = Condition::equal_ignore_case(&email, "A@B.C", false);
        assert_eq!(render(&c).0, "lower(email) = lower($1)");
    }

    #[test]
    fn template_numbers_placeholders() {
        let c = Condition::all(vec![
            Condition::compare(&field::<i32>("a"), CompareOp::Eq, 1),
            plain_sql_with("b = ? OR c = ?", vec![bind(2i32), bind(3i32)]),
        ]);
        assert_eq!(render(&c), ("a = $1 AND (b = $2 OR c = $3)".to_string(), 3));
    }

    #[test]
    fn plain_sql_keeps_its_own_precedence_in_groups() {
        let a = field::<i32>("a");
        let c = Condition::all(vec![
            Condition::compare(&a, CompareOp::Eq, 1),
            "b = 2 OR c = 3".into_condition(),
        ]);
        assert_eq!(render(&c).0, "a = $1 AND (b = 2 OR c = 3)");

        let c = Condition::all(vec![
            Condition::any(vec![
                Condition::compare(&a, CompareOp::Eq, 1),
                String::from("b = 2 AND c = 3").into_condition(),
            ]),
            Condition::compare(&a, CompareOp::Lt, 9),
        ]);
        assert_eq!(render(&c).0, "(a = $1 OR (b = 2 AND c = 3)) AND a < $2");
    }

    #[test]
    fn inline_boolean_expression_is_grouped() {
        let a = field::<i32>("a");
        let c = Condition::any(vec![
            Condition::compare(&a, CompareOp::Eq, 1),
            Condition::from_field(inline_sql::<bool>("x OR y")),
            Condition::from_field(field::<bool>("active")),
        ]);
        assert_eq!(render(&c).0, "a = $1 OR (x OR y) OR active");
    }

    #[test]
    fn string_into_condition_is_plain_sql() {
        let c = "deleted_at IS NULL".into_condition();
        assert_eq!(render(&c).0, "deleted_at IS NULL");
    }
}

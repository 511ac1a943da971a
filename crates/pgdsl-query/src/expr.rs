//! Untyped expression nodes shared by fields, conditions and statements.
//!
//! Rendering is a single depth-first pass that pushes bound values into a
//! [`ParamList`] and writes the matching `$n`, so nested subqueries and
//! combined conditions never need placeholder renumbering.

use crate::ident::Ident;
use crate::param::{Param, ParamList};
use crate::select::SelectQuery;

/// `ANY` / `ALL` quantifier for a subquery operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
}

impl Quantifier {
    fn sql(self) -> &'static str {
        match self {
            Quantifier::Any => "ANY",
            Quantifier::All => "ALL",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Node {
    /// `table.column` or `column`
    Column {
        table: Option<Ident>,
        column: Ident,
    },
    /// `$n`
    Bind(Param),
    /// SQL text copied verbatim.
    Inline(String),
    /// `name(arg, ...)`
    Func { name: &'static str, args: Vec<Node> },
    /// `(lhs op rhs)`
    Binary {
        lhs: Box<Node>,
        op: &'static str,
        rhs: Box<Node>,
    },
    /// `op<operand>`, e.g. `~(a & b)`
    Prefix { op: &'static str, operand: Box<Node> },
    /// `CASE subject WHEN .. THEN .. END`
    Case {
        subject: Box<Node>,
        arms: Vec<(Node, Node)>,
    },
    /// `(SELECT ...)`
    Subquery(Box<SelectQuery>),
    /// `ANY (SELECT ...)`
    Quantified {
        quantifier: Quantifier,
        select: Box<SelectQuery>,
    },
    /// A reference that failed to parse; reported by `validate`.
    Invalid(String),
}

impl Node {
    pub(crate) fn column(table: Option<Ident>, column: Ident) -> Self {
        Node::Column { table, column }
    }

    pub(crate) fn binary(lhs: Node, op: &'static str, rhs: Node) -> Self {
        Node::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub(crate) fn func(name: &'static str, args: Vec<Node>) -> Self {
        Node::Func { name, args }
    }

    /// Column name for INSERT column lists, SET targets and conflict targets.
    pub(crate) fn column_name(&self) -> Option<Ident> {
        match self {
            Node::Column { column, .. } => Some(column.unqualified()),
            _ => None,
        }
    }

    /// First deferred error found in this subtree.
    pub(crate) fn first_error(&self) -> Option<String> {
        match self {
            Node::Invalid(msg) => Some(msg.clone()),
            Node::Func { args, .. } => args.iter().find_map(Node::first_error),
            Node::Binary { lhs, rhs, .. } => lhs.first_error().or_else(|| rhs.first_error()),
            Node::Prefix { operand, .. } => operand.first_error(),
            Node::Case { subject, arms } => subject.first_error().or_else(|| {
                arms.iter()
                    .find_map(|(when, then)| when.first_error().or_else(|| then.first_error()))
            }),
            Node::Subquery(select) | Node::Quantified { select, .. } => select.first_error(),
            Node::Column { .. } | Node::Bind(_) | Node::Inline(_) => None,
        }
    }

    /// Render into SQL, binding values into `params`.
    pub(crate) fn build(&self, params: &mut ParamList) -> String {
        match self {
            Node::Column { table, column } => {
                let mut out = String::new();
                if let Some(table) = table {
                    table.write_sql(&mut out);
                    out.push('.');
                }
                column.write_sql(&mut out);
                out
            }
            Node::Bind(param) => format!("${}", params.push(param.clone())),
            Node::Inline(sql) => sql.clone(),
            Node::Func { name, args } => {
                let args: Vec<String> = args.iter().map(|a| a.build(params)).collect();
                format!("{}({})", name, args.join(", "))
            }
            Node::Binary { lhs, op, rhs } => {
                let lhs = lhs.build(params);
                let rhs = rhs.build(params);
                format!("({} {} {})", lhs, op, rhs)
            }
            Node::Prefix { op, operand } => format!("{}{}", op, operand.build(params)),
            Node::Case { subject, arms } => {
                let mut out = format!("CASE {}", subject.build(params));
                for (when, then) in arms {
                    let when = when.build(params);
                    let then = then.build(params);
                    out.push_str(&format!(" WHEN {} THEN {}", when, then));
                }
                out.push_str(" END");
                out
            }
            Node::Subquery(select) => format!("({})", select.build(params)),
            Node::Quantified { quantifier, select } => {
                format!("{} ({})", quantifier.sql(), select.build(params))
            }
            Node::Invalid(msg) => format!("/* invalid: {} */", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Node {
        Node::column(None, Ident::parse(name).unwrap())
    }

    #[test]
    fn binds_in_order() {
        let node = Node::binary(
            Node::Bind(Param::new(1i32)),
            "+",
            Node::binary(col("a"), "*", Node::Bind(Param::new(2i32))),
        );
        let mut params = ParamList::new();
        assert_eq!(node.build(&mut params), "($1 + (a * $2))");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn prefix_wraps_binary() {
        let node = Node::Prefix {
            op: "~",
            operand: Box::new(Node::binary(col("flags"), "&", Node::Bind(Param::new(4i32)))),
        };
        let mut params = ParamList::new();
        assert_eq!(node.build(&mut params), "~(flags & $1)");
    }

    #[test]
    fn case_arms() {
        let node = Node::Case {
            subject: Box::new(col("status")),
            arms: vec![
                (Node::Bind(Param::new("new")), Node::Inline("0".into())),
                (Node::Bind(Param::new("done")), Node::Inline("1".into())),
            ],
        };
        let mut params = ParamList::new();
        assert_eq!(
            node.build(&mut params),
            "CASE status WHEN $1 THEN 0 WHEN $2 THEN 1 END"
        );
    }

    #[test]
    fn qualified_column_and_name() {
        let node = Node::column(
            Some(Ident::parse("public.users").unwrap()),
            Ident::parse("email").unwrap(),
        );
        assert_eq!(node.build(&mut ParamList::new()), "public.users.email");
        assert_eq!(node.column_name().unwrap().to_sql(), "email");
    }

    #[test]
    fn invalid_is_reported() {
        let node = Node::func("lower", vec![Node::Invalid("bad column".into())]);
        assert_eq!(node.first_error().as_deref(), Some("bad column"));
    }
}

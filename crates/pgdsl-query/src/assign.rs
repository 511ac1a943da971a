//! SET-list storage shared by INSERT rows, UPDATE and ON CONFLICT DO UPDATE.

use crate::expr::Node;
use crate::param::ParamList;

/// Ordered `column = value` pairs.
#[derive(Clone, Debug, Default)]
pub(crate) struct SetList {
    items: Vec<(Node, Node)>,
}

impl SetList {
    pub(crate) fn push(&mut self, target: Node, value: Node) {
        self.items.push((target, value));
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Target column names, `None` for targets that are not columns.
    pub(crate) fn column_names(&self) -> Vec<Option<String>> {
        self.items
            .iter()
            .map(|(target, _)| target.column_name().map(|c| c.to_sql()))
            .collect()
    }

    pub(crate) fn first_error(&self) -> Option<String> {
        self.items.iter().find_map(|(target, value)| {
            target.first_error().or_else(|| value.first_error()).or_else(|| {
                target
                    .column_name()
                    .is_none()
                    .then(|| "assignment target must be a column".to_string())
            })
        })
    }

    /// `(a, b)` column list for INSERT.
    pub(crate) fn build_columns(&self) -> String {
        let names: Vec<String> = self
            .items
            .iter()
            .map(|(target, _)| column_sql(target))
            .collect();
        names.join(", ")
    }

    /// `$1, $2` value list for INSERT.
    pub(crate) fn build_values(&self, params: &mut ParamList) -> String {
        let values: Vec<String> = self.items.iter().map(|(_, v)| v.build(params)).collect();
        values.join(", ")
    }

    /// `a = $1, b = $2` for UPDATE SET.
    pub(crate) fn build_assignments(&self, params: &mut ParamList) -> String {
        let parts: Vec<String> = self
            .items
            .iter()
            .map(|(target, value)| format!("{} = {}", column_sql(target), value.build(params)))
            .collect();
        parts.join(", ")
    }
}

fn column_sql(target: &Node) -> String {
    match target.column_name() {
        Some(column) => column.to_sql(),
        None => target.build(&mut ParamList::new()),
    }
}

/// Generate `set`, `set_field` and `set_json` on a step that has
/// `fn assign(self, target: Node, value: Node) -> $next`.
macro_rules! impl_set_methods {
    ($step:ty => $next:ty) => {
        impl $step {
            /// Assign a value, another field or a subquery to `field`.
            pub fn set<T>(
                self,
                field: &$crate::field::Field<T>,
                value: impl $crate::field::IntoOperand<T>,
            ) -> $next {
                self.assign(field.node().clone(), value.into_operand().into_node())
            }

            /// Assign an expression to `field`.
            pub fn set_field<T>(
                self,
                field: &$crate::field::Field<T>,
                value: $crate::field::Field<T>,
            ) -> $next {
                self.assign(field.node().clone(), value.into_node())
            }

            /// Serialize `value` and assign it to a JSON column.
            pub fn set_json<S: serde::Serialize + ?Sized>(
                self,
                field: &$crate::field::Field<serde_json::Value>,
                value: &S,
            ) -> serde_json::Result<$next> {
                let json = serde_json::to_value(value)?;
                Ok(self.set(field, json))
            }
        }
    };
}

pub(crate) use impl_set_methods;

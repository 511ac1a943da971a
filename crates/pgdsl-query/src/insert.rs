//! INSERT step family.
//!
//! Each step is an immutable value; every call consumes the step and returns
//! the next one, so the compiler enforces clause order:
//!
//! ```ignore
//! let stmt = insert_into(&users)
//!     .set(&name, "alice")
//!     .set(&age, 30)
//!     .on_conflict(&[name.erase()])
//!     .do_update()
//!     .set_field(&age, excluded(&age))
//!     .returning(&[id.erase()]);
//! ```

use crate::assign::{SetList, impl_set_methods};
use crate::condition::{Condition, IntoCondition, no_condition};
use crate::error::DslResult;
use crate::expr::Node;
use crate::field::{AnyField, Table};
use crate::param::ParamList;
use crate::query::{SqlQb, first_error};

#[derive(Clone, Debug)]
enum ConflictAction {
    DoNothing,
    DoUpdate { set: SetList, where_: Condition },
}

#[derive(Clone, Debug)]
struct Conflict {
    target: Vec<Node>,
    action: ConflictAction,
}

#[derive(Clone, Debug)]
struct InsertState {
    table: Table,
    /// Value rows; the last one is the row being filled.
    rows: Vec<SetList>,
    conflict: Option<Conflict>,
    returning: Vec<Node>,
}

impl InsertState {
    fn filled_rows(&self) -> impl Iterator<Item = &SetList> {
        self.rows.iter().filter(|r| !r.is_empty())
    }

    fn current_row(&mut self) -> &mut SetList {
        if self.rows.is_empty() {
            self.rows.push(SetList::default());
        }
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    fn update_set(&mut self) -> Option<&mut SetList> {
        match &mut self.conflict {
            Some(Conflict {
                action: ConflictAction::DoUpdate { set, .. },
                ..
            }) => Some(set),
            _ => None,
        }
    }

    fn validate(&self) -> DslResult<()> {
        let mut errors = vec![self.filled_rows().find_map(SetList::first_error)];

        let mut rows = self.filled_rows();
        if let Some(first) = rows.next() {
            let columns = first.column_names();
            for (i, row) in rows.enumerate() {
                if row.column_names() != columns {
                    errors.push(Some(format!(
                        "INSERT row {} assigns different columns than row 1",
                        i + 2
                    )));
                }
            }
        }

        if let Some(conflict) = &self.conflict {
            errors.extend(conflict.target.iter().map(|t| {
                t.first_error().or_else(|| {
                    t.column_name()
                        .is_none()
                        .then(|| "ON CONFLICT target must be a column".to_string())
                })
            }));
            if let ConflictAction::DoUpdate { set, where_ } = &conflict.action {
                if conflict.target.is_empty() {
                    errors.push(Some(
                        "ON CONFLICT DO UPDATE requires a conflict target".to_string(),
                    ));
                }
                errors.push(set.first_error());
                errors.push(where_.first_error());
            }
        }
        errors.extend(self.returning.iter().map(Node::first_error));
        first_error(errors)
    }

    fn render(&self, params: &mut ParamList) -> String {
        let mut sql = String::from("INSERT INTO ");
        self.table.write_sql(&mut sql);

        let rows: Vec<&SetList> = self.filled_rows().collect();
        match rows.first() {
            None => sql.push_str(" DEFAULT VALUES"),
            Some(first) => {
                sql.push_str(&format!(" ({}) VALUES ", first.build_columns()));
                let values: Vec<String> = rows
                    .iter()
                    .map(|row| format!("({})", row.build_values(params)))
                    .collect();
                sql.push_str(&values.join(", "));
            }
        }

        if let Some(conflict) = &self.conflict {
            sql.push_str(" ON CONFLICT");
            if !conflict.target.is_empty() {
                let target: Vec<String> = conflict
                    .target
                    .iter()
                    .map(|t| match t.column_name() {
                        Some(c) => c.to_sql(),
                        None => t.build(params),
                    })
                    .collect();
                sql.push_str(&format!(" ({})", target.join(", ")));
            }
            match &conflict.action {
                ConflictAction::DoNothing => sql.push_str(" DO NOTHING"),
                ConflictAction::DoUpdate { set, where_ } => {
                    sql.push_str(" DO UPDATE SET ");
                    sql.push_str(&set.build_assignments(params));
                    let where_sql = where_.build_fragment(params);
                    if !where_sql.is_empty() {
                        sql.push_str(" WHERE ");
                        sql.push_str(&where_sql);
                    }
                }
            }
        }

        if !self.returning.is_empty() {
            let cols: Vec<String> = self.returning.iter().map(|c| c.build(params)).collect();
            sql.push_str(" RETURNING ");
            sql.push_str(&cols.join(", "));
        }
        sql
    }
}

/// `INSERT INTO table`
pub fn insert_into(table: &Table) -> InsertSetStep {
    InsertSetStep {
        state: InsertState {
            table: table.clone(),
            rows: vec![SetList::default()],
            conflict: None,
            returning: Vec::new(),
        },
    }
}

fn returning_nodes(fields: &[AnyField]) -> Vec<Node> {
    fields.iter().map(|f| f.node().clone()).collect()
}

/// An INSERT whose current row has no assignment yet.
#[derive(Clone, Debug)]
pub struct InsertSetStep {
    state: InsertState,
}

impl InsertSetStep {
    fn assign(mut self, target: Node, value: Node) -> InsertSetMoreStep {
        self.state.current_row().push(target, value);
        InsertSetMoreStep { state: self.state }
    }
}

impl_set_methods!(InsertSetStep => InsertSetMoreStep);

/// An INSERT with at least one assignment in the current row.
#[derive(Clone, Debug)]
pub struct InsertSetMoreStep {
    state: InsertState,
}

impl InsertSetMoreStep {
    fn assign(mut self, target: Node, value: Node) -> InsertSetMoreStep {
        self.state.current_row().push(target, value);
        self
    }

    /// Close the current row and start another `VALUES (...)` tuple.
    pub fn new_record(mut self) -> InsertSetStep {
        self.state.rows.push(SetList::default());
        InsertSetStep { state: self.state }
    }

    /// `ON CONFLICT (columns)`
    pub fn on_conflict(self, target: &[AnyField]) -> InsertOnConflictStep {
        InsertOnConflictStep {
            state: self.state,
            target: returning_nodes(target),
        }
    }

    /// `ON CONFLICT DO NOTHING` without a target.
    pub fn on_conflict_do_nothing(mut self) -> InsertReturningStep {
        self.state.conflict = Some(Conflict {
            target: Vec::new(),
            action: ConflictAction::DoNothing,
        });
        InsertReturningStep { state: self.state }
    }

    pub fn returning(mut self, fields: &[AnyField]) -> InsertReturningStep {
        self.state.returning = returning_nodes(fields);
        InsertReturningStep { state: self.state }
    }
}

impl_set_methods!(InsertSetMoreStep => InsertSetMoreStep);

/// `ON CONFLICT (target)` awaiting its action.
#[derive(Clone, Debug)]
pub struct InsertOnConflictStep {
    state: InsertState,
    target: Vec<Node>,
}

impl InsertOnConflictStep {
    pub fn do_nothing(mut self) -> InsertReturningStep {
        self.state.conflict = Some(Conflict {
            target: self.target,
            action: ConflictAction::DoNothing,
        });
        InsertReturningStep { state: self.state }
    }

    pub fn do_update(mut self) -> InsertOnDuplicateSetStep {
        self.state.conflict = Some(Conflict {
            target: self.target,
            action: ConflictAction::DoUpdate {
                set: SetList::default(),
                where_: no_condition(),
            },
        });
        InsertOnDuplicateSetStep { state: self.state }
    }
}

/// `ON CONFLICT ... DO UPDATE` with no assignment yet.
#[derive(Clone, Debug)]
pub struct InsertOnDuplicateSetStep {
    state: InsertState,
}

impl InsertOnDuplicateSetStep {
    fn assign(mut self, target: Node, value: Node) -> InsertOnDuplicateSetMoreStep {
        if let Some(set) = self.state.update_set() {
            set.push(target, value);
        }
        InsertOnDuplicateSetMoreStep { state: self.state }
    }
}

impl_set_methods!(InsertOnDuplicateSetStep => InsertOnDuplicateSetMoreStep);

/// `ON CONFLICT ... DO UPDATE SET ...`
#[derive(Clone, Debug)]
pub struct InsertOnDuplicateSetMoreStep {
    state: InsertState,
}

impl InsertOnDuplicateSetMoreStep {
    fn assign(mut self, target: Node, value: Node) -> InsertOnDuplicateSetMoreStep {
        if let Some(set) = self.state.update_set() {
            set.push(target, value);
        }
        self
    }

    /// Number of `DO UPDATE` assignments so far.
    pub fn assignment_count(&self) -> usize {
        match &self.state.conflict {
            Some(Conflict {
                action: ConflictAction::DoUpdate { set, .. },
                ..
            }) => set.len(),
            _ => 0,
        }
    }

    /// `DO UPDATE SET ... WHERE condition`
    pub fn where_(mut self, condition: impl IntoCondition) -> InsertReturningStep {
        if let Some(Conflict {
            action: ConflictAction::DoUpdate { where_, .. },
            ..
        }) = &mut self.state.conflict
        {
            *where_ = condition.into_condition();
        }
        InsertReturningStep { state: self.state }
    }

    pub fn returning(mut self, fields: &[AnyField]) -> InsertReturningStep {
        self.state.returning = returning_nodes(fields);
        InsertReturningStep { state: self.state }
    }
}

impl_set_methods!(InsertOnDuplicateSetMoreStep => InsertOnDuplicateSetMoreStep);

/// A complete INSERT that may still take a RETURNING list.
#[derive(Clone, Debug)]
pub struct InsertReturningStep {
    state: InsertState,
}

impl InsertReturningStep {
    /// Replace the RETURNING list.
    pub fn returning(mut self, fields: &[AnyField]) -> InsertReturningStep {
        self.state.returning = returning_nodes(fields);
        self
    }
}

macro_rules! impl_insert_qb {
    ($($step:ty),* $(,)?) => {
        $(
            impl SqlQb for $step {
                fn render(&self, params: &mut ParamList) -> String {
                    self.state.render(params)
                }

                fn validate(&self) -> DslResult<()> {
                    self.state.validate()
                }
            }
        )*
    };
}

impl_insert_qb!(
    InsertSetStep,
    InsertSetMoreStep,
    InsertOnDuplicateSetMoreStep,
    InsertReturningStep,
);

impl InsertSetMoreStep {
    /// Number of assignments in the current row.
    pub fn assignment_count(&self) -> usize {
        self.state.rows.last().map_or(0, SetList::len)
    }
}

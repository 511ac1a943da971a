//! UPDATE step family.

use crate::assign::{SetList, impl_set_methods};
use crate::condition::{Condition, IntoCondition, no_condition};
use crate::error::DslResult;
use crate::expr::Node;
use crate::field::{AnyField, Table};
use crate::param::ParamList;
use crate::query::{SqlQb, first_error};

#[derive(Clone, Debug)]
struct UpdateState {
    table: Table,
    set: SetList,
    where_: Condition,
    returning: Vec<Node>,
}

impl UpdateState {
    fn validate(&self) -> DslResult<()> {
        let mut errors = vec![
            self.set
                .is_empty()
                .then(|| "UPDATE requires at least one SET assignment".to_string()),
            self.set.first_error(),
            self.where_.first_error(),
        ];
        errors.extend(self.returning.iter().map(Node::first_error));
        first_error(errors)
    }

    fn render(&self, params: &mut ParamList) -> String {
        let mut sql = String::from("UPDATE ");
        self.table.write_sql(&mut sql);
        sql.push_str(" SET ");
        sql.push_str(&self.set.build_assignments(params));

        let where_sql = self.where_.build_fragment(params);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.returning.is_empty() {
            let cols: Vec<String> = self.returning.iter().map(|c| c.build(params)).collect();
            sql.push_str(" RETURNING ");
            sql.push_str(&cols.join(", "));
        }
        sql
    }
}

/// `UPDATE table`
pub fn update(table: &Table) -> UpdateSetStep {
    UpdateSetStep {
        state: UpdateState {
            table: table.clone(),
            set: SetList::default(),
            where_: no_condition(),
            returning: Vec::new(),
        },
    }
}

/// An UPDATE with no assignment yet.
#[derive(Clone, Debug)]
pub struct UpdateSetStep {
    state: UpdateState,
}

impl UpdateSetStep {
    fn assign(mut self, target: Node, value: Node) -> UpdateSetMoreStep {
        self.state.set.push(target, value);
        UpdateSetMoreStep { state: self.state }
    }
}

impl_set_methods!(UpdateSetStep => UpdateSetMoreStep);

/// `UPDATE table SET ...`
#[derive(Clone, Debug)]
pub struct UpdateSetMoreStep {
    state: UpdateState,
}

impl UpdateSetMoreStep {
    fn assign(mut self, target: Node, value: Node) -> UpdateSetMoreStep {
        self.state.set.push(target, value);
        self
    }

    /// Number of SET assignments so far.
    pub fn assignment_count(&self) -> usize {
        self.state.set.len()
    }

    pub fn where_(mut self, condition: impl IntoCondition) -> UpdateConditionStep {
        self.state.where_ = condition.into_condition();
        UpdateConditionStep { state: self.state }
    }

    pub fn returning(mut self, fields: &[AnyField]) -> UpdateReturningStep {
        self.state.returning = fields.iter().map(|f| f.node().clone()).collect();
        UpdateReturningStep { state: self.state }
    }
}

impl_set_methods!(UpdateSetMoreStep => UpdateSetMoreStep);

/// `UPDATE ... WHERE ...`
#[derive(Clone, Debug)]
pub struct UpdateConditionStep {
    state: UpdateState,
}

impl UpdateConditionStep {
    /// AND another condition onto the WHERE clause.
    pub fn and_where(mut self, condition: impl IntoCondition) -> Self {
        let current = std::mem::replace(&mut self.state.where_, no_condition());
        self.state.where_ = Condition::all(vec![current, condition.into_condition()]);
        self
    }

    pub fn returning(mut self, fields: &[AnyField]) -> UpdateReturningStep {
        self.state.returning = fields.iter().map(|f| f.node().clone()).collect();
        UpdateReturningStep { state: self.state }
    }
}

/// `UPDATE ... RETURNING ...`
#[derive(Clone, Debug)]
pub struct UpdateReturningStep {
    state: UpdateState,
}

macro_rules! impl_update_qb {
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

impl_update_qb!(UpdateSetMoreStep, UpdateConditionStep, UpdateReturningStep);

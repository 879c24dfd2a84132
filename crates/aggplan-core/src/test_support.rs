//! Shared fixtures for planner unit tests.

use crate::{
    forge::{AccessorSlotPair, AggregationForges, ForgeTables},
    plan::{ColumnAggregationRequest, GroupingDescription, LevelDescription},
};
use std::sync::Arc;

///
/// TestForges
///
/// Forge family over string handles. Partition keys compare by name; every
/// `Arc<str>` factory is its own identity regardless of its text.
///

#[derive(Debug)]
pub(crate) struct TestForges;

impl AggregationForges for TestForges {
    type ExprNode = &'static str;
    type ExprForge = String;
    type MethodFactory = str;
    type StateFactory = str;
    type Accessor = &'static str;
    type AggregateNode = &'static str;

    fn forge(expr: &Self::ExprNode) -> Self::ExprForge {
        format!("forge({expr})")
    }
}

///
/// TableFixture
///
/// Owned global computation arrays for one test statement.
///

pub(crate) struct TableFixture {
    pub(crate) method_forges: Vec<Arc<[String]>>,
    pub(crate) method_factories: Vec<Arc<str>>,
    pub(crate) state_factories: Vec<Arc<str>>,
    pub(crate) accessors: Vec<AccessorSlotPair<&'static str>>,
}

impl TableFixture {
    /// `methods` method columns, one distinct state factory per name in
    /// `states`, and one access column per `(absolute_slot, accessor)`.
    pub(crate) fn new(
        methods: usize,
        states: &[&str],
        accessors: &[(usize, &'static str)],
    ) -> Self {
        Self {
            method_forges: (0..methods)
                .map(|column| Arc::from(vec![format!("arg{column}")]))
                .collect(),
            method_factories: (0..methods)
                .map(|column| Arc::from(format!("sum{column}")))
                .collect(),
            state_factories: states.iter().map(|name| Arc::from(*name)).collect(),
            accessors: accessors
                .iter()
                .map(|(slot, accessor)| AccessorSlotPair::new(*slot, *accessor))
                .collect(),
        }
    }

    pub(crate) fn tables(&self) -> ForgeTables<'_, TestForges> {
        ForgeTables::new(
            &self.method_forges,
            &self.method_factories,
            &self.state_factories,
            &self.accessors,
        )
        .expect("fixture method arrays must agree")
    }
}

/// One level partitioned by `keys` and aggregating `columns`.
pub(crate) fn level(keys: &[&'static str], columns: &[usize]) -> LevelDescription<TestForges> {
    LevelDescription::new(
        keys.to_vec(),
        columns
            .iter()
            .map(|column| ColumnAggregationRequest::new(*column, "agg"))
            .collect(),
    )
}

pub(crate) fn grouping(
    num_columns: usize,
    levels: Vec<LevelDescription<TestForges>>,
) -> GroupingDescription<TestForges> {
    GroupingDescription::new(num_columns, levels)
}

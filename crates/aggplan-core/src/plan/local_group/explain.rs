//! Deterministic, serializable projection of a local group-by plan.

use crate::{
    forge::AggregationForges,
    plan::{
        QueryMode,
        local_group::{ColumnSlot, LocalGroupByLevel, LocalGroupByPlan, PlanTotals},
    },
};
use serde::Serialize;

///
/// ExplainLocalGroupByPlan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExplainLocalGroupByPlan {
    pub totals: PlanTotals,
    pub mode: QueryMode,
    pub top_level: Option<ExplainLocalGroupByLevel>,
    pub levels: Vec<ExplainLocalGroupByLevel>,
    pub columns: Vec<ExplainLocalGroupByColumn>,
}

///
/// ExplainLocalGroupByLevel
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExplainLocalGroupByLevel {
    pub level_number: i32,
    pub default_level: bool,
    pub partition_keys: usize,
    pub methods: usize,
    pub states: usize,
}

///
/// ExplainLocalGroupByColumn
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExplainLocalGroupByColumn {
    pub column: usize,
    pub level_number: i32,
    pub default_level: bool,
    pub slot: ExplainColumnSlot,
}

///
/// ExplainColumnSlot
///
/// Accessors are opaque; only the relative slot is projected.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplainColumnSlot {
    Method { offset: usize },
    Access { slot: usize },
}

impl<F: AggregationForges> LocalGroupByPlan<F> {
    /// Project this plan into its explain form.
    #[must_use]
    pub fn explain(&self) -> ExplainLocalGroupByPlan {
        let columns = self
            .columns()
            .iter()
            .enumerate()
            .map(|(column, entry)| ExplainLocalGroupByColumn {
                column,
                level_number: entry.level_number().get(),
                default_level: entry.is_default_level(),
                slot: match entry.slot() {
                    ColumnSlot::Method { offset } => ExplainColumnSlot::Method { offset: *offset },
                    ColumnSlot::Access(pair) => ExplainColumnSlot::Access { slot: pair.slot() },
                },
            })
            .collect();

        ExplainLocalGroupByPlan {
            totals: self.totals(),
            mode: self.mode(),
            top_level: self.optional_top_level().map(explain_level),
            levels: self.levels().iter().map(explain_level).collect(),
            columns,
        }
    }
}

fn explain_level<F: AggregationForges>(level: &LocalGroupByLevel<F>) -> ExplainLocalGroupByLevel {
    let totals = level.totals();

    ExplainLocalGroupByLevel {
        level_number: level.level_number().get(),
        default_level: level.is_default_level(),
        partition_keys: level.partition_forges().len(),
        methods: totals.num_methods,
        states: totals.num_accesses,
    }
}

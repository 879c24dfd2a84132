//! Module: plan::local_group
//! Responsibility: local group-by aggregation-state planning across grouping levels.
//! Does not own: aggregation function semantics or runtime state allocation.
//! Boundary: grouping description + global forge tables in, immutable routing plan out.

mod analyzer;
mod compare;
mod error;
mod explain;
mod level;
#[cfg(test)]
mod tests;
mod types;

pub use analyzer::analyze;
pub use compare::deep_equals_ignore_dup_and_order;
pub use error::LocalGroupPlanError;
pub use explain::{
    ExplainColumnSlot, ExplainLocalGroupByColumn, ExplainLocalGroupByLevel,
    ExplainLocalGroupByPlan,
};
pub use level::{ColumnPlanBuffer, build_level};
pub use types::{
    ColumnAggregationRequest, ColumnSlot, GroupingDescription, LevelDescription, LevelNumber,
    LocalGroupByColumn, LocalGroupByLevel, LocalGroupByPlan, PlanTotals,
};

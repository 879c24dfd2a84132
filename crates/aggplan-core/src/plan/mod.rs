//! Plan module wiring; must not implement planning or validation logic.

mod config;
pub mod local_group;

///
/// Re-Exports
///
pub use config::{AnalyzeConfig, QueryMode};
pub use local_group::{
    ColumnAggregationRequest, ColumnPlanBuffer, ColumnSlot, GroupingDescription,
    LevelDescription, LevelNumber, LocalGroupByColumn, LocalGroupByLevel, LocalGroupByPlan,
    LocalGroupPlanError, PlanTotals, analyze, build_level,
};

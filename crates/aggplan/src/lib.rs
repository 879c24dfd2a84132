//! ## Crate layout
//! - `core`: local group-by planning, generated-unit footprints, and
//!   planner observability.
//!
//! The `prelude` module mirrors the surface a statement compiler needs to
//! plan one statement's local groupings and dedup its generated units.

pub use aggplan_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::Error;

///
/// Planner Prelude
///

pub mod prelude {
    pub use crate::core::{
        codegen::{
            CanonicalTypeName, CodegenFootprint, FootprintRegistry, NamedParam, ResultType,
            UnitId,
        },
        error::{ErrorClass, ErrorOrigin},
        forge::{AccessorSlotPair, AggregationForges, ForgeTables},
        plan::{
            AnalyzeConfig, ColumnAggregationRequest, ColumnSlot, GroupingDescription,
            LevelDescription, LevelNumber, LocalGroupByPlan, QueryMode, analyze,
        },
    };
}

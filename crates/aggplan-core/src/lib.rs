//! Core planning runtime for aggplan: local group-by aggregation-state
//! planning, generated-unit footprints and dedup, and planner observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codegen;
pub mod error;
pub mod forge;
pub mod obs;
pub mod plan;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::InternalError as Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        codegen::{CanonicalTypeName, CodegenFootprint, FootprintRegistry, NamedParam},
        forge::{AccessorSlotPair, AggregationForges, ForgeTables},
        plan::{
            AnalyzeConfig, ColumnAggregationRequest, ColumnSlot, GroupingDescription,
            LevelDescription, LevelNumber, LocalGroupByPlan, QueryMode,
        },
    };
}

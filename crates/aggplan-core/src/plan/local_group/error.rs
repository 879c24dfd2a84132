use crate::{error::ErrorClass, plan::local_group::LevelNumber};
use thiserror::Error as ThisError;

///
/// LocalGroupPlanError
///
/// Local group-by planning failures.
///
/// Configuration variants reject a grouping description the compiler must not
/// accept. Every other variant means the front end produced an inconsistent
/// description; continuing would mis-route aggregation state at runtime.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LocalGroupPlanError {
    /// More than one level declares no partition keys.
    #[error("grouping levels {first} and {second} both declare no partition keys")]
    MultipleTopLevels { first: usize, second: usize },

    /// More than one level partitions by the statement's group-by keys.
    #[error("grouping levels {first} and {second} both match the statement group-by keys")]
    MultipleDefaultLevels { first: usize, second: usize },

    /// A request names a column outside the grouping description.
    #[error("aggregation column {column} is out of range for {num_columns} columns")]
    ColumnOutOfRange { column: usize, num_columns: usize },

    /// Two requests claim the same output column.
    #[error("aggregation column {column} is assigned by more than one request")]
    DuplicateColumn { column: usize },

    /// No request claims an output column.
    #[error("aggregation column {column} is not assigned to any grouping level")]
    UnassignedColumn { column: usize },

    /// Column index resolves in neither the method nor the accessor table.
    #[error(
        "aggregation column {column} resolves to no computation (method bound {method_bound}, {accessor_count} accessors)"
    )]
    UnresolvedColumn {
        column: usize,
        method_bound: usize,
        accessor_count: usize,
    },

    /// Accessor table references a missing state factory.
    #[error(
        "aggregation column {column} references state slot {slot} but only {state_count} state factories exist"
    )]
    UnresolvedStateSlot {
        column: usize,
        slot: usize,
        state_count: usize,
    },

    /// Method forge and factory arrays disagree in length.
    #[error("method forge count {forges} does not match method factory count {factories}")]
    MethodArityMismatch { forges: usize, factories: usize },

    /// Two levels received the same level number.
    #[error("level number {level_number} is assigned to more than one grouping level")]
    LevelNumberCollision { level_number: LevelNumber },
}

impl LocalGroupPlanError {
    /// Classify this failure for the compiler error surface.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MultipleTopLevels { .. } | Self::MultipleDefaultLevels { .. } => {
                ErrorClass::Unsupported
            }
            Self::ColumnOutOfRange { .. }
            | Self::DuplicateColumn { .. }
            | Self::UnassignedColumn { .. }
            | Self::UnresolvedColumn { .. }
            | Self::UnresolvedStateSlot { .. }
            | Self::MethodArityMismatch { .. }
            | Self::LevelNumberCollision { .. } => ErrorClass::InvariantViolation,
        }
    }
}

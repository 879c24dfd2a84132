use crate::{codegen::FootprintError, plan::local_group::LocalGroupPlanError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured planning error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }

    /// Borrow the local group-by planning detail, if this error carries one.
    #[must_use]
    pub const fn local_group_detail(&self) -> Option<&LocalGroupPlanError> {
        match &self.detail {
            Some(ErrorDetail::LocalGroup(err)) => Some(err),
            _ => None,
        }
    }
}

impl From<LocalGroupPlanError> for InternalError {
    fn from(err: LocalGroupPlanError) -> Self {
        Self {
            class: err.class(),
            origin: ErrorOrigin::Planner,
            message: err.to_string(),
            detail: Some(ErrorDetail::LocalGroup(err)),
        }
    }
}

impl From<FootprintError> for InternalError {
    fn from(err: FootprintError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Codegen,
            message: err.to_string(),
            detail: Some(ErrorDetail::Footprint(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    LocalGroup(LocalGroupPlanError),
    #[error("{0}")]
    Footprint(FootprintError),
}

///
/// ErrorClass
/// Internal error taxonomy for planning failures.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Invalid construction input; aborts compilation of the offending query.
    Unsupported,
    /// Inconsistent input produced by an upstream front end.
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for planning failures.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Planner,
    Codegen,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Planner => "planner",
            Self::Codegen => "codegen",
        };
        write!(f, "{label}")
    }
}

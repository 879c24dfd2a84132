//! Module: codegen
//! Responsibility: identity of generated callable units and their deduplication.
//! Does not own: code emission or type resolution.
//! Boundary: footprint equality decides when two generated units are interchangeable.

mod footprint;
mod registry;
#[cfg(test)]
mod tests;

pub use footprint::{
    CanonicalTypeName, CodegenFootprint, FootprintError, FootprintSignature, NamedParam,
    ResultType,
};
pub use registry::{FootprintRegistry, UnitId};

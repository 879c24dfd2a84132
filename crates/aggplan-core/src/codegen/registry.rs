use crate::{
    codegen::CodegenFootprint,
    obs::sink::{self, MetricsEvent},
};
use std::{collections::HashMap, fmt, hash::Hash};

///
/// UnitId
///
/// Dense identifier of one distinct generated unit, in registration order.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UnitId(usize);

impl UnitId {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

///
/// FootprintRegistry
///
/// Collapses generated units with equal footprints onto one shared unit.
/// Call sites registering an equal footprint are redirected to the first
/// unit registered with it.
///

#[derive(Debug)]
pub struct FootprintRegistry<T> {
    units: Vec<CodegenFootprint<T>>,
    by_footprint: HashMap<CodegenFootprint<T>, UnitId>,
    reused: u64,
}

impl<T: Clone + Eq + Hash> FootprintRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            by_footprint: HashMap::new(),
            reused: 0,
        }
    }

    /// Register one call site's footprint and return the unit it should call.
    pub fn register(&mut self, footprint: CodegenFootprint<T>) -> UnitId {
        if let Some(id) = self.by_footprint.get(&footprint) {
            self.reused = self.reused.saturating_add(1);
            sink::record(MetricsEvent::FootprintRegistered { reused: true });

            return *id;
        }

        let id = UnitId(self.units.len());
        self.by_footprint.insert(footprint.clone(), id);
        self.units.push(footprint);
        sink::record(MetricsEvent::FootprintRegistered { reused: false });

        id
    }

    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&CodegenFootprint<T>> {
        self.units.get(id.0)
    }

    /// Number of distinct units.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of registrations redirected to an existing unit.
    #[must_use]
    pub const fn reused(&self) -> u64 {
        self.reused
    }

    /// Distinct units in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &CodegenFootprint<T>)> {
        self.units
            .iter()
            .enumerate()
            .map(|(index, footprint)| (UnitId(index), footprint))
    }
}

impl<T: Clone + Eq + Hash> Default for FootprintRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// PlanCounters
/// Ephemeral, in-memory counters for planning passes and unit dedup.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlanCounters {
    // Local group-by planning
    pub local_group_plans: u64,
    pub local_group_levels: u64,
    pub local_group_top_levels: u64,
    pub methods_planned: u64,
    pub accesses_planned: u64,
    pub shared_access_columns: u64,

    // Rejections
    pub plans_rejected_unsupported: u64,
    pub plans_rejected_invariant: u64,

    // Generated-unit dedup
    pub footprints_registered: u64,
    pub footprints_reused: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the planner counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: PlanCounters,
}

thread_local! {
    static EVENT_STATE: RefCell<PlanCounters> = RefCell::new(PlanCounters::default());
}

/// Borrow counters immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&PlanCounters) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow counters mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut PlanCounters) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = PlanCounters::default());
}

pub(crate) fn report() -> EventReport {
    EventReport {
        counters: with_state(Clone::clone),
    }
}

/// Widen a count into a saturating counter increment.
pub(crate) fn add(counter: &mut u64, delta: usize) {
    *counter = counter.saturating_add(u64::try_from(delta).unwrap_or(u64::MAX));
}

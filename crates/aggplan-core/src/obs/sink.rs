//! Metrics sink boundary.
//!
//! Planner logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between planning logic
//! and the thread-local metrics state.
use crate::{error::ErrorClass, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    LocalGroupPlanBuilt {
        levels: usize,
        has_top_level: bool,
        num_methods: usize,
        num_accesses: usize,
        shared_access_columns: usize,
    },
    LocalGroupPlanRejected {
        class: ErrorClass,
    },
    FootprintRegistered {
        reused: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::LocalGroupPlanBuilt {
                levels,
                has_top_level,
                num_methods,
                num_accesses,
                shared_access_columns,
            } => {
                metrics::with_state_mut(|m| {
                    m.local_group_plans = m.local_group_plans.saturating_add(1);
                    metrics::add(&mut m.local_group_levels, levels);
                    if has_top_level {
                        m.local_group_top_levels = m.local_group_top_levels.saturating_add(1);
                    }
                    metrics::add(&mut m.methods_planned, num_methods);
                    metrics::add(&mut m.accesses_planned, num_accesses);
                    metrics::add(&mut m.shared_access_columns, shared_access_columns);
                });
            }

            MetricsEvent::LocalGroupPlanRejected { class } => {
                metrics::with_state_mut(|m| {
                    let counter = match class {
                        ErrorClass::Unsupported => &mut m.plans_rejected_unsupported,
                        ErrorClass::InvariantViolation => &mut m.plans_rejected_invariant,
                    };
                    *counter = counter.saturating_add(1);
                });
            }

            MetricsEvent::FootprintRegistered { reused } => {
                metrics::with_state_mut(|m| {
                    if reused {
                        m.footprints_reused = m.footprints_reused.saturating_add(1);
                    } else {
                        m.footprints_registered = m.footprints_registered.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // clone out so a sink may itself record without a re-entrant borrow
    let installed = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match installed {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's planner counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the current thread's planner counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
///
/// The previous sink is restored on every exit path, including unwinding.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

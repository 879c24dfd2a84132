//! Observability: planner telemetry (metrics) and sink abstractions.
//!
//! Planning code emits events only; counters live behind the sink.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventReport, PlanCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};

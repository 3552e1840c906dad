//! Telemetry and observability subsystem.
//!
//! Provides metrics collection and export for monitoring pool behavior:
//! throughput, requeue churn, panics, and worker utilization. Compiles to
//! no-op stubs when the `telemetry` feature is disabled, so the engine
//! records unconditionally.

#[cfg(feature = "telemetry")]
pub mod metrics;

#[cfg(feature = "telemetry")]
pub mod export;

#[cfg(feature = "telemetry")]
pub use metrics::{Metrics, MetricsSnapshot};

#[cfg(feature = "telemetry")]
pub use export::{ConsoleExporter, JsonExporter, MetricsExporter};

// Stub implementations when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub mod metrics {
    #[derive(Debug, Default)]
    pub struct Metrics;

    impl Metrics {
        pub fn new() -> Self {
            Self
        }
        pub fn record_task_submitted(&self) {}
        pub fn record_task_execution(&self, _: u64) {}
        pub fn record_task_requeued(&self) {}
        pub fn record_task_panic(&self) {}
        pub fn record_tasks_discarded(&self, _: u64) {}
        pub fn record_idle_time(&self, _: u64) {}
        pub fn record_busy_time(&self, _: u64) {}
        pub fn reset(&self) {}
        pub fn snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot::default()
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct MetricsSnapshot {
        pub tasks_submitted: u64,
        pub tasks_executed: u64,
        pub tasks_requeued: u64,
        pub tasks_panicked: u64,
        pub tasks_discarded: u64,
    }
}

#[cfg(not(feature = "telemetry"))]
pub use metrics::{Metrics, MetricsSnapshot};

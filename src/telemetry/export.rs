//! Metrics export functionality for various formats.

use super::metrics::MetricsSnapshot;
use crate::error::Result;

/// Trait for exporting metrics to different formats
pub trait MetricsExporter: Send + Sync {
    /// Export a metrics snapshot
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()>;
}

/// Export metrics to JSON format
#[derive(Debug)]
pub struct JsonExporter {
    output_path: std::path::PathBuf,
}

impl JsonExporter {
    /// Create a new JSON exporter
    pub fn new(output_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl MetricsExporter for JsonExporter {
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()> {
        let serializable = SerializableSnapshot::from(snapshot);
        let json = serde_json::to_string_pretty(&serializable).map_err(|e| {
            crate::error::Error::telemetry(format!("JSON serialization failed: {}", e))
        })?;

        std::fs::write(&self.output_path, json)
            .map_err(|e| crate::error::Error::telemetry(format!("Failed to write file: {}", e)))?;

        Ok(())
    }
}

/// Serializable version of MetricsSnapshot
#[derive(Debug, Clone, serde::Serialize)]
struct SerializableSnapshot {
    uptime_secs: f64,
    tasks_submitted: u64,
    tasks_executed: u64,
    tasks_requeued: u64,
    tasks_panicked: u64,
    tasks_discarded: u64,
    idle_time_ms: u64,
    busy_time_ms: u64,
    avg_latency_us: f64,
    p50_latency_us: f64,
    p95_latency_us: f64,
    p99_latency_us: f64,
    max_latency_us: f64,
    utilization: f64,
    tasks_per_second: f64,
}

impl From<&MetricsSnapshot> for SerializableSnapshot {
    fn from(snapshot: &MetricsSnapshot) -> Self {
        Self {
            uptime_secs: snapshot.uptime.as_secs_f64(),
            tasks_submitted: snapshot.tasks_submitted,
            tasks_executed: snapshot.tasks_executed,
            tasks_requeued: snapshot.tasks_requeued,
            tasks_panicked: snapshot.tasks_panicked,
            tasks_discarded: snapshot.tasks_discarded,
            idle_time_ms: snapshot.idle_time_ns / 1_000_000,
            busy_time_ms: snapshot.busy_time_ns / 1_000_000,
            avg_latency_us: snapshot.avg_latency_ns as f64 / 1_000.0,
            p50_latency_us: snapshot.p50_latency_ns as f64 / 1_000.0,
            p95_latency_us: snapshot.p95_latency_ns as f64 / 1_000.0,
            p99_latency_us: snapshot.p99_latency_ns as f64 / 1_000.0,
            max_latency_us: snapshot.max_latency_ns as f64 / 1_000.0,
            utilization: snapshot.utilization(),
            tasks_per_second: snapshot.tasks_per_second(),
        }
    }
}

/// Export metrics to console (stdout)
#[derive(Debug)]
pub struct ConsoleExporter {
    verbose: bool,
}

impl ConsoleExporter {
    /// Create a new console exporter
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl MetricsExporter for ConsoleExporter {
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()> {
        println!("=== Taskmill Pool Metrics ===");
        println!("Uptime: {:.2}s", snapshot.uptime.as_secs_f64());
        println!("Tasks submitted: {}", snapshot.tasks_submitted);
        println!("Tasks executed: {}", snapshot.tasks_executed);
        println!("Tasks requeued: {}", snapshot.tasks_requeued);
        println!("Tasks panicked: {}", snapshot.tasks_panicked);
        println!("Tasks discarded: {}", snapshot.tasks_discarded);
        println!("Utilization: {:.1}%", snapshot.utilization() * 100.0);
        println!("Tasks/sec: {:.2}", snapshot.tasks_per_second());

        if self.verbose {
            println!("\nLatency:");
            println!(
                "  Average: {:.2}μs",
                snapshot.avg_latency_ns as f64 / 1_000.0
            );
            println!("  P50: {:.2}μs", snapshot.p50_latency_ns as f64 / 1_000.0);
            println!("  P95: {:.2}μs", snapshot.p95_latency_ns as f64 / 1_000.0);
            println!("  P99: {:.2}μs", snapshot.p99_latency_ns as f64 / 1_000.0);
            println!("  Max: {:.2}μs", snapshot.max_latency_ns as f64 / 1_000.0);
        }

        println!("=============================");

        Ok(())
    }
}

impl Default for ConsoleExporter {
    fn default() -> Self {
        Self::new(false)
    }
}

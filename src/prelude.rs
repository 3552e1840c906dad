pub use crate::async_result::{AsyncResult, Producer};
pub use crate::config::{Config, ConfigBuilder, ShutdownPolicy};
pub use crate::error::{Error, Result};
pub use crate::executor::{Task, TaskId, WorkerPool};

pub use crate::telemetry::{Metrics, MetricsSnapshot};

#[cfg(feature = "telemetry")]
pub use crate::telemetry::{ConsoleExporter, JsonExporter, MetricsExporter};

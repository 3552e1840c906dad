//! Task execution infrastructure.
//!
//! This module provides the core execution primitives: the task type and
//! its readiness protocol, the shared FIFO queue, the worker loop, and the
//! worker pool that ties them together.

pub mod pool;
pub mod queue;
pub mod task;
pub mod worker;

pub use pool::WorkerPool;
pub use queue::TaskQueue;
pub use task::{Task, TaskId};
pub use worker::WorkerId;

//! Taskmill - a small in-process task engine.
//!
//! A fixed pool of worker threads pulls from one shared FIFO queue. Tasks
//! come in two flavors: immediate tasks, which are always ready, and
//! continuations, which are gated on an [`AsyncResult`] and cycle through
//! the queue until the value they wait for arrives. No worker ever blocks
//! on a pending result; not-ready tasks go back to the tail and the worker
//! moves straight on to the next one.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use taskmill::prelude::*;
//!
//! let pool = Arc::new(WorkerPool::start(2).unwrap());
//!
//! // fire-and-forget work
//! pool.execute(|| println!("hello from a worker"));
//!
//! // a computation whose output gates a follow-up task
//! let (producer_task, result) = Task::with_result(|| 6 * 7);
//! let handle = Arc::clone(&pool);
//! pool.submit(Task::continuation(result, move |answer: i32| {
//!     println!("the answer is {}", answer);
//!     handle.request_shutdown();
//! }));
//! pool.submit(producer_task);
//!
//! // returns once the continuation above has requested shutdown
//! pool.join();
//! ```
//!
//! # Features
//!
//! - **Continuation Tasks**: Chain work onto values that arrive later,
//!   without blocking a worker thread on them
//! - **Strict FIFO Scheduling**: One shared queue; ready tasks run in
//!   submission order, not-ready tasks requeue at the tail
//! - **Cooperative Shutdown**: Any task can request shutdown; running
//!   tasks always finish
//! - **Panic Isolation**: A panicking task never takes its worker down
//! - **Telemetry**: Throughput, requeue, and latency metrics (optional)

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]

// Core modules - always available
pub mod async_result;
pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod telemetry;

// Re-export key types at crate root
pub use async_result::{AsyncResult, Producer};
pub use config::{Config, ConfigBuilder, ShutdownPolicy};
pub use error::{Error, Result};
pub use executor::{Task, TaskId, WorkerPool};

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    #[test]
    fn test_pool_executes_closures() {
        let pool = WorkerPool::start(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..16 {
            let counter = counter.clone();
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(wait_for(Duration::from_secs(5), || {
            counter.load(Ordering::SeqCst) == 16
        }));

        pool.request_shutdown();
        pool.join();
        assert_eq!(counter.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn test_continuation_sees_produced_value() {
        let pool = WorkerPool::start(2).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));

        let (producer_task, result) = Task::with_result(|| 25usize);
        let s = seen.clone();
        pool.submit(Task::continuation(result, move |value: usize| {
            s.store(value, Ordering::SeqCst);
        }));
        pool.submit(producer_task);

        assert!(wait_for(Duration::from_secs(5), || {
            seen.load(Ordering::SeqCst) == 25
        }));

        pool.request_shutdown();
        pool.join();
    }

    #[test]
    fn test_shutdown_requested_from_inside_a_task() {
        let pool = Arc::new(WorkerPool::start(2).unwrap());

        let handle = Arc::clone(&pool);
        pool.execute(move || handle.request_shutdown());

        assert!(wait_for(Duration::from_secs(5), || {
            pool.shutdown_requested()
        }));
        pool.join();
    }
}

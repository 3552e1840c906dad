use super::queue::TaskQueue;
use super::task::Task;
use super::worker::Worker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::telemetry::{Metrics, MetricsSnapshot};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Fixed-size pool of worker threads over one shared FIFO task queue.
///
/// Workers pull from the head, run tasks that are ready, and cycle
/// not-ready continuations back to the tail. The pool is `Sync`; wrap it
/// in an [`Arc`] to submit or request shutdown from inside a task.
pub struct WorkerPool {
    unparkers: Vec<thread::Thread>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    queue: TaskQueue,
    shutdown: Arc<AtomicBool>,
    num_threads: usize,
    next_wake: AtomicUsize,
    metrics: Arc<Metrics>,
}

impl WorkerPool {
    /// Spawn a pool from `config`. Workers start immediately and the
    /// thread count stays fixed for the pool's lifetime.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let num_threads = config.worker_threads();

        let queue = TaskQueue::new();
        let shutdown = Arc::new(AtomicBool::new(false));
        let metrics = Arc::new(Metrics::new());

        let mut unparkers: Vec<thread::Thread> = Vec::with_capacity(num_threads);
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(
                id,
                queue.clone(),
                shutdown.clone(),
                config.shutdown_policy,
                metrics.clone(),
            );

            let mut builder =
                thread::Builder::new().name(format!("{}-{}", config.thread_name_prefix, id));

            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let thread = match builder.spawn(move || worker.run()) {
                Ok(thread) => thread,
                Err(e) => {
                    // wind down anything spawned before the failure
                    shutdown.store(true, Ordering::Release);
                    for unparker in &unparkers {
                        unparker.unpark();
                    }
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::pool(format!("failed to spawn worker {}: {}", id, e)));
                }
            };

            unparkers.push(thread.thread().clone());
            handles.push(thread);
        }

        Ok(Self {
            unparkers,
            handles: Mutex::new(handles),
            queue,
            shutdown,
            num_threads,
            next_wake: AtomicUsize::new(0),
            metrics,
        })
    }

    /// Spawn `num_threads` workers with an otherwise default configuration.
    pub fn start(num_threads: usize) -> Result<Self> {
        WorkerPool::new(&Config::builder().num_threads(num_threads).build()?)
    }

    /// Enqueue a task at the tail. Thread-safe and non-blocking.
    ///
    /// Submitting after [`request_shutdown`](Self::request_shutdown) is
    /// accepted silently: a worker that has not exited yet may still run
    /// the task, otherwise it is dropped at teardown.
    pub fn submit(&self, task: Task) {
        self.queue.push(task);
        self.metrics.record_task_submitted();

        // wake one parked worker, round robin
        let idx = self.next_wake.fetch_add(1, Ordering::Relaxed) % self.num_threads;
        self.unparkers[idx].unpark();
    }

    /// Wrap a closure in an immediate task and submit it.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Task::immediate(f));
    }

    /// Set the shutdown flag and wake every worker. Idempotent; the flag
    /// is never cleared. Each worker finishes the task it is currently
    /// running before it exits.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        // wake everyone up to observe the flag
        for unparker in &self.unparkers {
            unparker.unpark();
        }
    }

    /// Whether shutdown has been requested.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Block until every worker thread has exited.
    ///
    /// Does not itself request shutdown; a task or another thread is
    /// expected to. Must be called from outside the pool's own workers.
    pub fn join(&self) {
        let mut handles = self.handles.lock();
        for handle in handles.drain(..) {
            let _ = handle.join();
        }

        // workers are gone; count whatever never got delivered
        let mut leftover = 0;
        while self.queue.pop().is_some() {
            leftover += 1;
        }
        if leftover > 0 {
            self.metrics.record_tasks_discarded(leftover);
        }
    }

    /// Number of worker threads, fixed at construction.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Tasks currently sitting in the queue.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Snapshot of the pool's runtime counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.request_shutdown();
        self.join();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads)
            .field("pending_tasks", &self.pending_tasks())
            .field("shutdown_requested", &self.shutdown_requested())
            .finish()
    }
}

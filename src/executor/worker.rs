// worker thread loop
use super::queue::TaskQueue;
use super::task::Task;
use crate::config::ShutdownPolicy;
use crate::telemetry::Metrics;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub type WorkerId = usize;

// How long a worker parks when the queue is empty. Submission and shutdown
// unpark it early, so this caps idle latency rather than adding any.
pub(crate) const IDLE_PARK: Duration = Duration::from_millis(100);

pub(crate) struct Worker {
    pub id: WorkerId,
    queue: TaskQueue,
    shutdown: Arc<AtomicBool>,
    policy: ShutdownPolicy,
    metrics: Arc<Metrics>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        queue: TaskQueue,
        shutdown: Arc<AtomicBool>,
        policy: ShutdownPolicy,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            id,
            queue,
            shutdown,
            policy,
            metrics,
        }
    }

    // main loop: the shutdown flag is checked once per dequeue attempt and
    // never mid-task, so a running task always finishes.
    pub fn run(&self) {
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                if self.policy == ShutdownPolicy::Drain {
                    self.drain();
                }
                break;
            }

            match self.queue.pop() {
                Some(task) if task.is_ready() => self.execute_task(task),
                Some(task) => {
                    // not ready yet: back to the tail, then straight on to
                    // the next dequeue attempt
                    self.queue.push(task);
                    self.metrics.record_task_requeued();
                }
                None => {
                    let idle_start = Instant::now();
                    thread::park_timeout(IDLE_PARK);
                    self.metrics
                        .record_idle_time(idle_start.elapsed().as_nanos() as u64);
                }
            }
        }
    }

    // best effort on shutdown: run what is ready, drop what is not
    fn drain(&self) {
        while let Some(task) = self.queue.pop() {
            if task.is_ready() {
                self.execute_task(task);
            } else {
                self.metrics.record_tasks_discarded(1);
            }
        }
    }

    fn execute_task(&self, task: Task) {
        let tid = task.id();
        let start = Instant::now();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            task.execute();
        }));

        let duration_ns = start.elapsed().as_nanos() as u64;
        self.metrics.record_busy_time(duration_ns);

        match result {
            Ok(_) => {
                self.metrics.record_task_execution(duration_ns);
            }
            Err(_) => {
                eprintln!("worker {}: task {:?} panicked", self.id, tid);
                self.metrics.record_task_panic();
            }
        }
    }
}

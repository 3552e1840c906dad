//! Task representation and execution.

use crate::async_result::AsyncResult;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A unit of work for the pool: a readiness check plus a one-shot run step.
///
/// Immediate tasks are always ready. Continuation tasks are gated on an
/// [`AsyncResult`] and only become ready once its producer resolves; until
/// then the workers cycle them through the queue.
pub struct Task {
    id: TaskId,
    kind: TaskKind,
}

enum TaskKind {
    Immediate(Box<dyn FnOnce() + Send + 'static>),
    Continuation(Box<dyn Gated>),
}

/// Type-erased continuation body: the gating result plus its follow-up.
trait Gated: Send {
    fn is_ready(&self) -> bool;
    fn complete(self: Box<Self>);
}

struct Chain<T, F> {
    result: AsyncResult<T>,
    follow_up: F,
}

impl<T, F> Gated for Chain<T, F>
where
    T: Send + 'static,
    F: FnOnce(T) + Send + 'static,
{
    fn is_ready(&self) -> bool {
        self.result.is_ready()
    }

    fn complete(mut self: Box<Self>) {
        // The chain holds the only consumer and runs at most once, so the
        // take here can only see the ready value.
        if let Ok(value) = self.result.take() {
            (self.follow_up)(value);
        }
    }
}

impl Task {
    /// Create a task that is always ready to run.
    pub fn immediate<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            id: TaskId::next(),
            kind: TaskKind::Immediate(Box::new(f)),
        }
    }

    /// Create a task gated on `result`.
    ///
    /// The task reports not-ready until the producer resolves the cell,
    /// then runs `follow_up` with the resolved value. The follow-up's
    /// return value is discarded; chain through [`Task::with_result`] when
    /// a downstream task needs it.
    pub fn continuation<T, R, F>(result: AsyncResult<T>, follow_up: F) -> Self
    where
        T: Send + 'static,
        F: FnOnce(T) -> R + Send + 'static,
    {
        let body = move |value: T| {
            let _ = follow_up(value);
        };

        Task {
            id: TaskId::next(),
            kind: TaskKind::Continuation(Box::new(Chain {
                result,
                follow_up: body,
            })),
        }
    }

    /// Create an immediate task that publishes its return value.
    ///
    /// Submit the task and hand the returned [`AsyncResult`] to a
    /// continuation. If `f` panics the cell is never resolved, and a task
    /// gated on it stays not-ready until the pool shuts down.
    pub fn with_result<R, F>(f: F) -> (Task, AsyncResult<R>)
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (result, producer) = AsyncResult::pending();
        let task = Task::immediate(move || producer.resolve(f()));
        (task, result)
    }

    /// This task's unique id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Whether the task can run right now. Never blocks and has no side
    /// effects, so the scheduler may poll it repeatedly.
    pub fn is_ready(&self) -> bool {
        match &self.kind {
            TaskKind::Immediate(_) => true,
            TaskKind::Continuation(gated) => gated.is_ready(),
        }
    }

    /// Execute the task. Consumes it: a task runs at most once.
    pub fn execute(self) {
        match self.kind {
            TaskKind::Immediate(f) => f(),
            TaskKind::Continuation(gated) => gated.complete(),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            TaskKind::Immediate(_) => "Immediate",
            TaskKind::Continuation(_) => "Continuation",
        };
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("kind", &kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_immediate_is_always_ready() {
        let task = Task::immediate(|| {});
        assert!(task.is_ready());
    }

    #[test]
    fn test_execute_runs_the_callable() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();

        let task = Task::immediate(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        task.execute();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_continuation_gated_on_resolve() {
        let (result, producer) = AsyncResult::pending();
        let task = Task::continuation(result, |_: u32| {});

        assert!(!task.is_ready());
        producer.resolve(5);
        assert!(task.is_ready());
    }

    #[test]
    fn test_continuation_receives_value() {
        let (result, producer) = AsyncResult::pending();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();

        let task = Task::continuation(result, move |value: usize| {
            s.store(value, Ordering::SeqCst);
        });

        producer.resolve(123);
        task.execute();

        assert_eq!(seen.load(Ordering::SeqCst), 123);
    }

    #[test]
    fn test_continuation_discards_follow_up_return() {
        let (result, producer) = AsyncResult::pending();
        // Follow-up returns a value; the task type stays Task either way.
        let task = Task::continuation(result, |n: i32| n * 2);

        producer.resolve(4);
        task.execute();
    }

    #[test]
    fn test_with_result_feeds_a_chain() {
        let (task, result) = Task::with_result(|| 6 * 7);
        assert!(!result.is_ready());

        task.execute();
        assert!(result.is_ready());

        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        let next = Task::continuation(result, move |value: i32| {
            s.store(value as usize, Ordering::SeqCst);
        });

        assert!(next.is_ready());
        next.execute();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = Task::immediate(|| {});
        let b = Task::immediate(|| {});
        assert_ne!(a.id(), b.id());
    }
}

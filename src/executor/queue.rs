use crate::executor::task::Task;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// FIFO queue shared by every worker. One lock serializes all access, so
/// push and pop are atomic with respect to each other.
pub struct TaskQueue {
    tasks: Arc<Mutex<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Append at the tail. The queue is unbounded; this never blocks
    /// beyond the lock.
    pub fn push(&self, task: Task) {
        self.tasks.lock().push_back(task);
    }

    /// Remove and return the head, or `None` when empty.
    pub fn pop(&self) -> Option<Task> {
        self.tasks.lock().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TaskQueue {
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.len())
            .finish()
    }
}

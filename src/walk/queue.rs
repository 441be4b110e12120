use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::util::fatal;
use crate::walk::Task;

/// The pool's entire mutable state. Every field is read and written only
/// through the guard handed out by [`TaskQueue::lock`].
#[derive(Debug)]
pub(crate) struct QueueState {
    /// Pending tasks, FIFO: enqueue at the back, dequeue at the front.
    pub(crate) tasks: VecDeque<Task>,
    /// Workers currently between a dequeue and its accounting update.
    pub(crate) running: usize,
    /// Accumulated 512-byte blocks for the current root.
    pub(crate) block_sum: u64,
    /// Cleared on the first unreadable directory and never set again;
    /// spans all roots and decides the process exit code.
    pub(crate) permission_ok: bool,
    /// Set by the first executed sentinel. Once true, no further `Walk`
    /// task is accepted.
    pub(crate) shutdown: bool,
}

impl QueueState {
    /// True iff no task is pending. Callers hold the guard.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Thread-safe FIFO of traversal tasks plus the shared accumulators.
///
/// A single mutex guards all of [`QueueState`]; the associated condvar is
/// signalled once per enqueue. Critical sections stay short and no
/// filesystem call ever happens while the guard is held, so the unified
/// lock never becomes the bottleneck the traversal syscalls already are.
#[derive(Debug)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    cond: Condvar,
    thread_amount: usize,
}

impl TaskQueue {
    /// A queue for a pool of `thread_amount` workers. The count is fixed
    /// for the queue's lifetime; the shutdown protocol enqueues exactly
    /// this many sentinels.
    #[must_use]
    pub fn new(thread_amount: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                running: 0,
                block_sum: 0,
                permission_ok: true,
                shutdown: false,
            }),
            cond: Condvar::new(),
            thread_amount,
        }
    }

    /// Fixed worker count this queue was built for.
    #[must_use]
    #[inline]
    pub const fn thread_amount(&self) -> usize {
        self.thread_amount
    }

    /// Acquire the queue mutex. Poisoning means a worker panicked while
    /// holding the guard; no caller can repair the pool state after that.
    pub(crate) fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state
            .lock()
            .unwrap_or_else(|_| fatal("task queue mutex poisoned"))
    }

    /// Release the guard until the condvar is signalled, then reacquire.
    /// Spurious wakeups are allowed; callers re-check their predicate.
    pub(crate) fn wait<'queue>(
        &'queue self,
        guard: MutexGuard<'queue, QueueState>,
    ) -> MutexGuard<'queue, QueueState> {
        self.cond
            .wait(guard)
            .unwrap_or_else(|_| fatal("task queue condvar wait failed"))
    }

    /// Append a task and wake at most one idle worker.
    pub fn enqueue(&self, task: Task) {
        let mut state = self.lock();
        state.tasks.push_back(task);
        self.cond.notify_one();
    }

    /// Hand a discovered sub-directory to the pool. Dropped silently once
    /// the shutdown protocol has fired: after that point only sentinels
    /// may sit in the queue.
    pub(crate) fn enqueue_walk(&self, path: PathBuf) {
        let mut state = self.lock();
        if state.shutdown {
            return;
        }
        state.tasks.push_back(Task::Walk(path));
        self.cond.notify_one();
    }

    /// Record that a directory could not be opened for reading.
    pub(crate) fn report_unreadable(&self) {
        self.lock().permission_ok = false;
    }

    /// True while no directory anywhere has failed to open.
    #[must_use]
    pub fn permission_ok(&self) -> bool {
        self.lock().permission_ok
    }

    /// Credit blocks to the current root's sum. The worker loop does its
    /// own crediting inside a larger critical section; this entry point is
    /// for the sequential driver.
    pub(crate) fn add_blocks(&self, blocks: u64) {
        self.lock().block_sum += blocks;
    }

    /// Blocks accumulated for the current root so far.
    #[must_use]
    pub fn block_sum(&self) -> u64 {
        self.lock().block_sum
    }

    /// Clear per-root state between roots: sum, running count, shutdown
    /// flag, and any residual tasks (a correct shutdown leaves none, but
    /// the drain costs nothing). The permission flag survives; it spans
    /// all roots. Callers ensure no worker is active.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.tasks.clear();
        state.running = 0;
        state.block_sum = 0;
        state.shutdown = false;
    }
}

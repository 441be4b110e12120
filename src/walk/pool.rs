use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::util::fatal;
use crate::walk::scan::{Mode, scan};
use crate::walk::{Task, TaskQueue};

/// Seed the queue with the root, run `thread_amount` workers to
/// exhaustion, and join them.
///
/// Thread spawn and join failures are resource faults, not recoverable
/// conditions: a half-spawned pool would keep mutating the shared queue
/// behind any caller that tried to handle an error, so both paths end
/// the process through [`fatal`].
pub(crate) fn run_pool(queue: &Arc<TaskQueue>, root: PathBuf) {
    queue.enqueue(Task::Walk(root));

    let mut handles = Vec::with_capacity(queue.thread_amount());
    for index in 0..queue.thread_amount() {
        let queue_shared = Arc::clone(queue);
        let handle = thread::Builder::new()
            .name(format!("mdu-worker-{index}"))
            .spawn(move || worker(&queue_shared))
            .unwrap_or_else(|error| fatal(format_args!("cannot spawn worker thread: {error}")));
        handles.push(handle);
    }

    for handle in handles {
        if handle.join().is_err() {
            fatal("worker thread panicked");
        }
    }
}

/// The long-running consumer loop.
///
/// IDLE holds the guard: leave once `shutdown` is set and the queue has
/// drained, otherwise dequeue (bumping `running` in the same critical
/// section as the pop, so no observer can see the queue empty while a
/// task is unaccounted for) or block on the condvar. EXECUTING runs the
/// task with the guard released; a walk's credit to `block_sum` and the
/// `running` decrement share one critical section so the total can never
/// miss a finished task.
fn worker(queue: &TaskQueue) {
    let mut state = queue.lock();
    loop {
        let task = loop {
            if state.shutdown && state.is_empty() {
                return;
            }
            if let Some(task) = state.tasks.pop_front() {
                state.running += 1;
                break task;
            }
            state = queue.wait(state);
        };
        drop(state);

        match task {
            Task::Walk(path) => {
                let blocks = scan(&path, queue, Mode::Parallel);

                let mut guard = queue.lock();
                guard.block_sum += blocks;
                guard.running -= 1;
                let tasks_empty = guard.is_empty();
                let running = guard.running;
                drop(guard);

                // The coordinator works off a snapshot, outside the mutex.
                maybe_shutdown(queue, tasks_empty, running);
            }
            Task::Shutdown => {
                let mut guard = queue.lock();
                guard.shutdown = true;
                guard.running -= 1;
            }
        }

        state = queue.lock();
    }
}

/// Shutdown coordinator.
///
/// The predicate `tasks empty && running == 0` observed after a finished
/// walk means the subtree is exhausted: every discovered directory has
/// been dequeued, executed, and accounted. It can hold at most once per
/// root, since the sentinels enqueued here immediately repopulate the
/// queue and no walk runs after them. Each enqueue signals the condvar,
/// so every blocked worker gets woken into either a sentinel or the
/// shutdown-and-drained exit check.
fn maybe_shutdown(queue: &TaskQueue, tasks_empty: bool, running: usize) {
    if !tasks_empty || running != 0 {
        return;
    }
    for _ in 0..queue.thread_amount() {
        queue.enqueue(Task::Shutdown);
    }
}

use std::path::PathBuf;

/// One unit of queued work.
///
/// A `Walk` traverses a single directory level and may enqueue further
/// `Walk` tasks for the sub-directories it finds, so every consumer of the
/// queue is also a producer. A `Shutdown` is a sentinel: executing one
/// makes exactly one worker leave its loop, and it never contributes to
/// the block sum.
///
/// Tasks are created by whoever enqueues them and consumed by the worker
/// that dequeues them; the enum replaces the function-pointer dispatch a C
/// rendition of this design would need.
#[derive(Debug)]
pub enum Task {
    Walk(PathBuf),
    Shutdown,
}

use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::sync::Arc;

use crate::MduError;
use crate::walk::pool::run_pool;
use crate::walk::scan::{Mode, scan};
use crate::walk::TaskQueue;

/// Aggregates on-disk block usage for a sequence of roots.
///
/// One instance owns one [`TaskQueue`] and carries the permission flag
/// across roots. With a thread amount of 1 the roots are walked by plain
/// recursion on the calling thread; above that, each root gets a freshly
/// spawned pool of workers that is joined before the result is read.
#[derive(Debug)]
pub struct DiskUsage {
    queue: Arc<TaskQueue>,
}

impl DiskUsage {
    /// A reporter running `thread_amount` workers per root.
    #[must_use]
    pub fn new(thread_amount: usize) -> Self {
        Self {
            queue: Arc::new(TaskQueue::new(thread_amount)),
        }
    }

    /// Total 512-byte blocks reachable from `root`.
    ///
    /// Resets the per-root accumulators afterwards, so consecutive calls
    /// are independent; only the permission flag carries over. Filesystem
    /// trouble is absorbed into the sum and the permission flag; pool
    /// resource faults (spawn or join failure) are fatal and never
    /// return here.
    #[must_use]
    pub fn measure(&self, root: &Path) -> u64 {
        if self.queue.thread_amount() > 1 {
            run_pool(&self.queue, root.to_path_buf());
        } else {
            let blocks = scan(root, &self.queue, Mode::Sequential);
            self.queue.add_blocks(blocks);
        }

        let total = self.queue.block_sum();
        self.queue.reset();
        total
    }

    /// Measure every root in input order, writing one
    /// `<blocks>\t<path>\n` line per root. Paths are echoed verbatim,
    /// byte for byte.
    ///
    /// # Errors
    /// [`MduError::BrokenPipe`] when the writer fails.
    pub fn report<W: Write>(
        &self,
        roots: &[impl AsRef<OsStr>],
        out: &mut W,
    ) -> Result<(), MduError> {
        for root in roots {
            let root = root.as_ref();
            let blocks = self.measure(Path::new(root));

            let path_bytes = root.as_bytes();
            let mut line = Vec::with_capacity(path_bytes.len() + 24);
            line.extend_from_slice(blocks.to_string().as_bytes());
            line.push(b'\t');
            line.extend_from_slice(path_bytes);
            line.push(b'\n');
            out.write_all(&line).map_err(MduError::BrokenPipe)?;
        }
        Ok(())
    }

    /// False once any directory across any root failed to open for
    /// reading; decides the process exit code.
    #[must_use]
    pub fn permission_ok(&self) -> bool {
        self.queue.permission_ok()
    }
}

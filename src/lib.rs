/*!
 A `du`-style disk usage reporter built around a fixed-size parallel
 traversal pool.

 For each root path the library sums the 512-byte block counts `lstat`
 reports over every reachable entry and emits one `<blocks>\t<path>` line.
 The interesting part is the pool: workers drain a shared task queue where
 every consumer is also a producer (each directory task enqueues its
 sub-directories), so termination is a quiescence-detection problem solved
 under a single mutex/condvar pair with a sentinel-task shutdown protocol.

 Symbolic links are statted, never followed, and hard links are not
 deduplicated.

 # Examples
 ```no_run
 use mdu::DiskUsage;
 use std::path::Path;

 let du = DiskUsage::new(4);
 let blocks = du.measure(Path::new("/var/log"));
 println!("{blocks} blocks");
 ```
*/

mod error;
mod fs;
mod util;
mod walk;

pub use error::MduError;
pub use fs::{Dir, EntryStat, lstat};
pub use util::join_entry;
pub use walk::{DiskUsage, Task, TaskQueue};

#[cfg(test)]
mod test;

//this allocator is more efficient than jemalloc through my testing
#[cfg(all(
    feature = "mimalloc",
    any(target_os = "linux", target_os = "macos", target_os = "android")
))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

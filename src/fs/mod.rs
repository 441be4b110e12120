mod dir;
mod stat;

pub use dir::Dir;
pub use stat::{EntryStat, lstat};

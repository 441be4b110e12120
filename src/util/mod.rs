mod exit;
mod path;

pub(crate) use exit::fatal;
pub use path::join_entry;

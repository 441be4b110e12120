use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;

/// Join a directory path and an entry name, inserting a `/` only when the
/// directory does not already end in one.
///
/// Works on raw bytes so paths that are not valid UTF-8 pass through
/// untouched. Both inputs are expected to be non-empty; `readdir` never
/// yields an empty name.
#[must_use]
pub fn join_entry(dir: &OsStr, name: &OsStr) -> PathBuf {
    let dir_bytes = dir.as_bytes();
    let name_bytes = name.as_bytes();

    let mut joined = Vec::with_capacity(dir_bytes.len() + name_bytes.len() + 1);
    joined.extend_from_slice(dir_bytes);
    if joined.last() != Some(&b'/') {
        joined.push(b'/');
    }
    joined.extend_from_slice(name_bytes);

    PathBuf::from(OsString::from_vec(joined))
}

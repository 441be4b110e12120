use core::ffi::CStr;
use core::ptr::NonNull;
use std::ffi::{CString, OsString};
use std::io;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

use crate::util::fatal;

/// Minimal wrapper over `opendir`/`readdir`/`closedir`.
///
/// Unlike `std::fs::read_dir` this yields the `.` and `..` entries, which
/// the block accounting has to see. Each stream belongs to one walk on one
/// thread; streams on distinct directories never share state.
#[derive(Debug)]
pub struct Dir {
    handle: NonNull<libc::DIR>,
}

impl Dir {
    /// Open `path` for enumeration.
    ///
    /// # Errors
    /// Returns the OS error from `opendir` (typically `EACCES`), or
    /// `InvalidInput` when the path contains an interior NUL byte.
    pub fn open(path: &Path) -> io::Result<Self> {
        let cpath = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        // SAFETY: cpath is NUL-terminated.
        let handle = unsafe { libc::opendir(cpath.as_ptr()) };
        NonNull::new(handle)
            .map(|handle| Self { handle })
            .ok_or_else(io::Error::last_os_error)
    }
}

impl Iterator for Dir {
    type Item = OsString;

    fn next(&mut self) -> Option<OsString> {
        // SAFETY: handle is a live stream from opendir; the returned dirent
        // is copied out before any further readdir call on this stream.
        let entry = unsafe { libc::readdir(self.handle.as_ptr()) };
        if entry.is_null() {
            // End of stream. A readdir failure also returns null; either
            // way enumeration of this directory is over.
            return None;
        }
        // SAFETY: a non-null dirent carries a NUL-terminated d_name.
        let name = unsafe { CStr::from_ptr((*entry).d_name.as_ptr().cast()) };
        Some(OsString::from_vec(name.to_bytes().to_vec()))
    }
}

impl Drop for Dir {
    fn drop(&mut self) {
        // SAFETY: handle came from opendir and is closed exactly once.
        if unsafe { libc::closedir(self.handle.as_ptr()) } != 0 {
            fatal(format_args!(
                "closedir failed: {}",
                io::Error::last_os_error()
            ));
        }
    }
}

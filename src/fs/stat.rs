use core::mem::MaybeUninit;
use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// The two facts the accounting needs from one `lstat` call.
///
/// `blocks` stays in the 512-byte units the kernel reports; no conversion
/// happens anywhere in this crate.
#[derive(Clone, Copy, Debug)]
pub struct EntryStat {
    blocks: u64,
    is_dir: bool,
}

impl EntryStat {
    /// Physical allocation of the inode in 512-byte blocks.
    #[must_use]
    #[inline]
    pub const fn blocks(&self) -> u64 {
        self.blocks
    }

    /// True for directories proper; symlinks to directories are not
    /// followed and report as non-directories.
    #[must_use]
    #[inline]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// `lstat` the given path.
///
/// # Errors
/// Returns the OS error when the path cannot be statted, or
/// `InvalidInput` when the path contains an interior NUL byte.
#[inline]
#[allow(clippy::cast_sign_loss)] // st_blocks is signed in libc but never negative
pub fn lstat(path: &Path) -> io::Result<EntryStat> {
    let cpath = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

    let mut raw = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: cpath is NUL-terminated and raw is a valid out-pointer for
    // exactly one libc::stat.
    if unsafe { libc::lstat(cpath.as_ptr(), raw.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: lstat returned 0, so the whole struct is initialised.
    let raw = unsafe { raw.assume_init() };

    Ok(EntryStat {
        blocks: raw.st_blocks as u64,
        is_dir: (raw.st_mode & libc::S_IFMT) == libc::S_IFDIR,
    })
}

use core::fmt;

/// Error type for disk usage runs.
///
/// Per-directory problems (an unreadable directory, a child that vanishes
/// mid-enumeration) are not errors at this level; the walker absorbs them
/// and the only cross-task signal is the permission flag. Resource faults
/// (thread spawn/join failure, a poisoned queue mutex, `closedir`
/// failure) abort the process outright. What remains recoverable is the
/// output stream.
#[derive(Debug)]
pub enum MduError {
    /// Writing a result line to stdout failed.
    BrokenPipe(std::io::Error),
}

impl fmt::Display for MduError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BrokenPipe(error) => write!(f, "cannot write to stdout: {error}"),
        }
    }
}

impl std::error::Error for MduError {}

use core::fmt::Display;

/// Print a diagnostic to stderr and terminate the process with a failure
/// exit code.
///
/// Reserved for resource errors that leave the pool in a state no caller
/// can repair: a poisoned queue mutex, a failing `closedir`. Everything
/// recoverable goes through [`crate::MduError`] instead.
pub(crate) fn fatal(message: impl Display) -> ! {
    eprintln!("mdu: {message}");
    std::process::exit(1);
}

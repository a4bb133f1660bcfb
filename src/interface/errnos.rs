//! Errno values and the translation of host failures into them.
//!
//! Every call in this crate reports failure by returning `-(errno)` (or an
//! `Err(Errno)` internally).  Nothing reads or writes a process-wide "last
//! error", so the value a caller inspects is always the one produced by the
//! call it just made.

// Let's not have clippy warn for EAGAIN, etc.
#![allow(clippy::upper_case_acronyms)]
// Don't warn if all listed things (like errnos) are not used in code...
#![allow(dead_code)]

use std::io;

use crate::interface::misc::verbosity;

#[doc(hidden)]
macro_rules! reversible_enum {
    ($(#[$settings: meta])* $visibility: vis enum $enumname:ident {
        $($valuename: ident = $value: expr,)*
    }) => {
        $(#[$settings])*
        $visibility enum $enumname {
            $($valuename = $value,)*
        }

        impl $enumname {
            /// Looks an errno up by its numeric value.
            $visibility fn from_discriminant(v: i32) -> Result<Self, ()> {
                match v {
                    $($value => Ok($enumname::$valuename),)*
                    _ => Err(()),
                }
            }
        }
    }
}

reversible_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(i32)]
    /// Errno values for the calls this shim implements (Linux numbering)
    pub enum Errno {
        EPERM = 1,	// Operation not permitted
        ENOENT = 2,     // No such file or directory
        EINTR = 4,	// Interrupted system call
        EIO = 5,	// I/O error
        ENXIO = 6,	// No such device or address
        EBADF = 9,	// Bad file number
        EAGAIN = 11,	// Try again
        ENOMEM = 12,	// Out of memory
        EACCES = 13,	// Permission denied
        EFAULT = 14,	// Bad address
        EBUSY = 16,	// Device or resource busy
        EEXIST = 17,	// File exists
        EXDEV = 18,	// Cross-device link
        ENODEV = 19,	// No such device
        ENOTDIR = 20,	// Not a directory
        EISDIR = 21,	// Is a directory
        EINVAL = 22,	// Invalid argument
        ENFILE = 23,	// File table overflow
        EMFILE = 24,	// Too many open files
        ETXTBSY = 26,	// Text file busy
        EFBIG = 27,	// File too large
        ENOSPC = 28,	// No space left on device
        ESPIPE = 29,	// Illegal seek
        EROFS = 30,	// Read-only file system
        EMLINK = 31,	// Too many links
        EPIPE = 32,	// Broken pipe
        EDEADLK = 35,	// Resource deadlock would occur
        ENAMETOOLONG = 36,	// File name too long
        ENOLCK = 37,  // No record locks available
        ENOSYS = 38,	// Function not implemented
        ENOTEMPTY = 39,	// Directory not empty
        ELOOP = 40,	// Too many symbolic links encountered
        EOVERFLOW = 75,	// Value too large for defined data type
        EBADFD = 77,	// File descriptor in bad state
        EOPNOTSUPP = 95,	// Operation not supported on transport endpoint
        ETIMEDOUT = 110,	// Connection timed out
        EDQUOT = 122,	// Quota exceeded
    }
}

impl Errno {
    /// Negative status value handed back to the caller.
    pub fn as_status(self) -> i32 {
        -(self as i32)
    }

    /// Translates a host failure.  The raw OS code wins when it is known,
    /// otherwise the portable `io::ErrorKind` decides, and `EIO` is the
    /// fallback for anything else.
    pub fn from_io_error(err: &io::Error) -> Errno {
        if let Some(code) = err.raw_os_error() {
            if let Some(errno) = crate::interface::platform::map_os_error(code) {
                return errno;
            }
        }
        match err.kind() {
            io::ErrorKind::NotFound => Errno::ENOENT,
            io::ErrorKind::PermissionDenied => Errno::EACCES,
            io::ErrorKind::AlreadyExists => Errno::EEXIST,
            io::ErrorKind::WouldBlock => Errno::EAGAIN,
            io::ErrorKind::InvalidInput => Errno::EINVAL,
            io::ErrorKind::Interrupted => Errno::EINTR,
            io::ErrorKind::TimedOut => Errno::ETIMEDOUT,
            io::ErrorKind::BrokenPipe => Errno::EPIPE,
            io::ErrorKind::Unsupported => Errno::EOPNOTSUPP,
            io::ErrorKind::OutOfMemory => Errno::ENOMEM,
            _ => Errno::EIO,
        }
    }
}

impl From<io::Error> for Errno {
    fn from(err: io::Error) -> Self {
        Errno::from_io_error(&err)
    }
}

/// Builds the failure status for `syscall`, logging it when the shim was
/// initialized with a non-zero verbosity.
pub fn syscall_error(e: Errno, syscall: &str, message: &str) -> i32 {
    if verbosity() > 0 {
        log::debug!("Error in syscall: {} - {:?}: {}", syscall, e, message);
    }
    e.as_status()
}

/// Same as [`syscall_error`] for a failure that came back from the host.
pub fn handle_io_error(err: &io::Error, syscall: &str) -> i32 {
    let errno = Errno::from_io_error(err);
    syscall_error(errno, syscall, &err.to_string())
}

/// Collapses an internal result into the status value callers see.
pub fn status_of(result: Result<(), Errno>, syscall: &str) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => syscall_error(e, syscall, "operation failed"),
    }
}

// Host back-ends.  Each one exposes the same free functions; the shim above
// never names a platform directly.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use self::unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::*;

#[cfg(not(any(unix, windows)))]
compile_error!("hostposix only supports Unix and Windows hosts.");

// hostposix - POSIX file semantics on top of the host's native I/O
//
// This library gives an embedded storage engine the handful of POSIX calls it
// is written against (positioned reads, truncation, recursive directory
// management, advisory locks, timing) and maps each one onto the host.

pub mod constants;
pub mod fdtables;
pub mod interface;
pub mod safeposix;

#[cfg(test)]
mod tests;

// Re-export the syscall surface for embedders and integration tests
pub use interface::{hostposix_init, snprintf, Errno, FileStream, FlockStruct, StatData, TimeVal, TmStruct};
pub use safeposix::syscalls::*;

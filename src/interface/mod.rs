// Everything the syscalls reach below them: errno values, data structs, the
// host back-ends and a few helpers.
pub mod errnos;
mod file;
mod misc;
pub mod platform;
pub mod types;

pub use errnos::*;
pub use file::*;
pub use misc::*;
pub use types::*;

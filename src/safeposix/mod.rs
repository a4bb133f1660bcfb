pub mod filesystem;
pub mod syscalls;

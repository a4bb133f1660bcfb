//! The descriptor table.  Callers only ever hold an integer descriptor; every
//! call translates it back into the host handle it stands for, which is what
//! the C runtime's descriptor table does for `_get_osfhandle`.
//!
//! The table is a `DashMap` so that calls on different descriptors from
//! different threads only contend when they land on the same shard.  Entries
//! keep the host handle in an `Arc`, so a descriptor closed while another
//! thread is mid-call stays valid for that call.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lazy_static::lazy_static;

use std::fs::File;
use std::sync::Arc;

use crate::constants::{FD_PER_PROCESS_MAX, FD_START};
use crate::interface::errnos::Errno;

/// Descriptor backed by a regular file.
pub const FDKIND_FILE: u32 = 0;
/// Descriptor backed by a directory, only good for fsync / fstat / close.
pub const FDKIND_DIR: u32 = 1;

/// This is a table entry, looked up by virtual fd.
#[derive(Clone, Debug)]
pub struct FDTableEntry {
    /// FDKIND_FILE or FDKIND_DIR
    pub fdkind: u32,
    /// The host handle.
    pub hostfile: Arc<File>,
    /// Flags the descriptor was opened with (O_BINARY always included).
    pub oflag: i32,
}

lazy_static! {
    #[derive(Debug)]
    static ref FDTABLE: DashMap<u64, FDTableEntry> = DashMap::new();
}

/// Hands out the lowest free descriptor for `hostfile`.
pub fn get_unused_virtual_fd(fdkind: u32, hostfile: File, oflag: i32) -> Result<i32, Errno> {
    let myentry = FDTableEntry {
        fdkind,
        hostfile: Arc::new(hostfile),
        oflag,
    };

    for fdcandidate in FD_START..FD_PER_PROCESS_MAX {
        if let Entry::Vacant(slot) = FDTABLE.entry(fdcandidate) {
            slot.insert(myentry);
            return Ok(fdcandidate as i32);
        }
    }

    // I must have checked all fds and failed to find one open.  Fail!
    Err(Errno::EMFILE)
}

/// Validates `virtualfd` and returns the entry behind it.  Nothing is done to
/// the host handle before this succeeds.
pub fn translate_virtual_fd(virtualfd: i32) -> Result<FDTableEntry, Errno> {
    if virtualfd < 0 || virtualfd as u64 >= FD_PER_PROCESS_MAX {
        return Err(Errno::EBADF);
    }
    match FDTABLE.get(&(virtualfd as u64)) {
        Some(tableentry) => Ok(tableentry.clone()),
        None => Err(Errno::EBADF),
    }
}

/// Drops the descriptor.  The host handle closes once no call is using it.
pub fn close_virtualfd(virtualfd: i32) -> Result<(), Errno> {
    if virtualfd < 0 {
        return Err(Errno::EBADF);
    }
    match FDTABLE.remove(&(virtualfd as u64)) {
        Some(_) => Ok(()),
        None => Err(Errno::EBADF),
    }
}

/// Number of open descriptors.
pub fn open_count() -> usize {
    FDTABLE.len()
}

#[doc(hidden)]
// Empties the table.  Only for tests.
pub fn refresh() {
    FDTABLE.clear();
}

/***************************** TESTS FOLLOW ******************************/

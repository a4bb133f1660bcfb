#![allow(dead_code)]

// System related system calls: identity, clocks, locks and sleeping
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::constants::{DEFAULT_UID, MICROS_PER_MILLI, MILLIS_PER_SEC, SLEEP_BUSY_WAIT_THRESHOLD_US};
use crate::fdtables::{self, FDKIND_DIR};
use crate::interface::{
    coarse_tick_ms, handle_io_error, platform, syscall_error, Errno, TimeVal, TmStruct,
};

/// How a [`precise_sleep`] call waited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepStrategy {
    /// Spun on the monotonic clock.
    BusyWait,
    /// Handed the thread to the scheduler at millisecond granularity.
    Coarse,
}

//------------------------------------GETEUID SYSCALL------------------------------------
/*
 *   There are no user identities here, geteuid() is a fixed placeholder.
 */
pub fn geteuid_syscall() -> i32 {
    DEFAULT_UID as i32
}

//------------------------------------GETPAGESIZE SYSCALL------------------------------------
pub fn getpagesize_syscall() -> i32 {
    platform::page_size() as i32
}

//------------------------------------GETTIMEOFDAY SYSCALL------------------------------------
/*
 *   Seconds come from the wall clock, microseconds from the coarse millisecond
 *   tick.  Good enough for log timestamps and nothing more.  Never fails.
 */
pub fn gettimeofday_syscall(tv: &mut TimeVal) -> i32 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    tv.tv_sec = now.as_secs() as i64;
    tv.tv_usec = ((coarse_tick_ms() % MILLIS_PER_SEC) * MICROS_PER_MILLI) as i64;
    0
}

//------------------------------------LOCALTIME_R------------------------------------
/*
 *   Reentrant: the result is written to the caller's struct only.
 */
pub fn localtime_r_syscall(time: i64, result: &mut TmStruct) -> i32 {
    match platform::localtime(time) {
        Some(tm) => {
            *result = tm;
            0
        }
        None => syscall_error(Errno::EOVERFLOW, "localtime_r", "time out of range"),
    }
}

//------------------------------------TRYLOCK / UNLOCK------------------------------------
/*
 *   Advisory whole-file locks that never block.  If another handle holds a
 *   conflicting lock the call comes back with EAGAIN straight away.
 */
pub fn trylock_syscall(virtual_fd: i32, exclusive: bool) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "trylock", "Bad File Descriptor"),
    };
    if entry.fdkind == FDKIND_DIR {
        return syscall_error(Errno::EBADF, "trylock", "descriptor is a directory");
    }
    match platform::try_lock(&entry.hostfile, exclusive) {
        Ok(()) => 0,
        Err(e) => handle_io_error(&e, "trylock"),
    }
}

pub fn unlock_syscall(virtual_fd: i32) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "unlock", "Bad File Descriptor"),
    };
    match platform::unlock(&entry.hostfile) {
        Ok(()) => 0,
        Err(e) => handle_io_error(&e, "unlock"),
    }
}

// Whole milliseconds covering `usec`, rounded up.
pub(crate) fn coarse_sleep_millis(usec: u64) -> u64 {
    usec.div_ceil(MICROS_PER_MILLI)
}

/// Waits at least `usec` microseconds.  Short waits spin on `Instant` since
/// the scheduler can't do better than a millisecond or so; long ones sleep in
/// whole milliseconds, rounded up.
pub fn precise_sleep(usec: u64) -> SleepStrategy {
    let requested = Duration::from_micros(usec);
    if usec < SLEEP_BUSY_WAIT_THRESHOLD_US {
        let start = Instant::now();
        while start.elapsed() < requested {
            std::hint::spin_loop();
        }
        SleepStrategy::BusyWait
    } else {
        thread::sleep(Duration::from_millis(coarse_sleep_millis(usec)));
        SleepStrategy::Coarse
    }
}

//------------------------------------USLEEP SYSCALL------------------------------------
pub fn usleep_syscall(usec: u64) -> i32 {
    precise_sleep(usec);
    0
}

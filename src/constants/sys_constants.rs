#![allow(dead_code)]
#![allow(unused_variables)]

// ===== User and Group ID Constants =====
// The host has no equivalent identity, callers treat this as advisory.
pub const DEFAULT_UID: u32 = 0;
pub const DEFAULT_GID: u32 = 0;

// ===== Sleep =====
// Requests below this (in microseconds) are busy-polled on the monotonic clock
// because host schedulers do not sleep with sub-millisecond granularity.
pub const SLEEP_BUSY_WAIT_THRESHOLD_US: u64 = 10_000;

// ===== Time =====
pub const MICROS_PER_MILLI: u64 = 1_000;
pub const MILLIS_PER_SEC: u64 = 1_000;

// ===== Fallback page size =====
// Only used when the host query reports nothing usable.
pub const PAGESHIFT: u32 = 12;
pub const PAGESIZE: u32 = 1 << PAGESHIFT;

// ===== Verbosity =====
pub const VERBOSE_QUIET: isize = 0;
pub const VERBOSE_ERRORS: isize = 1;

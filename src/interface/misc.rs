// Misc functions for interface
// Verbosity, coarse clock, bounded formatting, etc.
#![allow(dead_code)]

use lazy_static::lazy_static;
use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use crate::constants::VERBOSE_QUIET;

static VERBOSE: OnceLock<isize> = OnceLock::new();

lazy_static! {
    // Origin of the coarse millisecond tick.
    static ref TICK_ORIGIN: Instant = Instant::now();
}

/// One-time setup for the shim.  Only the first call takes effect, so the
/// embedding application can call it unconditionally.
pub fn hostposix_init(verbosity: isize) {
    let _ = VERBOSE.set(verbosity);
    lazy_static::initialize(&TICK_ORIGIN);
}

pub fn verbosity() -> isize {
    *VERBOSE.get().unwrap_or(&VERBOSE_QUIET)
}

/// Milliseconds since the shim first looked at the clock.  Coarse on purpose,
/// it only feeds logging-grade timestamps.
pub fn coarse_tick_ms() -> u64 {
    TICK_ORIGIN.elapsed().as_millis() as u64
}

struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
    total: usize,
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // last byte is reserved for the terminating NUL
        let capacity = self.buf.len().saturating_sub(1);
        if self.written < capacity {
            let n = std::cmp::min(capacity - self.written, s.len());
            self.buf[self.written..self.written + n].copy_from_slice(&s.as_bytes()[..n]);
            self.written += n;
        }
        self.total += s.len();
        Ok(())
    }
}

/// C99 `snprintf`: writes at most `buf.len()` bytes including the NUL
/// terminator and returns the length the untruncated output would have had.
/// An empty buffer is left alone and only the length is computed.
pub fn snprintf(buf: &mut [u8], args: fmt::Arguments) -> usize {
    let mut writer = BoundedWriter {
        buf,
        written: 0,
        total: 0,
    };
    // BoundedWriter never fails, only a Display impl can
    let _ = fmt::write(&mut writer, args);
    let end = writer.written;
    let total = writer.total;
    if !writer.buf.is_empty() {
        writer.buf[end] = 0;
    }
    total
}

/// `shim_snprintf!(buf, "fmt", args..)` is [`snprintf`] with `format!` syntax.
#[macro_export]
macro_rules! shim_snprintf {
    ($buf:expr, $($arg:tt)*) => {
        $crate::interface::snprintf($buf, format_args!($($arg)*))
    };
}

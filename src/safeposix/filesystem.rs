// Path translation between what the engine passes in and what the host is
// given.  Everything here is pure string work, no I/O.

use std::ffi::CString;
use std::path::PathBuf;

use crate::constants::{
    CURRENT_DIR_MARKER, NATIVE_SEPARATOR, PARENT_DIR_MARKER, PATH_SEPARATOR, WILDCARD_MARKER,
};
use crate::interface::errnos::Errno;

fn is_separator(c: char) -> bool {
    c == PATH_SEPARATOR || c == NATIVE_SEPARATOR
}

/// Normalizes an engine path for the host: one separator convention (`/`), and
/// a rooted path gets a leading `.` so the host resolves it against the working
/// directory instead of the volume root.
///
/// Deterministic and idempotent: feeding the output back in returns it as is,
/// so callers may pass either raw or already-normalized paths.
pub fn normpath(path: &str) -> String {
    let mut newp = String::with_capacity(path.len() + 1);
    if path.starts_with(is_separator) {
        newp.push_str(CURRENT_DIR_MARKER);
    }
    newp.extend(path.chars().map(|c| if c == NATIVE_SEPARATOR { PATH_SEPARATOR } else { c }));
    newp
}

/// Native-style form of `path`: backslash separators, and a rooted path is
/// anchored with `..` in front of it.
pub fn normpath_full(path: &str) -> String {
    let mut newp = String::with_capacity(path.len() + 2);
    if path.starts_with(PATH_SEPARATOR) {
        newp.push_str(PARENT_DIR_MARKER);
    }
    newp.extend(path.chars().map(|c| if c == PATH_SEPARATOR { NATIVE_SEPARATOR } else { c }));
    newp
}

/// Normalized path ready for the host's std::fs calls.
pub fn convpath(path: &str) -> PathBuf {
    PathBuf::from(normpath(path))
}

/// Normalized path as a C string.  An interior NUL is `EINVAL`.
pub fn to_cstring(path: &str) -> Result<CString, Errno> {
    CString::new(normpath(path)).map_err(|_| Errno::EINVAL)
}

/// A path whose final segment ended in the wildcard marker, split into the
/// directory to enumerate and the literal text names must start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    pub dir: String,
    pub prefix: String,
}

/// Splits a normalized path ending in `*`.  Returns `None` when there is no
/// trailing marker.  A bare `foo*` is looked up in the current directory.
pub fn split_wildcard(path: &str) -> Option<WildcardPattern> {
    let stem = path.strip_suffix(WILDCARD_MARKER)?;
    match stem.rfind(PATH_SEPARATOR) {
        Some(idx) => Some(WildcardPattern {
            // keep the separator so "/foo*" still names the root
            dir: stem[..=idx].to_string(),
            prefix: stem[idx + 1..].to_string(),
        }),
        None => Some(WildcardPattern {
            dir: CURRENT_DIR_MARKER.to_string(),
            prefix: stem.to_string(),
        }),
    }
}

// Directory related system calls
//
// Creation walks the path one component at a time.  Removal goes depth first:
// a directory is only removed once everything under it is gone, and every
// child's type is looked up again right before acting on it.
use std::fs::{self, DirBuilder};
use std::io;
use std::path::Path;

use crate::constants::PATH_SEPARATOR;
use crate::interface::{platform, status_of, syscall_error, Errno};
use crate::safeposix::filesystem::{normpath, split_wildcard, WildcardPattern};

// EEXIST is not an error here.  For the last component whatever exists has to
// be a directory though; for the others the next create fails on its own.
fn create_one(builder: &DirBuilder, path: &str, last: bool) -> Result<(), Errno> {
    match builder.create(path) {
        Ok(()) => Ok(()),
        Err(e) => match Errno::from_io_error(&e) {
            Errno::EEXIST if !last || Path::new(path).is_dir() => Ok(()),
            errno => Err(errno),
        },
    }
}

//------------------MKDIR SYSCALL------------------
/*
 *   mkdir() creates every missing directory along the path, like mkdir -p.
 *   Returns 0 when the full path exists as a directory afterwards, so calling it
 *   twice is fine.  The first failure other than "already exists" aborts.
 */
pub fn mkdir_syscall(path: &str, mode: u32) -> i32 {
    let newp = normpath(path);
    if newp.is_empty() {
        return syscall_error(Errno::ENOENT, "mkdir", "empty path");
    }

    let mut builder = DirBuilder::new();
    platform::apply_dir_mode(&mut builder, mode);

    for (idx, _) in newp.match_indices(PATH_SEPARATOR) {
        let prefix = &newp[..idx];
        // "", "." and ".." always exist
        if matches!(prefix.rsplit(PATH_SEPARATOR).next(), Some("" | "." | "..")) {
            continue;
        }
        if let Err(e) = create_one(&builder, prefix, false) {
            return syscall_error(e, "mkdir", prefix);
        }
    }
    match create_one(&builder, &newp, true) {
        Ok(()) => 0,
        Err(e) => syscall_error(e, "mkdir", &newp),
    }
}

//------------------RMDIR SYSCALL------------------
/*
 *   rmdir() removes a whole tree.  A final component ending in '*' removes every
 *   subdirectory of the containing directory whose name starts with what comes
 *   before the '*'.
 */
pub fn rmdir_syscall(path: &str) -> i32 {
    let newp = normpath(path);
    let result = match split_wildcard(&newp) {
        Some(pattern) => remove_matching(&pattern),
        None => remove_tree(Path::new(&newp)),
    };
    status_of(result, "rmdir")
}

/// Removes `path` and everything below it.
///
/// A first attempt that fails for any reason but "not empty" reports its own
/// errno.  Children are removed best effort; if the directory still can't be
/// removed after that the result is `EIO`.
pub fn remove_dir_tree(path: &str) -> Result<(), Errno> {
    remove_tree(Path::new(&normpath(path)))
}

/// Removes the subdirectories matched by a `dir/prefix*` pattern.  Files and
/// non-matching directories are left alone.  Without a trailing `*` this is
/// [`remove_dir_tree`].
pub fn remove_dir_wildcard(pattern: &str) -> Result<(), Errno> {
    let newp = normpath(pattern);
    match split_wildcard(&newp) {
        Some(pattern) => remove_matching(&pattern),
        None => remove_tree(Path::new(&newp)),
    }
}

fn is_not_empty(e: &io::Error) -> bool {
    // some hosts say EEXIST for a non-empty directory
    matches!(Errno::from_io_error(e), Errno::ENOTEMPTY | Errno::EEXIST)
}

fn remove_tree(path: &Path) -> Result<(), Errno> {
    match fs::remove_dir(path) {
        Ok(()) => return Ok(()),
        Err(e) if !is_not_empty(&e) => return Err(Errno::from_io_error(&e)),
        Err(_) => {}
    }

    let entries = fs::read_dir(path).map_err(|e| Errno::from_io_error(&e))?;
    let mut failed = false;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::trace!("rmdir: bad entry under {:?}: {}", path, e);
                failed = true;
                continue;
            }
        };
        let child = entry.path();
        // symlink_metadata so a link to a directory is unlinked, not followed
        let outcome = match fs::symlink_metadata(&child) {
            Ok(md) if md.is_dir() => remove_tree(&child),
            Ok(_) => fs::remove_file(&child).map_err(|e| Errno::from_io_error(&e)),
            // gone since the listing
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Errno::from_io_error(&e)),
        };
        if let Err(e) = outcome {
            log::trace!("rmdir: could not remove {:?}: {:?}", child, e);
            failed = true;
        }
    }

    if failed {
        log::trace!("rmdir: {:?} left behind, some entries would not go", path);
        return Err(Errno::EIO);
    }
    fs::remove_dir(path).map_err(|e| {
        log::trace!("rmdir: {:?} still there after clearing it: {}", path, e);
        Errno::EIO
    })
}

fn remove_matching(pattern: &WildcardPattern) -> Result<(), Errno> {
    let dir = Path::new(&pattern.dir);
    let entries = fs::read_dir(dir).map_err(|e| Errno::from_io_error(&e))?;

    let mut failed = false;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                failed = true;
                continue;
            }
        };
        if !entry.file_name().to_string_lossy().starts_with(&pattern.prefix) {
            continue;
        }
        let child = entry.path();
        let is_dir = match fs::symlink_metadata(&child) {
            Ok(md) => md.is_dir(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(_) => {
                failed = true;
                continue;
            }
        };
        if is_dir && remove_tree(&child).is_err() {
            failed = true;
        }
    }

    if failed {
        return Err(Errno::EIO);
    }
    Ok(())
}

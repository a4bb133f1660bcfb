use std::fs::{self, DirBuilder, File, Metadata, OpenOptions};
use std::io;
use std::os::windows::fs::{FileExt, OpenOptionsExt};
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle};
use std::path::Path;

use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_BAD_PATHNAME, ERROR_DIRECTORY,
    ERROR_DIR_NOT_EMPTY, ERROR_DISK_FULL, ERROR_FILENAME_EXCED_RANGE, ERROR_FILE_EXISTS,
    ERROR_FILE_NOT_FOUND, ERROR_INVALID_HANDLE, ERROR_INVALID_NAME, ERROR_INVALID_PARAMETER,
    ERROR_LOCK_VIOLATION, ERROR_NOT_SAME_DEVICE, ERROR_PATH_NOT_FOUND, ERROR_SHARING_VIOLATION,
    ERROR_TOO_MANY_OPEN_FILES, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    LockFileEx, ReOpenFile, UnlockFileEx, FILE_FLAG_BACKUP_SEMANTICS, FILE_GENERIC_READ,
    FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE, LOCKFILE_EXCLUSIVE_LOCK,
    LOCKFILE_FAIL_IMMEDIATELY,
};
use windows_sys::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};
use windows_sys::Win32::System::IO::OVERLAPPED;

use crate::constants::{PAGESIZE, S_IFDIR, S_IFLNK, S_IFREG, W_OK};
use crate::interface::errnos::Errno;
use crate::interface::types::TmStruct;

const SHARE_ALL: u32 = FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE;

pub fn map_os_error(code: i32) -> Option<Errno> {
    let errno = match code as u32 {
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => Errno::ENOENT,
        ERROR_FILE_EXISTS | ERROR_ALREADY_EXISTS => Errno::EEXIST,
        ERROR_ACCESS_DENIED | ERROR_SHARING_VIOLATION => Errno::EACCES,
        ERROR_INVALID_HANDLE => Errno::EBADF,
        ERROR_DIR_NOT_EMPTY => Errno::ENOTEMPTY,
        ERROR_DIRECTORY => Errno::ENOTDIR,
        ERROR_LOCK_VIOLATION => Errno::EAGAIN,
        ERROR_DISK_FULL => Errno::ENOSPC,
        ERROR_TOO_MANY_OPEN_FILES => Errno::EMFILE,
        ERROR_NOT_SAME_DEVICE => Errno::EXDEV,
        ERROR_FILENAME_EXCED_RANGE => Errno::ENAMETOOLONG,
        ERROR_INVALID_NAME | ERROR_BAD_PATHNAME | ERROR_INVALID_PARAMETER => Errno::EINVAL,
        _ => return None,
    };
    Some(errno)
}

fn raw(file: &File) -> HANDLE {
    file.as_raw_handle() as HANDLE
}

/// ReadFile with an OVERLAPPED offset still moves the pointer of a synchronous
/// handle.  Reading through a freshly reopened file object gives the read its
/// own pointer, so the caller's sequential position is never touched.
pub fn pread(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let handle = unsafe { ReOpenFile(raw(file), FILE_GENERIC_READ, SHARE_ALL, 0) };
    if handle == INVALID_HANDLE_VALUE {
        return Err(io::Error::last_os_error());
    }
    let private = File::from(unsafe { OwnedHandle::from_raw_handle(handle as RawHandle) });

    let mut total = 0;
    while total < buf.len() {
        match private.seek_read(&mut buf[total..], offset + total as u64) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Positioned write.  Moves the file pointer; callers restore it.
pub fn pwrite_all(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    let mut done = 0;
    while done < buf.len() {
        match file.seek_write(&buf[done..], offset + done as u64) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero)),
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

pub fn try_lock(file: &File, exclusive: bool) -> io::Result<()> {
    let mut flags = LOCKFILE_FAIL_IMMEDIATELY;
    if exclusive {
        flags |= LOCKFILE_EXCLUSIVE_LOCK;
    }
    let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
    let ok = unsafe { LockFileEx(raw(file), flags, 0, u32::MAX, u32::MAX, &mut overlapped) };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn unlock(file: &File) -> io::Result<()> {
    let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
    let ok = unsafe { UnlockFileEx(raw(file), 0, u32::MAX, u32::MAX, &mut overlapped) };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn page_size() -> usize {
    let mut info: SYSTEM_INFO = unsafe { std::mem::zeroed() };
    unsafe { GetSystemInfo(&mut info) };
    if info.dwPageSize > 0 {
        info.dwPageSize as usize
    } else {
        PAGESIZE as usize
    }
}

/// localtime_s writes into caller-owned storage only.
pub fn localtime(time: i64) -> Option<TmStruct> {
    let t = time as libc::time_t;
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    if unsafe { libc::localtime_s(&mut tm, &t) } != 0 {
        return None;
    }
    Some(TmStruct {
        tm_sec: tm.tm_sec,
        tm_min: tm.tm_min,
        tm_hour: tm.tm_hour,
        tm_mday: tm.tm_mday,
        tm_mon: tm.tm_mon,
        tm_year: tm.tm_year,
        tm_wday: tm.tm_wday,
        tm_yday: tm.tm_yday,
        tm_isdst: tm.tm_isdst,
    })
}

/// Directories only open with backup semantics, and flushing one needs write
/// access on top of read.
pub fn open_directory(path: &Path, for_flush: bool) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(for_flush)
        .share_mode(SHARE_ALL)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)
}

pub fn share_all(opts: &mut OpenOptions) {
    opts.share_mode(SHARE_ALL);
}

// Permission bits have no meaning for NTFS ACLs.
pub fn apply_create_mode(_opts: &mut OpenOptions, _mode: u32) {}

pub fn apply_dir_mode(_builder: &mut DirBuilder, _mode: u32) {}

pub fn access(path: &Path, amode: i32) -> io::Result<()> {
    let metadata = fs::metadata(path)?;
    if amode & W_OK != 0 && metadata.permissions().readonly() {
        return Err(io::Error::from_raw_os_error(ERROR_ACCESS_DENIED as i32));
    }
    Ok(())
}

/// No inode mode on NTFS: the file type plus rwx bits, write dropped for
/// read-only files.
pub fn mode_and_nlink(metadata: &Metadata) -> (u32, u32) {
    let filetype = metadata.file_type();
    let kind = if filetype.is_symlink() {
        S_IFLNK
    } else if filetype.is_dir() {
        S_IFDIR
    } else {
        S_IFREG
    };
    let perms = if metadata.permissions().readonly() { 0o555 } else { 0o777 };
    (kind | perms, 1)
}

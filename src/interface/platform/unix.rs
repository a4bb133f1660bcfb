use std::ffi::CString;
use std::fs::{DirBuilder, File, Metadata, OpenOptions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{DirBuilderExt, FileExt, MetadataExt, OpenOptionsExt};
use std::os::unix::io::AsRawFd;
use std::path::Path;

use crate::constants::PAGESIZE;
use crate::interface::errnos::Errno;
use crate::interface::types::TmStruct;

pub fn map_os_error(code: i32) -> Option<Errno> {
    let errno = match code {
        libc::EPERM => Errno::EPERM,
        libc::ENOENT => Errno::ENOENT,
        libc::EINTR => Errno::EINTR,
        libc::EIO => Errno::EIO,
        libc::EBADF => Errno::EBADF,
        libc::EAGAIN => Errno::EAGAIN,
        libc::ENOMEM => Errno::ENOMEM,
        libc::EACCES => Errno::EACCES,
        libc::EBUSY => Errno::EBUSY,
        libc::EEXIST => Errno::EEXIST,
        libc::EXDEV => Errno::EXDEV,
        libc::ENOTDIR => Errno::ENOTDIR,
        libc::EISDIR => Errno::EISDIR,
        libc::EINVAL => Errno::EINVAL,
        libc::ENFILE => Errno::ENFILE,
        libc::EMFILE => Errno::EMFILE,
        libc::EFBIG => Errno::EFBIG,
        libc::ENOSPC => Errno::ENOSPC,
        libc::ESPIPE => Errno::ESPIPE,
        libc::EROFS => Errno::EROFS,
        libc::ENAMETOOLONG => Errno::ENAMETOOLONG,
        libc::ENOLCK => Errno::ENOLCK,
        libc::ENOTEMPTY => Errno::ENOTEMPTY,
        libc::ELOOP => Errno::ELOOP,
        libc::EOVERFLOW => Errno::EOVERFLOW,
        libc::EDQUOT => Errno::EDQUOT,
        _ => return None,
    };
    Some(errno)
}

/// pread(2) never touches the file offset, so this is atomic with respect to
/// read/write/lseek on the same descriptor.  Keeps reading until `buf` is full
/// or end of file.
pub fn pread(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match file.read_at(&mut buf[total..], offset + total as u64) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Positioned write.  Leaves the file offset alone.
pub fn pwrite_all(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    file.write_all_at(buf, offset)
}

pub fn try_lock(file: &File, exclusive: bool) -> io::Result<()> {
    let operation = if exclusive {
        libc::LOCK_EX | libc::LOCK_NB
    } else {
        libc::LOCK_SH | libc::LOCK_NB
    };
    let ret = unsafe { libc::flock(file.as_raw_fd(), operation) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn unlock(file: &File) -> io::Result<()> {
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn page_size() -> usize {
    let ret = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if ret > 0 {
        ret as usize
    } else {
        PAGESIZE as usize
    }
}

/// localtime_r(3): the caller owns the output, nothing is shared.
pub fn localtime(time: i64) -> Option<TmStruct> {
    let t = time as libc::time_t;
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::localtime_r(&t, &mut tm) };
    if ret.is_null() {
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

/// A directory opened read-only is enough for fsync(2) here.
pub fn open_directory(path: &Path, _for_flush: bool) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_DIRECTORY)
        .open(path)
}

// Unix handles never deny sharing.
pub fn share_all(_opts: &mut OpenOptions) {}

pub fn apply_create_mode(opts: &mut OpenOptions, mode: u32) {
    opts.mode(mode);
}

pub fn apply_dir_mode(builder: &mut DirBuilder, mode: u32) {
    builder.mode(mode);
}

pub fn access(path: &Path, amode: i32) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
    let ret = unsafe { libc::access(c_path.as_ptr(), amode) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// (st_mode, st_nlink) straight from the inode.
pub fn mode_and_nlink(metadata: &Metadata) -> (u32, u32) {
    (metadata.mode(), metadata.nlink() as u32)
}

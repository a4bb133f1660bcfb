#![allow(dead_code)]

// File system related system calls
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::constants::{
    F_GETFL, F_RDLCK, F_SETLK, F_SETLKW, F_UNLCK, F_WRLCK, HOST_TRUNCATE_ZERO_FILLS, O_APPEND,
    O_BINARY, O_CREAT, O_EXCL, O_RDONLY, O_RDWR, O_RDWRFLAGS, O_TRUNC, O_WRONLY, SEEK_CUR, SEEK_END,
    SEEK_SET, ZERO_FILL_CHUNK,
};
use crate::fdtables::{self, FDKIND_DIR, FDKIND_FILE};
use crate::interface::{
    binary_mode, handle_io_error, platform, syscall_error, Errno, FileStream, FlockStruct,
    StatData,
};
use crate::safeposix::filesystem::convpath;
use crate::safeposix::syscalls::sys_calls::{trylock_syscall, unlock_syscall};

// Largest byte count a single call can report in its i32 status.
const MAX_TRANSFER: usize = i32::MAX as usize;

fn open_options(oflag: i32, mode: u32) -> OpenOptions {
    let accmode = oflag & O_RDWRFLAGS;
    let writable = accmode == O_WRONLY || accmode == O_RDWR;

    let mut opts = OpenOptions::new();
    opts.read(accmode != O_WRONLY).write(writable);
    // every flag is its own bit test, O_CREAT alone never truncates
    if oflag & O_APPEND != 0 {
        opts.append(true);
    }
    // std won't take truncate together with append, open_file truncates after
    if oflag & O_TRUNC != 0 && oflag & O_APPEND == 0 {
        opts.truncate(true);
    }
    if oflag & O_CREAT != 0 {
        if oflag & O_EXCL != 0 {
            opts.create_new(true);
        } else {
            opts.create(true);
        }
    }
    platform::apply_create_mode(&mut opts, mode);
    platform::share_all(&mut opts);
    opts
}

// std refuses to create or truncate through a read-only handle, POSIX doesn't.
// Do that part with a throwaway writer and reopen read-only after.
fn open_readonly_via_writer(path: &Path, oflag: i32, mode: u32) -> io::Result<File> {
    let mut creator = OpenOptions::new();
    creator.write(true).truncate(oflag & O_TRUNC != 0);
    if oflag & O_CREAT != 0 {
        if oflag & O_EXCL != 0 {
            creator.create_new(true);
        } else {
            creator.create(true);
        }
    }
    platform::apply_create_mode(&mut creator, mode);
    platform::share_all(&mut creator);
    drop(creator.open(path)?);

    let mut reader = OpenOptions::new();
    reader.read(true);
    platform::share_all(&mut reader);
    reader.open(path)
}

fn open_file(path: &Path, oflag: i32, mode: u32) -> io::Result<File> {
    let readonly = oflag & O_RDWRFLAGS == O_RDONLY;
    if readonly && oflag & (O_CREAT | O_TRUNC) != 0 && oflag & O_APPEND == 0 {
        return open_readonly_via_writer(path, oflag, mode);
    }
    let file = open_options(oflag, mode).open(path)?;
    if oflag & O_TRUNC != 0 && oflag & O_APPEND != 0 {
        file.set_len(0)?;
    }
    Ok(file)
}

fn fill_statdata(metadata: &Metadata, statbuf: &mut StatData) {
    let (mode, nlink) = platform::mode_and_nlink(metadata);
    let stamp = |t: io::Result<std::time::SystemTime>| {
        t.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| (d.as_secs(), d.subsec_nanos() as u64))
            .unwrap_or_default()
    };
    statbuf.st_mode = mode;
    statbuf.st_nlink = nlink;
    statbuf.st_size = metadata.len();
    statbuf.st_atim = stamp(metadata.accessed());
    statbuf.st_mtim = stamp(metadata.modified());
}

fn zero_fill(file: &File, from: u64, to: u64) -> io::Result<()> {
    let zeros = vec![0u8; ZERO_FILL_CHUNK];
    let mut offset = from;
    while offset < to {
        let n = std::cmp::min(ZERO_FILL_CHUNK as u64, to - offset) as usize;
        platform::pwrite_all(file, &zeros[..n], offset)?;
        offset += n as u64;
    }
    Ok(())
}

//------------------------------------OPEN SYSCALL------------------------------------
/*
 *   open() opens the host file (or directory) and maps a new virtual fd to it.
 *   Returns the virtual fd, or -errno.
 *   A directory comes back as a handle that is only good for fsync/fstat/close.
 */
pub fn open_syscall(path: &str, oflag: i32, mode: u32) -> i32 {
    let hostpath = convpath(path);

    let is_dir = fs::metadata(&hostpath).map(|m| m.is_dir()).unwrap_or(false);
    let (fdkind, opened) = if is_dir {
        if oflag & (O_CREAT | O_EXCL) == (O_CREAT | O_EXCL) {
            return syscall_error(Errno::EEXIST, "open", "directory already exists");
        }
        let for_flush = oflag & (O_WRONLY | O_RDWR) != 0;
        (FDKIND_DIR, platform::open_directory(&hostpath, for_flush))
    } else {
        (FDKIND_FILE, open_file(&hostpath, oflag, mode))
    };

    let hostfile = match opened {
        Ok(f) => f,
        Err(e) => return handle_io_error(&e, "open"),
    };

    // host handles are always byte-exact, record it that way
    match fdtables::get_unused_virtual_fd(fdkind, hostfile, oflag | O_BINARY) {
        Ok(virtual_fd) => virtual_fd,
        Err(e) => syscall_error(e, "open", "Too many files opened"),
    }
}

//------------------------------------CLOSE SYSCALL------------------------------------
pub fn close_syscall(virtual_fd: i32) -> i32 {
    match fdtables::close_virtualfd(virtual_fd) {
        Ok(()) => 0,
        Err(e) => syscall_error(e, "close", "Bad File Descriptor"),
    }
}

//------------------------------------READ SYSCALL------------------------------------
/*
 *   read() returns the number of bytes read and advances the sequential position.
 */
pub fn read_syscall(virtual_fd: i32, buf: &mut [u8]) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "read", "Bad File Descriptor"),
    };
    if entry.fdkind == FDKIND_DIR {
        return syscall_error(Errno::EISDIR, "read", "descriptor is a directory");
    }
    let len = std::cmp::min(buf.len(), MAX_TRANSFER);
    match (&*entry.hostfile).read(&mut buf[..len]) {
        Ok(n) => n as i32,
        Err(e) => handle_io_error(&e, "read"),
    }
}

//------------------------------------PREAD SYSCALL------------------------------------
/*
 *   pread() reads up to buf.len() bytes starting at offset and returns how many it
 *   got (0 at end of file).  The descriptor's sequential position is left exactly
 *   where it was, even with reads, writes and seeks interleaved on the same fd.
 */
pub fn pread_syscall(virtual_fd: i32, buf: &mut [u8], offset: i64) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "pread", "Bad File Descriptor"),
    };
    if entry.fdkind == FDKIND_DIR {
        return syscall_error(Errno::EISDIR, "pread", "descriptor is a directory");
    }
    if offset < 0 {
        return syscall_error(Errno::EINVAL, "pread", "negative offset");
    }
    let len = std::cmp::min(buf.len(), MAX_TRANSFER);
    match platform::pread(&entry.hostfile, &mut buf[..len], offset as u64) {
        Ok(n) => n as i32,
        Err(e) => handle_io_error(&e, "pread"),
    }
}

//------------------------------------WRITE SYSCALL------------------------------------
pub fn write_syscall(virtual_fd: i32, buf: &[u8]) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "write", "Bad File Descriptor"),
    };
    if entry.fdkind == FDKIND_DIR {
        return syscall_error(Errno::EISDIR, "write", "descriptor is a directory");
    }
    let len = std::cmp::min(buf.len(), MAX_TRANSFER);
    match (&*entry.hostfile).write(&buf[..len]) {
        Ok(n) => n as i32,
        Err(e) => handle_io_error(&e, "write"),
    }
}

//------------------------------------LSEEK SYSCALL------------------------------------
/*
 *   lseek() returns the resulting offset.  It is an i64 since database files
 *   outgrow what an i32 status can hold.
 */
pub fn lseek_syscall(virtual_fd: i32, offset: i64, whence: i32) -> i64 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "lseek", "Bad File Descriptor") as i64,
    };
    let pos = match whence {
        SEEK_SET if offset >= 0 => SeekFrom::Start(offset as u64),
        SEEK_CUR => SeekFrom::Current(offset),
        SEEK_END => SeekFrom::End(offset),
        _ => return syscall_error(Errno::EINVAL, "lseek", "bad whence or offset") as i64,
    };
    match (&*entry.hostfile).seek(pos) {
        Ok(newpos) => newpos as i64,
        Err(e) => handle_io_error(&e, "lseek") as i64,
    }
}

//------------------------------------FTRUNCATE SYSCALL------------------------------------
/*
 *   ftruncate() sets the file length.  Shrinking drops the tail, growing fills the
 *   new region with zeros.  The sequential position is the same before and after.
 */
pub fn ftruncate_syscall(virtual_fd: i32, length: i64) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "ftruncate", "Bad File Descriptor"),
    };
    if entry.fdkind == FDKIND_DIR {
        return syscall_error(Errno::EISDIR, "ftruncate", "descriptor is a directory");
    }
    if length < 0 {
        return syscall_error(Errno::EINVAL, "ftruncate", "negative length");
    }
    let file: &File = &entry.hostfile;
    let newlen = length as u64;

    let result = (|| -> io::Result<()> {
        let savedpos = (&*file).stream_position()?;
        let oldlen = file.metadata()?.len();
        file.set_len(newlen)?;
        if !HOST_TRUNCATE_ZERO_FILLS && newlen > oldlen {
            zero_fill(file, oldlen, newlen)?;
        }
        (&*file).seek(SeekFrom::Start(savedpos))?;
        Ok(())
    })();

    match result {
        Ok(()) => 0,
        Err(e) => handle_io_error(&e, "ftruncate"),
    }
}

//------------------------------------FSYNC SYSCALL------------------------------------
/*
 *   fsync() pushes the file (or directory) to durable storage.  Any failure,
 *   bad descriptor or failed flush, is reported as EBADF.
 */
pub fn fsync_syscall(virtual_fd: i32) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "fsync", "Bad File Descriptor"),
    };
    match entry.hostfile.sync_all() {
        Ok(()) => 0,
        Err(e) => syscall_error(Errno::EBADF, "fsync", &e.to_string()),
    }
}

//------------------------------------ACCESS SYSCALL------------------------------------
pub fn access_syscall(path: &str, amode: i32) -> i32 {
    match platform::access(&convpath(path), amode) {
        Ok(()) => 0,
        Err(e) => handle_io_error(&e, "access"),
    }
}

//------------------------------------UNLINK SYSCALL------------------------------------
pub fn unlink_syscall(path: &str) -> i32 {
    match fs::remove_file(convpath(path)) {
        Ok(()) => 0,
        Err(e) => handle_io_error(&e, "unlink"),
    }
}

//------------------------------------STAT SYSCALL------------------------------------
/*
 *   stat() fills size, times and the file type bits of st_mode.
 */
pub fn stat_syscall(path: &str, statbuf: &mut StatData) -> i32 {
    match fs::metadata(convpath(path)) {
        Ok(metadata) => {
            fill_statdata(&metadata, statbuf);
            0
        }
        Err(e) => handle_io_error(&e, "stat"),
    }
}

//------------------------------------FSTAT SYSCALL------------------------------------
pub fn fstat_syscall(virtual_fd: i32, statbuf: &mut StatData) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "fstat", "Bad File Descriptor"),
    };
    match entry.hostfile.metadata() {
        Ok(metadata) => {
            fill_statdata(&metadata, statbuf);
            0
        }
        Err(e) => handle_io_error(&e, "fstat"),
    }
}

//------------------------------------RENAME SYSCALL------------------------------------
/*
 *   rename() replaces newpath if it exists.  A missing source is ENOENT; every
 *   other failure is reported as EINVAL.
 */
pub fn rename_syscall(oldpath: &str, newpath: &str) -> i32 {
    match fs::rename(convpath(oldpath), convpath(newpath)) {
        Ok(()) => 0,
        Err(e) if Errno::from_io_error(&e) == Errno::ENOENT => {
            syscall_error(Errno::ENOENT, "rename", &e.to_string())
        }
        Err(e) => syscall_error(Errno::EINVAL, "rename", &e.to_string()),
    }
}

//------------------------------------FOPEN------------------------------------
/*
 *   fopen() returns a buffered stream.  The mode always gets the binary
 *   designator, and the file is opened sharing read, write and delete so that a
 *   reader can open a file some other handle is still writing.
 */
pub fn fopen_syscall(path: &str, mode: &str) -> Result<FileStream, Errno> {
    let mode = match binary_mode(mode) {
        Ok(mode) => mode,
        Err(e) => {
            syscall_error(e, "fopen", "invalid mode");
            return Err(e);
        }
    };
    FileStream::open(&convpath(path), &mode).map_err(|e| {
        handle_io_error(&e, "fopen");
        Errno::from_io_error(&e)
    })
}

//------------------------------------FCNTL SYSCALL------------------------------------
/*
 *   Only what the engine uses: F_GETFL, and whole-file advisory locks through
 *   F_SETLK.  F_SETLKW never waits either, contention is EAGAIN right away.
 */
pub fn fcntl_syscall(virtual_fd: i32, cmd: i32, lock: &mut FlockStruct) -> i32 {
    let entry = match fdtables::translate_virtual_fd(virtual_fd) {
        Ok(entry) => entry,
        Err(e) => return syscall_error(e, "fcntl", "Bad File Descriptor"),
    };
    match cmd {
        F_GETFL => entry.oflag,
        F_SETLK | F_SETLKW => match lock.l_type {
            F_UNLCK => unlock_syscall(virtual_fd),
            F_RDLCK => trylock_syscall(virtual_fd, false),
            F_WRLCK => trylock_syscall(virtual_fd, true),
            _ => syscall_error(Errno::EINVAL, "fcntl", "bad lock type"),
        },
        _ => syscall_error(Errno::EINVAL, "fcntl", "unsupported command"),
    }
}

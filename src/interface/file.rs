use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::interface::errnos::Errno;
use crate::interface::platform;

/// Validates an `fopen` mode and returns it with the binary designator
/// appended.  A text designator is dropped since transfers are always
/// byte-exact.
pub fn binary_mode(mode: &str) -> Result<String, Errno> {
    let mut chars = mode.chars();
    let base = match chars.next() {
        Some(c @ ('r' | 'w' | 'a')) => c,
        _ => return Err(Errno::EINVAL),
    };
    let mut update = false;
    for c in chars {
        match c {
            '+' if !update => update = true,
            'b' | 't' => {}
            _ => return Err(Errno::EINVAL),
        }
    }
    let mut out = String::with_capacity(3);
    out.push(base);
    if update {
        out.push('+');
    }
    out.push('b');
    Ok(out)
}

fn options_for(mode: &str) -> OpenOptions {
    let update = mode.contains('+');
    let mut opts = OpenOptions::new();
    match mode.chars().next() {
        Some('w') => {
            opts.write(true).create(true).truncate(true).read(update);
        }
        Some('a') => {
            opts.append(true).create(true).read(update);
        }
        _ => {
            opts.read(true).write(update);
        }
    }
    platform::share_all(&mut opts);
    opts
}

enum StreamInner {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
    Update(File),
}

/// Buffered stream returned by `fopen_syscall`.  Read-only streams buffer
/// reads, write-only streams buffer writes, update streams go straight to the
/// host handle.
pub struct FileStream {
    inner: StreamInner,
    mode: String,
}

impl FileStream {
    pub(crate) fn open(path: &Path, mode: &str) -> io::Result<FileStream> {
        let file = options_for(mode).open(path)?;
        let inner = if mode.contains('+') {
            StreamInner::Update(file)
        } else if mode.starts_with('r') {
            StreamInner::Reader(BufReader::new(file))
        } else {
            StreamInner::Writer(BufWriter::new(file))
        };
        Ok(FileStream {
            inner,
            mode: mode.to_string(),
        })
    }

    /// The mode the stream was opened with, binary designator included.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Flushes buffered data and then the host's caches.
    pub fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.file().sync_all()
    }

    fn file(&self) -> &File {
        match &self.inner {
            StreamInner::Reader(r) => r.get_ref(),
            StreamInner::Writer(w) => w.get_ref(),
            StreamInner::Update(f) => f,
        }
    }
}

fn wrong_direction() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "stream not open in this direction")
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            StreamInner::Reader(r) => r.read(buf),
            StreamInner::Update(f) => f.read(buf),
            StreamInner::Writer(_) => Err(wrong_direction()),
        }
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            StreamInner::Writer(w) => w.write(buf),
            StreamInner::Update(f) => f.write(buf),
            StreamInner::Reader(_) => Err(wrong_direction()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            StreamInner::Writer(w) => w.flush(),
            StreamInner::Update(f) => f.flush(),
            StreamInner::Reader(_) => Ok(()),
        }
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.inner {
            StreamInner::Reader(r) => r.seek(pos),
            StreamInner::Writer(w) => w.seek(pos),
            StreamInner::Update(f) => f.seek(pos),
        }
    }
}

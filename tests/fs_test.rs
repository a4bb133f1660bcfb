use hostposix::constants::*;
use hostposix::fdtables;
use hostposix::*;

use std::io::{Read, Write};
use std::thread;

/// Helper functions:
/// Scratch root under the working directory, addressed relative to it
fn scratch() -> (tempfile::TempDir, String) {
    let dir = tempfile::Builder::new()
        .prefix(".hpit")
        .tempdir_in(".")
        .unwrap();
    let root = format!("./{}", dir.path().file_name().unwrap().to_str().unwrap());
    (dir, root)
}

fn write_all(fd: i32, data: &[u8]) {
    assert_eq!(write_syscall(fd, data), data.len() as i32);
}

/// Walks through what a log-structured store does on open, write, compaction
/// and teardown.
#[test]
fn test_store_lifecycle() {
    hostposix_init(1);
    let (_dir, root) = scratch();
    let db = format!("{}/db/main", root);

    assert_eq!(mkdir_syscall(&db, S_IRWXA), 0);

    // only one process owns the database
    let lockfd = open_syscall(&format!("{}/LOCK", db), O_CREAT | O_RDWR, S_IRWXA);
    assert!(lockfd >= 0);
    assert_eq!(trylock_syscall(lockfd, true), 0);
    let other = open_syscall(&format!("{}/LOCK", db), O_RDWR, 0);
    assert_eq!(trylock_syscall(other, true), -(Errno::EAGAIN as i32));
    assert_eq!(close_syscall(other), 0);

    // append records to a log and read them back by offset
    let logpath = format!("{}/000001.log", db);
    let logfd = open_syscall(&logpath, O_CREAT | O_RDWR | O_TRUNC, S_IRWXA);
    assert!(logfd >= 0);
    let mut offsets = Vec::new();
    let mut pos = 0i64;
    for i in 0..50 {
        let record = format!("record-{:03}\n", i);
        offsets.push((pos, record.clone()));
        write_all(logfd, record.as_bytes());
        pos += record.len() as i64;
    }
    assert_eq!(fsync_syscall(logfd), 0);
    for (offset, record) in offsets.iter().rev() {
        let mut buf = vec![0u8; record.len()];
        assert_eq!(pread_syscall(logfd, &mut buf, *offset), record.len() as i32);
        assert_eq!(buf, record.as_bytes());
    }
    assert_eq!(lseek_syscall(logfd, 0, SEEK_CUR), pos);

    // drop a torn tail
    assert_eq!(ftruncate_syscall(logfd, pos - 3), 0);
    let mut statdata = StatData::default();
    assert_eq!(fstat_syscall(logfd, &mut statdata), 0);
    assert_eq!(statdata.st_size, (pos - 3) as u64);
    assert_eq!(close_syscall(logfd), 0);

    // CURRENT is swapped in with a rename
    let tmp = format!("{}/CURRENT.tmp", db);
    let current = format!("{}/CURRENT", db);
    let mut stream = fopen_syscall(&current, "w").unwrap();
    stream.write_all(b"MANIFEST-000001\n").unwrap();
    stream.sync().unwrap();
    drop(stream);
    let mut stream = fopen_syscall(&tmp, "w").unwrap();
    stream.write_all(b"MANIFEST-000002\n").unwrap();
    stream.sync().unwrap();
    drop(stream);
    assert_eq!(rename_syscall(&tmp, &current), 0);
    let mut contents = String::new();
    fopen_syscall(&current, "r")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "MANIFEST-000002\n");

    // make the rename durable
    let dirfd = open_syscall(&db, O_RDONLY, 0);
    assert!(dirfd >= 0);
    assert_eq!(fsync_syscall(dirfd), 0);
    assert_eq!(close_syscall(dirfd), 0);

    assert_eq!(unlock_syscall(lockfd), 0);
    assert_eq!(close_syscall(lockfd), 0);

    // destroy
    assert_eq!(rmdir_syscall(&format!("{}/db", root)), 0);
    assert_eq!(access_syscall(&db, F_OK), -(Errno::ENOENT as i32));
}

/// Distinct descriptors used from distinct threads don't get in each other's way
#[test]
fn test_threads_on_distinct_descriptors() {
    let (_dir, root) = scratch();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let path = format!("{}/thread-{}", root, t);
            thread::spawn(move || {
                let fd = open_syscall(&path, O_CREAT | O_RDWR, S_IRWXA);
                assert!(fd >= 0);
                let payload = vec![t as u8; 4096];
                for _ in 0..16 {
                    write_all(fd, &payload);
                }
                let mut buf = vec![0u8; 4096];
                for block in 0..16 {
                    assert_eq!(pread_syscall(fd, &mut buf, block * 4096), 4096);
                    assert!(buf.iter().all(|&b| b == t as u8));
                }
                assert_eq!(close_syscall(fd), 0);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut statdata = StatData::default();
    for t in 0..8 {
        assert_eq!(stat_syscall(&format!("{}/thread-{}", root, t), &mut statdata), 0);
        assert_eq!(statdata.st_size, 16 * 4096);
    }
    assert!(fdtables::open_count() < FD_PER_PROCESS_MAX as usize);
}

#[test]
fn test_path_translation() {
    use hostposix::safeposix::filesystem::{normpath, normpath_full};

    assert_eq!(normpath("\\db\\main\\LOG"), "./db/main/LOG");
    assert_eq!(normpath(&normpath("\\db\\main\\LOG")), "./db/main/LOG");
    assert_eq!(normpath_full("/db/main/LOG"), "..\\db\\main\\LOG");
}

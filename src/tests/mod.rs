#![allow(dead_code)] //suppress warning for these functions not being used in targets other than the
                     // tests

mod sys_tests;

pub mod setup {
    use lazy_static::lazy_static;
    use parking_lot::{Mutex, MutexGuard};

    use crate::fdtables;

    // I'm having a global testing mutex because otherwise the tests will
    // run concurrently.  This messes up the tests that count or number
    // descriptors, and the lock tests.
    lazy_static! {
        // This has a junk value (a bool).  Could be anything...
        #[derive(Debug)]
        static ref TESTMUTEX: Mutex<bool> = Mutex::new(true);
    }

    /// Serializes the test and hands it an empty descriptor table.
    pub fn lock_and_init() -> MutexGuard<'static, bool> {
        let thelock = TESTMUTEX.lock();
        fdtables::refresh();
        thelock
    }

    /// Scratch directory under the working directory.  A rooted path would be
    /// taken relative to the working directory anyway, so the tests address it
    /// as "./.hpXXXX" through `root` and `join`.
    pub fn scratch_dir() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix(".hp")
            .tempdir_in(".")
            .unwrap()
    }

    pub fn root(dir: &tempfile::TempDir) -> String {
        format!("./{}", dir.path().file_name().unwrap().to_str().unwrap())
    }

    pub fn join(dir: &tempfile::TempDir, name: &str) -> String {
        format!("{}/{}", root(dir), name)
    }
}

#[cfg(test)]
pub mod sys_tests {

    use super::super::setup;
    use crate::constants::*;
    use crate::interface::{Errno, FlockStruct, TimeVal, TmStruct};
    use crate::safeposix::syscalls::*;
    use crate::shim_snprintf;

    use std::time::{Duration, Instant};

    #[test]
    pub fn ut_hostposix_sys_identity() {
        let _thelock = setup::lock_and_init();
        assert_eq!(geteuid_syscall(), DEFAULT_UID as i32);
        let pagesize = getpagesize_syscall();
        assert!(pagesize > 0);
        assert_eq!(pagesize & (pagesize - 1), 0);
    }

    #[test]
    pub fn ut_hostposix_sys_gettimeofday() {
        let _thelock = setup::lock_and_init();
        let mut tv = TimeVal::default();
        assert_eq!(gettimeofday_syscall(&mut tv), 0);
        assert!(tv.tv_sec > 1_600_000_000);
        assert!(tv.tv_usec >= 0 && tv.tv_usec < 1_000_000);
        // millisecond tick, so whole milliseconds
        assert_eq!(tv.tv_usec % 1000, 0);
    }

    #[test]
    pub fn ut_hostposix_sys_localtime_r() {
        let _thelock = setup::lock_and_init();
        let mut tm = TmStruct::default();
        // 2001-09-09 01:46:40 UTC, September 8th or 9th in any zone
        assert_eq!(localtime_r_syscall(1_000_000_000, &mut tm), 0);
        assert_eq!(tm.tm_year, 101);
        assert_eq!(tm.tm_mon, 8);
        assert!(tm.tm_mday == 8 || tm.tm_mday == 9);
    }

    #[test]
    pub fn ut_hostposix_sys_short_sleep_spins() {
        let _thelock = setup::lock_and_init();
        let start = Instant::now();
        assert_eq!(precise_sleep(5_000), SleepStrategy::BusyWait);
        assert!(start.elapsed() >= Duration::from_micros(5_000));
    }

    #[test]
    pub fn ut_hostposix_sys_long_sleep_is_coarse() {
        let _thelock = setup::lock_and_init();
        let start = Instant::now();
        assert_eq!(precise_sleep(50_000), SleepStrategy::Coarse);
        assert!(start.elapsed() >= Duration::from_micros(50_000));

        // threshold itself goes to the scheduler
        let start = Instant::now();
        assert_eq!(precise_sleep(SLEEP_BUSY_WAIT_THRESHOLD_US), SleepStrategy::Coarse);
        assert!(start.elapsed() >= Duration::from_micros(SLEEP_BUSY_WAIT_THRESHOLD_US));
    }

    #[test]
    pub fn ut_hostposix_sys_coarse_sleep_rounds_up() {
        use crate::safeposix::syscalls::sys_calls::coarse_sleep_millis;

        let _thelock = setup::lock_and_init();
        assert_eq!(coarse_sleep_millis(10_000), 10);
        assert_eq!(coarse_sleep_millis(10_001), 11);
        assert_eq!(
            coarse_sleep_millis(SLEEP_BUSY_WAIT_THRESHOLD_US),
            SLEEP_BUSY_WAIT_THRESHOLD_US / 1_000
        );
        // no wraparound at the top of the range
        assert_eq!(coarse_sleep_millis(u64::MAX), u64::MAX / 1_000 + 1);
    }

    #[test]
    pub fn ut_hostposix_sys_usleep() {
        let _thelock = setup::lock_and_init();
        assert_eq!(usleep_syscall(0), 0);
        let start = Instant::now();
        assert_eq!(usleep_syscall(12_345), 0);
        assert!(start.elapsed() >= Duration::from_micros(12_345));
    }

    #[test]
    pub fn ut_hostposix_sys_lock_contention() {
        let _thelock = setup::lock_and_init();
        let scratch = setup::scratch_dir();
        let path = setup::join(&scratch, "LOCK");

        let fd1 = open_syscall(&path, O_CREAT | O_RDWR, S_IRWXA);
        let fd2 = open_syscall(&path, O_RDWR, 0);
        assert!(fd1 >= 0 && fd2 >= 0);

        assert_eq!(trylock_syscall(fd1, true), 0);
        let start = Instant::now();
        assert_eq!(trylock_syscall(fd2, true), -(Errno::EAGAIN as i32));
        assert_eq!(trylock_syscall(fd2, false), -(Errno::EAGAIN as i32));
        // fails fast rather than waiting on the holder
        assert!(start.elapsed() < Duration::from_secs(1));

        assert_eq!(unlock_syscall(fd1), 0);
        assert_eq!(trylock_syscall(fd2, true), 0);
        assert_eq!(unlock_syscall(fd2), 0);

        // shared locks coexist
        assert_eq!(trylock_syscall(fd1, false), 0);
        assert_eq!(trylock_syscall(fd2, false), 0);
        assert_eq!(trylock_syscall(fd2, true), -(Errno::EAGAIN as i32));

        assert_eq!(close_syscall(fd1), 0);
        assert_eq!(close_syscall(fd2), 0);
        assert_eq!(trylock_syscall(fd1, true), -(Errno::EBADF as i32));
    }

    #[test]
    pub fn ut_hostposix_sys_fcntl_locks() {
        let _thelock = setup::lock_and_init();
        let scratch = setup::scratch_dir();
        let path = setup::join(&scratch, "LOCK");

        let fd1 = open_syscall(&path, O_CREAT | O_RDWR, S_IRWXA);
        let fd2 = open_syscall(&path, O_RDWR, 0);

        let mut lock = FlockStruct {
            l_type: F_WRLCK,
            ..Default::default()
        };
        assert_eq!(fcntl_syscall(fd1, F_SETLK, &mut lock), 0);
        // F_SETLKW doesn't wait either
        assert_eq!(fcntl_syscall(fd2, F_SETLKW, &mut lock), -(Errno::EAGAIN as i32));

        lock.l_type = F_UNLCK;
        assert_eq!(fcntl_syscall(fd1, F_SETLK, &mut lock), 0);
        lock.l_type = F_RDLCK;
        assert_eq!(fcntl_syscall(fd2, F_SETLK, &mut lock), 0);

        lock.l_type = 42;
        assert_eq!(fcntl_syscall(fd2, F_SETLK, &mut lock), -(Errno::EINVAL as i32));
        assert_eq!(fcntl_syscall(fd2, 1234, &mut lock), -(Errno::EINVAL as i32));

        assert_eq!(close_syscall(fd1), 0);
        assert_eq!(close_syscall(fd2), 0);
    }

    #[test]
    pub fn ut_hostposix_sys_snprintf() {
        let mut buf = [0xaau8; 8];
        let n = shim_snprintf!(&mut buf, "{}-{}", "hello", 12345);
        assert_eq!(n, 11);
        assert_eq!(&buf[..7], b"hello-1");
        assert_eq!(buf[7], 0);

        // exact fit leaves room for the terminator only
        let mut buf = [0xaau8; 6];
        assert_eq!(shim_snprintf!(&mut buf, "{}", "abcde"), 5);
        assert_eq!(&buf, b"abcde\0");

        // nothing written into an empty buffer, length still reported
        let mut empty: [u8; 0] = [];
        assert_eq!(shim_snprintf!(&mut empty, "{:08}", 7), 8);

        let mut buf = [0xaau8; 4];
        assert_eq!(shim_snprintf!(&mut buf, ""), 0);
        assert_eq!(buf[0], 0);
        assert_eq!(buf[1], 0xaa);
    }

    #[test]
    pub fn ut_hostposix_sys_errno_status() {
        assert_eq!(Errno::ENOENT.as_status(), -2);
        assert_eq!(Errno::from_discriminant(39), Ok(Errno::ENOTEMPTY));
        assert!(Errno::from_discriminant(-1).is_err());
        let e = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(Errno::from_io_error(&e), Errno::ENOENT);
        assert_eq!(
            crate::interface::syscall_error(Errno::EIO, "test", "message"),
            -(Errno::EIO as i32)
        );
    }
}

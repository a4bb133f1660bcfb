#![allow(dead_code)]

//redefining the StatData struct in this file so that we maintain flow of program
//derive eq attributes for testing whether the structs equal other statdata structs from stat/fstat
#[derive(Eq, PartialEq, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct StatData {
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_size: u64,
    // (seconds, nanoseconds) since the epoch
    pub st_atim: (u64, u64),
    pub st_mtim: (u64, u64),
}

impl StatData {
    pub fn is_dir(&self) -> bool {
        self.st_mode & crate::constants::S_IFMT == crate::constants::S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.st_mode & crate::constants::S_IFMT == crate::constants::S_IFREG
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct TimeVal {
    pub tv_sec: i64,
    pub tv_usec: i64,
}

/// Broken-down calendar time, field for field the C `struct tm`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct TmStruct {
    pub tm_sec: i32,
    pub tm_min: i32,
    pub tm_hour: i32,
    pub tm_mday: i32,
    pub tm_mon: i32,
    pub tm_year: i32,
    pub tm_wday: i32,
    pub tm_yday: i32,
    pub tm_isdst: i32,
}

// Only l_type is looked at: locks always cover the whole file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct FlockStruct {
    pub l_type: i16,
    pub l_whence: i16,
    pub l_start: i64,
    pub l_len: i64,
    pub l_pid: i32,
}

#![allow(dead_code)]
#![allow(unused_variables)]

// These are the values the storage engine passes in, independent of what the
// host uses underneath.  They follow the Linux ABI.

// ===== Path Conventions =====
pub const PATH_SEPARATOR: char = '/'; // Separator the engine expects
pub const NATIVE_SEPARATOR: char = '\\'; // Separator of native absolute paths
pub const CURRENT_DIR_MARKER: &str = "."; // Keeps a rooted path off the volume root
pub const PARENT_DIR_MARKER: &str = "..";
pub const WILDCARD_MARKER: char = '*'; // Trailing "starts with" marker for rmdir

// ===== File Access Permission Flags =====
pub const F_OK: i32 = 0; // Test for existence
pub const X_OK: i32 = 1; // Test for execute permission
pub const W_OK: i32 = 2; // Test for write permission
pub const R_OK: i32 = 4; // Test for read permission

// ===== File Access Modes =====
// Source: include/uapi/asm-generic/fcntl.h
pub const O_RDONLY: i32 = 0o0; // Open read-only
pub const O_WRONLY: i32 = 0o1; // Open write-only
pub const O_RDWR: i32 = 0o2; // Open read-write
pub const O_RDWRFLAGS: i32 = 0o3; // Mask for access modes

// ===== File Creation and Status Flags =====
pub const O_CREAT: i32 = 0o100; // Create file if it doesn't exist
pub const O_EXCL: i32 = 0o200; // Error if O_CREAT and file exists
pub const O_TRUNC: i32 = 0o1000; // Truncate file to zero length
pub const O_APPEND: i32 = 0o2000; // Append mode - writes always at end
pub const O_CLOEXEC: i32 = 0o2000000; // Close on exec
// Binary transfer mode.  Always recorded on open, every handle is byte-exact.
pub const O_BINARY: i32 = 0x8000;

// ===== File Permissions =====
// Source: include/uapi/linux/stat.h
pub const S_IRWXA: u32 = 0o777; // All permissions for all users
pub const S_IRWXU: u32 = 0o700; // User read, write, execute
pub const S_IRUSR: u32 = 0o400; // User read
pub const S_IWUSR: u32 = 0o200; // User write
pub const S_IXUSR: u32 = 0o100; // User execute

// ===== File Types =====
pub const S_IFMT: u32 = 0o170000; // Mask for file type
pub const S_IFDIR: u32 = 0o040000; // Directory
pub const S_IFREG: u32 = 0o100000; // Regular file
pub const S_IFLNK: u32 = 0o120000; // Symbolic link

//Commands for FCNTL
// Source: include/linux/fcntl.h
pub const F_GETFL: i32 = 3;
pub const F_SETLK: i32 = 6;
pub const F_SETLKW: i32 = 7;

// Lock types carried in FlockStruct::l_type
pub const F_RDLCK: i16 = 0;
pub const F_WRLCK: i16 = 1;
pub const F_UNLCK: i16 = 2;

// ===== Seek Whence =====
pub const SEEK_SET: i32 = 0; // Seek from beginning of file
pub const SEEK_CUR: i32 = 1; // Seek from current position
pub const SEEK_END: i32 = 2; // Seek from end of file

// ===== Descriptor Table =====
pub const FD_PER_PROCESS_MAX: u64 = 1024;
// 0, 1 and 2 stay with the process' standard streams
pub const FD_START: u64 = 3;

// ===== Truncate =====
// Whether extending a file through the host call already reads back as zeros.
// ftruncate(2) guarantees it; SetEndOfFile leaves the new region undefined.
#[cfg(unix)]
pub const HOST_TRUNCATE_ZERO_FILLS: bool = true;
#[cfg(not(unix))]
pub const HOST_TRUNCATE_ZERO_FILLS: bool = false;
pub const ZERO_FILL_CHUNK: usize = 64 * 1024;

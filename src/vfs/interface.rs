//! VFS interface definitions

use crate::vfs::error::VfsResult;
use std::ffi::OsString;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Metadata captured from a stat/fstat call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Full st_mode (type and permission bits)
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u64,
    /// Size in bytes
    pub size: u64,
    /// Preferred I/O block size
    pub blksize: u32,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

impl FileStat {
    /// Whether the mode describes a regular file
    pub fn is_regular_file(&self) -> bool {
        self.mode & (libc::S_IFMT as u32) == libc::S_IFREG as u32
    }

    /// Permission bits (mode & 0o7777)
    pub fn permissions(&self) -> u16 {
        (self.mode & 0o7777) as u16
    }
}

/// Convert a (seconds, nanoseconds) pair from a stat buffer into SystemTime
pub(crate) fn timespec_to_system_time(secs: i64, nsecs: i64) -> SystemTime {
    let nsecs = nsecs.clamp(0, 999_999_999) as u32;
    if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs as u64, nsecs)
    } else {
        UNIX_EPOCH - Duration::new(secs.unsigned_abs(), 0) + Duration::new(0, nsecs)
    }
}

/// File handle trait for VFS operations
/// This trait represents a read-only handle to an open file. The handle owns its
/// descriptor and releases it when dropped.
pub trait FileHandle: Send + Sync {
    /// Read from the file at a specific offset without touching any shared cursor
    fn pread(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize>;

    /// Metadata of the open file
    fn stat(&self) -> VfsResult<FileStat>;
}

/// VFS interface trait
/// This trait defines the host operations needed to build and expose a virtual file
pub trait VfsInterface: Send + Sync {
    /// Query metadata of a path
    ///
    /// # Returns
    /// * `Ok(FileStat)` if the path exists
    /// * `Err(VfsError)` if an error occurred
    fn stat(&self, path: &Path) -> VfsResult<FileStat>;

    /// Open an existing file read-only and return a handle to it
    ///
    /// # Arguments
    /// * `path` - The path to the file to open
    ///
    /// # Returns
    /// * `Ok(Box<dyn FileHandle>)` if the file was opened successfully
    /// * `Err(VfsError)` if an error occurred
    fn open_read(&self, path: &Path) -> VfsResult<Box<dyn FileHandle>>;

    /// List the entry names of a directory, excluding `.` and `..`
    fn read_dir(&self, path: &Path) -> VfsResult<Vec<OsString>>;

    /// Create a new empty file; fails if the path already exists
    fn create_file(&self, path: &Path) -> VfsResult<()>;

    /// Remove an existing file
    fn remove_file(&self, path: &Path) -> VfsResult<()>;
}

//! A single member file of the virtual file

use crate::vfs::{FileHandle, FileStat, VfsResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// One underlying file contributing a contiguous byte range
///
/// The size is captured once when the member is added and is never checked
/// against the live file again.
pub struct MemberFile {
    handle: Box<dyn FileHandle>,
    path: PathBuf,
    size: u64,
}

impl MemberFile {
    pub fn new(handle: Box<dyn FileHandle>, path: PathBuf, size: u64) -> Self {
        Self { handle, path, size }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared size in bytes
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Positional read against the member's handle
    #[inline]
    pub fn pread(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        self.handle.pread(buf, offset)
    }

    /// Live metadata of the open handle
    pub fn stat(&self) -> VfsResult<FileStat> {
        self.handle.stat()
    }
}

impl fmt::Debug for MemberFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberFile")
            .field("path", &self.path)
            .field("size", &self.size)
            .finish()
    }
}

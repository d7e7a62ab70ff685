//! In-memory file handles for unit tests

use crate::table::{FileTable, MemberFile};
use crate::vfs::{FileHandle, FileStat, VfsError, VfsResult};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

pub(crate) fn mem_stat(size: u64) -> FileStat {
    FileStat {
        mode: libc::S_IFREG as u32 | 0o640,
        uid: 1000,
        gid: 100,
        nlink: 1,
        size,
        blksize: 4096,
        atime: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        mtime: UNIX_EPOCH + Duration::from_secs(1_600_000_000),
        ctime: UNIX_EPOCH + Duration::from_secs(1_650_000_000),
    }
}

/// Handle over a byte vector; `chunk` caps the bytes returned per pread
pub(crate) struct MemHandle {
    data: Vec<u8>,
    chunk: usize,
    reads: Arc<AtomicUsize>,
}

impl MemHandle {
    pub(crate) fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            chunk: usize::MAX,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn chunked(data: &[u8], chunk: usize) -> Self {
        Self {
            chunk,
            ..Self::new(data)
        }
    }

    /// Counter of pread calls, shared with the caller
    pub(crate) fn counted(data: &[u8], reads: Arc<AtomicUsize>) -> Self {
        Self {
            reads,
            ..Self::new(data)
        }
    }
}

impl FileHandle for MemHandle {
    fn pread(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let start = (offset as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start).min(self.chunk);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn stat(&self) -> VfsResult<FileStat> {
        Ok(mem_stat(self.data.len() as u64))
    }
}

/// Handle whose reads always fail with EIO
pub(crate) struct FailingHandle;

impl FileHandle for FailingHandle {
    fn pread(&self, _buf: &mut [u8], _offset: u64) -> VfsResult<usize> {
        Err(VfsError::SystemError(libc::EIO, "pread failed".to_string()))
    }

    fn stat(&self) -> VfsResult<FileStat> {
        Err(VfsError::SystemError(libc::EIO, "fstat failed".to_string()))
    }
}

pub(crate) fn member(name: &str, handle: Box<dyn FileHandle>, size: u64) -> MemberFile {
    MemberFile::new(handle, PathBuf::from(name), size)
}

/// Table with one in-memory member per part, named `part0`, `part1`, ...
pub(crate) fn table_of(parts: &[&[u8]]) -> FileTable {
    let mut table = FileTable::new();
    for (i, part) in parts.iter().enumerate() {
        let handle = Box::new(MemHandle::new(part));
        table
            .push(member(&format!("part{}", i), handle, part.len() as u64))
            .unwrap();
    }
    table
}

pub(crate) fn push_member(table: &mut FileTable, member: MemberFile) {
    table.push(member).unwrap();
}

pub(crate) fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.iter().flat_map(|part| part.iter().copied()).collect()
}

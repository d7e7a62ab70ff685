//! Local file system implementation using libc system calls

use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::interface::{FileHandle, FileStat, VfsInterface, timespec_to_system_time};
use libc::{self, c_int, c_void, mode_t, off_t, size_t};
use std::ffi::{CString, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

fn last_errno() -> c_int {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO)
}

fn path_to_cstring(path: &Path) -> VfsResult<CString> {
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

fn map_path_errno(errno: c_int, op: &str, path: &Path) -> VfsError {
    match errno {
        libc::ENOENT => VfsError::NotFound(path.display().to_string()),
        libc::EACCES | libc::EPERM => VfsError::PermissionDenied(path.display().to_string()),
        _ => VfsError::SystemError(errno, format!("{} failed for path '{}'", op, path.display())),
    }
}

fn stat_from_raw(st: &libc::stat) -> FileStat {
    FileStat {
        mode: st.st_mode as u32,
        uid: st.st_uid as u32,
        gid: st.st_gid as u32,
        nlink: st.st_nlink as u64,
        size: st.st_size.max(0) as u64,
        blksize: st.st_blksize as u32,
        atime: timespec_to_system_time(st.st_atime as i64, st.st_atime_nsec as i64),
        mtime: timespec_to_system_time(st.st_mtime as i64, st.st_mtime_nsec as i64),
        ctime: timespec_to_system_time(st.st_ctime as i64, st.st_ctime_nsec as i64),
    }
}

/// Local file handle implementation
pub struct LocalFileHandle {
    fd: c_int,
}

impl LocalFileHandle {
    /// Create a new LocalFileHandle from a file descriptor
    pub fn new(fd: c_int) -> Self {
        LocalFileHandle { fd }
    }
}

impl FileHandle for LocalFileHandle {
    fn pread(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        let offset = off_t::try_from(offset)
            .map_err(|_| VfsError::InvalidArgument(format!("offset {} out of range", offset)))?;

        loop {
            let result = unsafe {
                libc::pread(
                    self.fd,
                    buf.as_mut_ptr() as *mut c_void,
                    buf.len() as size_t,
                    offset,
                )
            };

            if result >= 0 {
                return Ok(result as usize);
            }
            let errno = last_errno();
            if errno != libc::EINTR {
                return Err(VfsError::SystemError(errno, "pread failed".to_string()));
            }
        }
    }

    fn stat(&self) -> VfsResult<FileStat> {
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::fstat(self.fd, &mut st) };

        if result < 0 {
            Err(VfsError::SystemError(last_errno(), "fstat failed".to_string()))
        } else {
            Ok(stat_from_raw(&st))
        }
    }
}

impl Drop for LocalFileHandle {
    fn drop(&mut self) {
        if self.fd >= 0 {
            // Errors from close on a read-only descriptor carry no data loss
            let _ = unsafe { libc::close(self.fd) };
            self.fd = -1;
        }
    }
}

/// Local file system implementation
#[derive(Debug, Default)]
pub struct LocalFs {
    // LocalFs doesn't need any state
}

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        LocalFs {}
    }

    /// Open a file with the given flags and mode
    fn open_file_internal(&self, path: &Path, flags: c_int, mode: mode_t) -> VfsResult<c_int> {
        // Create CString in scope so it lives during the system call
        let c_path = path_to_cstring(path)?;

        let result =
            unsafe { libc::open(c_path.as_ptr(), flags | libc::O_CLOEXEC, mode as libc::c_uint) };

        if result < 0 {
            let errno = last_errno();
            if errno == libc::EEXIST {
                return Err(VfsError::SystemError(
                    errno,
                    format!("open failed: '{}' already exists", path.display()),
                ));
            }
            Err(map_path_errno(errno, "open", path))
        } else {
            Ok(result)
        }
    }
}

impl VfsInterface for LocalFs {
    fn stat(&self, path: &Path) -> VfsResult<FileStat> {
        let c_path = path_to_cstring(path)?;
        let mut st: libc::stat = unsafe { std::mem::zeroed() };

        let result = unsafe { libc::stat(c_path.as_ptr(), &mut st) };

        if result < 0 {
            Err(map_path_errno(last_errno(), "stat", path))
        } else {
            Ok(stat_from_raw(&st))
        }
    }

    fn open_read(&self, path: &Path) -> VfsResult<Box<dyn FileHandle>> {
        let fd = self.open_file_internal(path, libc::O_RDONLY, 0)?;
        Ok(Box::new(LocalFileHandle::new(fd)))
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn create_file(&self, path: &Path) -> VfsResult<()> {
        let flags = libc::O_CREAT | libc::O_EXCL | libc::O_WRONLY;
        let fd = self.open_file_internal(path, flags, 0o644)?;
        drop(LocalFileHandle::new(fd));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> VfsResult<()> {
        let c_path = path_to_cstring(path)?;

        let result = unsafe { libc::unlink(c_path.as_ptr()) };

        if result < 0 {
            Err(map_path_errno(last_errno(), "unlink", path))
        } else {
            Ok(())
        }
    }
}

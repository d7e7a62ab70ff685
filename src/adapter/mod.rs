//! Single-file filesystem adapter
//!
//! `ConcatFs` is what a filesystem dispatch layer talks to. Exactly one path, the
//! root `/`, names the virtual file; attribute and read requests for it are
//! answered from the FileTable, every other path is reported as not found.

#[cfg(feature = "fuse")]
pub mod fuse;

use crate::mount::MountPoint;
use crate::reader::VirtualFileReader;
use crate::table::FileTable;
use crate::types::VIRTUAL_PATH;
use crate::vfs::{FileStat, VfsError, VfsResult};
use parking_lot::Mutex;

/// Adapter owning the member table and, when mounted, the mount point
pub struct ConcatFs {
    table: FileTable,
    mount_point: Mutex<Option<MountPoint>>,
}

impl ConcatFs {
    /// Adapter without a mount point (nothing to clean up on unmount)
    pub fn new(table: FileTable) -> Self {
        Self {
            table,
            mount_point: Mutex::new(None),
        }
    }

    pub fn with_mount_point(table: FileTable, mount_point: MountPoint) -> Self {
        Self {
            table,
            mount_point: Mutex::new(Some(mount_point)),
        }
    }

    pub fn table(&self) -> &FileTable {
        &self.table
    }

    fn check_path(path: &str) -> VfsResult<()> {
        if path == VIRTUAL_PATH {
            Ok(())
        } else {
            Err(VfsError::NotFound(path.to_string()))
        }
    }

    /// Attributes of the virtual file
    ///
    /// Mode, ownership and timestamps come from the first member; the size is the
    /// size of the whole virtual file.
    pub fn get_attributes(&self, path: &str) -> VfsResult<FileStat> {
        Self::check_path(path)?;
        let first = self
            .table
            .member_at(0)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?;

        let mut stat = first.stat()?;
        stat.size = self.table.total_size();
        Ok(stat)
    }

    /// Read from the virtual file
    pub fn read(&self, path: &str, offset: u64, length: usize) -> VfsResult<Vec<u8>> {
        Self::check_path(path)?;
        VirtualFileReader::new(&self.table).read(offset, length)
    }

    /// Remove the mount point placeholder
    ///
    /// Member files are never touched. Only a placeholder created by this process
    /// can be removed; otherwise the request is refused.
    pub fn unlink(&self, path: &str) -> VfsResult<()> {
        Self::check_path(path)?;
        let mut guard = self.mount_point.lock();
        match guard.as_mut() {
            Some(mount_point) if mount_point.owns_placeholder() => {
                mount_point.remove_placeholder()?;
                Ok(())
            }
            _ => Err(VfsError::PermissionDenied(path.to_string())),
        }
    }

    /// Tear down after the mount is gone: drop the placeholder if we created it
    pub fn on_unmount(&self) {
        let Some(mut mount_point) = self.mount_point.lock().take() else {
            return;
        };
        if let Err(err) = mount_point.remove_placeholder() {
            log::warn!(
                "can't remove placeholder {}: {}",
                mount_point.path().display(),
                err
            );
        }
    }
}

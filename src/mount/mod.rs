//! Mount point handling
//!
//! The virtual file is mounted on a regular file. When the requested path does not
//! exist an empty placeholder is created for the lifetime of the mount; it is
//! removed exactly once, either explicitly or when the MountPoint is dropped.

pub mod error;
pub use error::{StartupError, StartupResult};

use crate::vfs::{LocalFs, VfsError, VfsInterface, VfsResult};
use std::path::{Path, PathBuf};

/// Validated mount point, owning the placeholder file if this process created it
pub struct MountPoint {
    fs: Box<dyn VfsInterface>,
    path: PathBuf,
    placeholder: bool,
}

impl MountPoint {
    /// Validate `path` on the local file system, creating a placeholder if needed
    pub fn prepare(path: impl AsRef<Path>) -> StartupResult<Self> {
        Self::prepare_with(Box::new(LocalFs::new()), path)
    }

    /// Validate `path` through an arbitrary VFS implementation
    pub fn prepare_with(fs: Box<dyn VfsInterface>, path: impl AsRef<Path>) -> StartupResult<Self> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str().is_empty() {
            return Err(StartupError::InvalidMountPoint {
                path,
                source: VfsError::InvalidArgument("empty mount point".to_string()),
            });
        }

        match fs.stat(&path) {
            Ok(stat) if stat.is_regular_file() => Ok(Self {
                fs,
                path,
                placeholder: false,
            }),
            Ok(_) => Err(StartupError::MountPointNotFile(path)),
            Err(VfsError::NotFound(_)) => {
                if let Err(source) = fs.create_file(&path) {
                    return Err(StartupError::Placeholder { path, source });
                }
                log::info!("created mount point placeholder {}", path.display());
                Ok(Self {
                    fs,
                    path,
                    placeholder: true,
                })
            }
            Err(source) => Err(StartupError::InvalidMountPoint { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a placeholder created by this process is still present
    pub fn owns_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Remove the placeholder if this process created it and it is still present
    ///
    /// Returns whether a file was removed. Ownership is given up even when removal
    /// fails, so the placeholder is never removed twice.
    pub fn remove_placeholder(&mut self) -> VfsResult<bool> {
        if !std::mem::take(&mut self.placeholder) {
            return Ok(false);
        }
        self.fs.remove_file(&self.path)?;
        log::info!("removed mount point placeholder {}", self.path.display());
        Ok(true)
    }
}

impl Drop for MountPoint {
    fn drop(&mut self) {
        if let Err(err) = self.remove_placeholder() {
            log::warn!("can't remove placeholder {}: {}", self.path.display(), err);
        }
    }
}

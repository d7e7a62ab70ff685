//! Startup error definitions

use crate::table::TableError;
use crate::vfs::VfsError;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Startup error types
///
/// Every variant is fatal: the process releases what it acquired and exits with a
/// non-zero status before mounting.
#[derive(Debug)]
pub enum StartupError {
    /// Command line combination that cannot be acted on
    InvalidArguments(String),
    /// Mount point path cannot be used
    InvalidMountPoint { path: PathBuf, source: VfsError },
    /// Mount point exists but is not a regular file
    MountPointNotFile(PathBuf),
    /// Mount point placeholder could not be created
    Placeholder { path: PathBuf, source: VfsError },
    /// Member table could not be built
    Table(TableError),
    /// Summary could not be serialized
    Serialize(serde_json::Error),
    /// The mount itself failed
    Mount(std::io::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
            StartupError::InvalidMountPoint { path, source } => {
                write!(f, "Can't mount on {}: {}", path.display(), source)
            }
            StartupError::MountPointNotFile(path) => {
                write!(f, "{} is not a file", path.display())
            }
            StartupError::Placeholder { path, source } => {
                write!(f, "Can't create mount point {}: {}", path.display(), source)
            }
            StartupError::Table(err) => write!(f, "{}", err),
            StartupError::Serialize(err) => write!(f, "Can't serialize table: {}", err),
            StartupError::Mount(err) => write!(f, "Mount failed: {}", err),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StartupError::InvalidMountPoint { source, .. } => Some(source),
            StartupError::Placeholder { source, .. } => Some(source),
            StartupError::Table(err) => Some(err),
            StartupError::Serialize(err) => Some(err),
            StartupError::Mount(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TableError> for StartupError {
    fn from(err: TableError) -> Self {
        StartupError::Table(err)
    }
}

impl From<serde_json::Error> for StartupError {
    fn from(err: serde_json::Error) -> Self {
        StartupError::Serialize(err)
    }
}

/// Result type for startup operations
pub type StartupResult<T> = Result<T, StartupError>;

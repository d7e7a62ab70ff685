//! File table error definitions

use crate::vfs::VfsError;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// File table error types
///
/// Errors that abort a whole construction strategy. Failures of a single
/// candidate file are not represented here; they are logged and skipped.
#[derive(Debug)]
pub enum TableError {
    /// The manifest could not be opened or read
    Manifest { path: PathBuf, source: std::io::Error },
    /// The directory of a glob pattern could not be listed
    GlobDirectory { dir: PathBuf, source: VfsError },
    /// The glob pattern is malformed
    InvalidPattern(String),
    /// No member file was added
    Empty,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Manifest { path, source } => {
                write!(f, "Can't read manifest {}: {}", path.display(), source)
            }
            TableError::GlobDirectory { dir, source } => {
                write!(f, "Can't list directory {}: {}", dir.display(), source)
            }
            TableError::InvalidPattern(msg) => write!(f, "Invalid glob pattern: {}", msg),
            TableError::Empty => write!(f, "No member files were added"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TableError::Manifest { source, .. } => Some(source),
            TableError::GlobDirectory { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for file table operations
pub type TableResult<T> = Result<T, TableError>;

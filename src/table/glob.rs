//! Single-segment glob patterns
//!
//! A pattern is a literal directory followed by one final segment matched with
//! `glob::Pattern`. Wildcards never match `/`, and a leading `.` in a name must be
//! matched by a literal `.`.

use crate::table::error::{TableError, TableResult};
use glob::{MatchOptions, Pattern};
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

const SEGMENT_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A parsed glob pattern: literal directory plus final-segment matcher
#[derive(Debug, Clone)]
pub struct GlobPattern {
    dir: Option<PathBuf>,
    segment: Pattern,
}

impl GlobPattern {
    /// Split `pattern` at its last `/` and compile the final segment
    pub fn parse(pattern: impl AsRef<OsStr>) -> TableResult<Self> {
        let bytes = pattern.as_ref().as_bytes();
        let (dir, segment) = match bytes.iter().rposition(|&b| b == b'/') {
            Some(0) => (Some(PathBuf::from("/")), &bytes[1..]),
            Some(pos) => (
                Some(PathBuf::from(OsStr::from_bytes(&bytes[..pos]))),
                &bytes[pos + 1..],
            ),
            None => (None, bytes),
        };

        let display = String::from_utf8_lossy(bytes);
        if segment.is_empty() {
            return Err(TableError::InvalidPattern(format!(
                "'{}' has an empty final segment",
                display
            )));
        }
        let segment = std::str::from_utf8(segment).map_err(|_| {
            TableError::InvalidPattern(format!("'{}' is not valid UTF-8", display))
        })?;
        let segment = Pattern::new(segment)
            .map_err(|err| TableError::InvalidPattern(format!("'{}': {}", display, err)))?;

        Ok(Self { dir, segment })
    }

    /// Directory whose entries are matched (`.` when the pattern had none)
    pub fn dir(&self) -> &Path {
        self.dir.as_deref().unwrap_or(Path::new("."))
    }

    /// Path handed to the builder for a matching entry name
    ///
    /// Entries keep the directory prefix exactly as it was written.
    pub fn entry_path(&self, name: &OsStr) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Whether a single directory entry name matches the final segment
    ///
    /// Names that are not valid UTF-8 never match.
    pub fn matches(&self, name: &OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| self.segment.matches_with(name, SEGMENT_OPTIONS))
    }
}

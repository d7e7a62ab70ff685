//! FileTableBuilder: populate a FileTable from one of three sources
//!
//! Provides the construction strategies for the member table:
//! - Manifest: a text file listing one member path per line
//! - Glob: a directory plus a single-segment wildcard pattern
//! - Args: an explicit list of paths
//!
//! Candidates that cannot be stat'ed or opened are logged and skipped; only
//! strategy-wide failures are returned as errors.

use crate::table::error::{TableError, TableResult};
use crate::table::glob::GlobPattern;
use crate::table::{FileTable, MemberFile};
use crate::vfs::{LocalFs, VfsError, VfsInterface};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Builder for constructing a FileTable
///
/// # Example
/// ```no_run
/// use concatfs::table::FileTableBuilder;
///
/// let mut builder = FileTableBuilder::new();
/// builder.from_args(["/data/part.000", "/data/part.001"]);
/// let table = builder.build().unwrap();
/// assert_eq!(table.member_count(), 2);
/// ```
pub struct FileTableBuilder {
    fs: Box<dyn VfsInterface>,
    table: FileTable,
}

impl FileTableBuilder {
    /// Create a builder over the local file system
    pub fn new() -> Self {
        Self::with_fs(Box::new(LocalFs::new()))
    }

    /// Create a builder over an arbitrary VFS implementation
    pub fn with_fs(fs: Box<dyn VfsInterface>) -> Self {
        Self {
            fs,
            table: FileTable::new(),
        }
    }

    /// Number of members added so far
    pub fn member_count(&self) -> usize {
        self.table.member_count()
    }

    /// Stat, open and append one member file
    ///
    /// Returns `false` (after logging why) when the candidate was skipped.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_add_file(path) {
            Ok(index) => {
                log::debug!(
                    "added member #{} {} ({} bytes)",
                    index,
                    path.display(),
                    self.table.member_at(index).map_or(0, |m| m.size())
                );
                true
            }
            Err(err) => {
                log::warn!("skipping {}: {}", path.display(), err);
                false
            }
        }
    }

    fn try_add_file(&mut self, path: &Path) -> Result<usize, VfsError> {
        if path.as_os_str().is_empty() {
            return Err(VfsError::InvalidArgument("empty path".to_string()));
        }

        let stat = self.fs.stat(path)?;
        if !stat.is_regular_file() {
            return Err(VfsError::NotRegularFile(path.display().to_string()));
        }

        let handle = self.fs.open_read(path)?;
        let member = MemberFile::new(handle, path.to_path_buf(), stat.size);

        self.table.push(member).map_err(|member| {
            VfsError::InvalidArgument(format!(
                "adding {} bytes overflows the virtual file size",
                member.size()
            ))
        })
    }

    /// Add every path listed in a manifest, one per line
    ///
    /// Exactly one trailing `\n` is stripped from each line. A `\r` right before
    /// it is stripped too, so CRLF manifests name the same files as LF ones; a
    /// lone `\r` elsewhere stays part of the path. A final line without a
    /// terminator is taken as is, and blank lines are skipped with a warning.
    /// Returns the number of members added.
    pub fn from_manifest(&mut self, manifest: impl AsRef<Path>) -> TableResult<usize> {
        let manifest = manifest.as_ref();
        let manifest_err = |source| TableError::Manifest {
            path: manifest.to_path_buf(),
            source,
        };

        let mut reader = BufReader::new(File::open(manifest).map_err(manifest_err)?);
        let mut added = 0;
        let mut line = Vec::new();
        let mut line_no = 0;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).map_err(manifest_err)? == 0 {
                break;
            }
            line_no += 1;

            let path = strip_line_terminator(&line);
            if path.is_empty() {
                log::warn!("{}:{}: blank line skipped", manifest.display(), line_no);
                continue;
            }
            if self.add_file(Path::new(OsStr::from_bytes(path))) {
                added += 1;
            }
        }

        log::info!(
            "{} of {} manifest entries added from {}",
            added,
            line_no,
            manifest.display()
        );
        Ok(added)
    }

    /// Add every entry of a directory matching a single-segment pattern
    ///
    /// Entries are matched and added in sorted byte order. Returns the number of
    /// members added.
    pub fn from_glob(&mut self, pattern: impl AsRef<OsStr>) -> TableResult<usize> {
        let pattern = GlobPattern::parse(pattern)?;
        let dir = pattern.dir();

        let mut names = self
            .fs
            .read_dir(dir)
            .map_err(|source| TableError::GlobDirectory {
                dir: dir.to_path_buf(),
                source,
            })?;
        names.sort();

        let mut added = 0;
        for name in names.iter().filter(|name| pattern.matches(name)) {
            if self.add_file(pattern.entry_path(name)) {
                added += 1;
            }
        }

        log::info!("{} files matched in {}", added, dir.display());
        Ok(added)
    }

    /// Add each path in the given order, without deduplication
    pub fn from_args<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            let path: PathBuf = path.into();
            if self.add_file(&path) {
                added += 1;
            }
        }
        added
    }

    /// Publish the table
    ///
    /// A table without members is an error; any handles opened so far are
    /// released with the builder.
    pub fn build(self) -> TableResult<FileTable> {
        if self.table.is_empty() {
            return Err(TableError::Empty);
        }
        log::info!(
            "virtual file has {} members, {} bytes",
            self.table.member_count(),
            self.table.total_size()
        );
        Ok(self.table)
    }
}

impl Default for FileTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_line_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_strip_line_terminator() {
        assert_eq!(strip_line_terminator(b"a.bin\n"), b"a.bin");
        assert_eq!(strip_line_terminator(b"a.bin\r\n"), b"a.bin");
        assert_eq!(strip_line_terminator(b"a.bin"), b"a.bin");
        assert_eq!(strip_line_terminator(b"\n"), b"");
    }

    #[test]
    fn test_builder_manifest_skips_missing() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.bin", b"aaaa");
        let b = write(&dir, "b.bin", b"bb");
        let missing = dir.path().join("missing.bin");
        let manifest = write(
            &dir,
            "list.txt",
            format!("{}\n{}\n{}\n", a.display(), missing.display(), b.display()).as_bytes(),
        );

        let mut builder = FileTableBuilder::new();
        assert_eq!(builder.from_manifest(&manifest).unwrap(), 2);

        let table = builder.build().unwrap();
        assert_eq!(table.member_count(), 2);
        assert_eq!(table.total_size(), 6);
        assert_eq!(table.member_at(0).unwrap().path(), a.as_path());
        assert_eq!(table.member_at(1).unwrap().path(), b.as_path());
    }

    #[test]
    fn test_builder_manifest_final_line_keeps_last_char() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.bin", b"12345");
        let manifest = write(&dir, "list.txt", a.display().to_string().as_bytes());

        let mut builder = FileTableBuilder::new();
        assert_eq!(builder.from_manifest(&manifest).unwrap(), 1);
        assert_eq!(builder.build().unwrap().total_size(), 5);
    }

    #[test]
    fn test_builder_manifest_blank_lines_and_crlf() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.bin", b"x");
        let manifest = write(
            &dir,
            "list.txt",
            format!("\n{}\r\n\n", a.display()).as_bytes(),
        );

        let mut builder = FileTableBuilder::new();
        assert_eq!(builder.from_manifest(&manifest).unwrap(), 1);
    }

    #[test]
    fn test_builder_manifest_unreadable() {
        let dir = TempDir::new().unwrap();
        let mut builder = FileTableBuilder::new();
        let result = builder.from_manifest(dir.path().join("nope.txt"));
        assert!(matches!(result, Err(TableError::Manifest { .. })));
        assert_eq!(builder.member_count(), 0);
    }

    #[test]
    fn test_builder_empty_manifest_fails_build() {
        let dir = TempDir::new().unwrap();
        let manifest = write(&dir, "list.txt", b"");

        let mut builder = FileTableBuilder::new();
        assert_eq!(builder.from_manifest(&manifest).unwrap(), 0);
        assert!(matches!(builder.build(), Err(TableError::Empty)));
    }

    #[test]
    fn test_builder_glob_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(&dir, "c.dat", b"ccc");
        write(&dir, "b.txt", b"bb");
        write(&dir, "a.txt", b"a");

        let pattern = dir.path().join("*.txt");
        let mut builder = FileTableBuilder::new();
        assert_eq!(builder.from_glob(pattern.as_os_str()).unwrap(), 2);

        let table = builder.build().unwrap();
        let names: Vec<_> = table
            .members()
            .map(|m| m.path().file_name().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(table.total_size(), 3);
    }

    #[test]
    fn test_builder_glob_skips_directories() {
        let dir = TempDir::new().unwrap();
        write(&dir, "part1", b"11");
        fs::create_dir(dir.path().join("part2")).unwrap();
        write(&dir, "part3", b"333");

        let mut builder = FileTableBuilder::new();
        assert_eq!(builder.from_glob(dir.path().join("part*").as_os_str()).unwrap(), 2);
        assert_eq!(builder.build().unwrap().total_size(), 5);
    }

    #[test]
    fn test_builder_glob_missing_directory() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("nope").join("*.bin");

        let mut builder = FileTableBuilder::new();
        let result = builder.from_glob(pattern.as_os_str());
        assert!(matches!(result, Err(TableError::GlobDirectory { .. })));
    }

    #[test]
    fn test_builder_args_keep_order_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.bin", b"aa");
        let b = write(&dir, "b.bin", b"bbb");

        let mut builder = FileTableBuilder::new();
        let added = builder.from_args([b.clone(), a.clone(), b.clone(), dir.path().join("gone")]);
        assert_eq!(added, 3);

        let table = builder.build().unwrap();
        assert_eq!(table.total_size(), 8);
        assert_eq!(table.member_at(0).unwrap().path(), b.as_path());
        assert_eq!(table.member_at(1).unwrap().path(), a.as_path());
        assert_eq!(table.member_at(2).unwrap().path(), b.as_path());
    }

    #[test]
    fn test_builder_add_file_rejects_empty_path() {
        let mut builder = FileTableBuilder::new();
        assert!(!builder.add_file(""));
        assert_eq!(builder.member_count(), 0);
    }
}

//! Command line configuration

use crate::adapter::ConcatFs;
use crate::mount::{MountPoint, StartupError, StartupResult};
use crate::table::{FileTable, FileTableBuilder};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "concatfs")]
#[command(about = "Mount several files as one read-only virtual file")]
pub struct Args {
    /// Treat SOURCE as a glob pattern instead of a manifest
    #[arg(short = 'g', long, conflicts_with = "files")]
    pub glob: bool,

    /// Treat SOURCE... as the member files themselves
    #[arg(short = 'f', long)]
    pub files: bool,

    /// Allow users other than the mount owner to access the file
    #[arg(short = 'o', long)]
    pub allow_other: bool,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Print the member table as JSON and exit without mounting
    #[arg(long)]
    pub print_table: bool,

    /// File on which the virtual file is mounted (created if missing)
    pub mount_point: PathBuf,

    /// Manifest file, glob pattern, or member files
    #[arg(required = true)]
    pub sources: Vec<OsString>,
}

/// Where the member list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    Manifest(PathBuf),
    Glob(OsString),
    Files(Vec<PathBuf>),
}

impl SourceMode {
    /// Run the matching builder strategy and publish the table
    pub fn build_table(&self) -> StartupResult<FileTable> {
        let mut builder = FileTableBuilder::new();
        match self {
            SourceMode::Manifest(path) => {
                builder.from_manifest(path)?;
            }
            SourceMode::Glob(pattern) => {
                builder.from_glob(pattern)?;
            }
            SourceMode::Files(paths) => {
                builder.from_args(paths.iter());
            }
        }
        Ok(builder.build()?)
    }
}

/// Validated mount configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    pub mount_point: PathBuf,
    pub source: SourceMode,
    pub allow_other: bool,
    pub debug: bool,
    pub print_table: bool,
}

impl MountConfig {
    /// Validate the mount point, then build the table, and hand both to an adapter
    ///
    /// The mount point goes first so an unusable path fails before any member is
    /// opened. If the table then fails, the placeholder created here is removed
    /// again when the MountPoint is dropped.
    pub fn prepare(&self) -> StartupResult<ConcatFs> {
        let mount_point = MountPoint::prepare(&self.mount_point)?;
        let table = self.source.build_table()?;
        log::debug!("member table: {}", serde_json::to_string(&table.summary())?);
        Ok(ConcatFs::with_mount_point(table, mount_point))
    }

    /// Build the table without mounting and render its summary as JSON
    pub fn table_json(&self) -> StartupResult<String> {
        let table = self.source.build_table()?;
        Ok(serde_json::to_string_pretty(&table.summary())?)
    }
}

impl TryFrom<Args> for MountConfig {
    type Error = StartupError;

    fn try_from(args: Args) -> StartupResult<Self> {
        let source = if args.files {
            SourceMode::Files(args.sources.into_iter().map(PathBuf::from).collect())
        } else {
            let [single] = <[OsString; 1]>::try_from(args.sources).map_err(|sources| {
                StartupError::InvalidArguments(format!(
                    "expected one {}, got {}",
                    if args.glob { "glob pattern" } else { "manifest" },
                    sources.len()
                ))
            })?;
            if args.glob {
                SourceMode::Glob(single)
            } else {
                SourceMode::Manifest(PathBuf::from(single))
            }
        };

        Ok(MountConfig {
            mount_point: args.mount_point,
            source,
            allow_other: args.allow_other,
            debug: args.debug,
            print_table: args.print_table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableError;
    use std::fs;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> StartupResult<MountConfig> {
        let args = Args::try_parse_from(argv).unwrap();
        MountConfig::try_from(args)
    }

    #[test]
    fn test_config_default_is_manifest() {
        let config = parse(&["concatfs", "/mnt/joined", "list.txt"]).unwrap();
        assert_eq!(config.mount_point, PathBuf::from("/mnt/joined"));
        assert_eq!(config.source, SourceMode::Manifest(PathBuf::from("list.txt")));
        assert!(!config.allow_other);
        assert!(!config.debug);
    }

    #[test]
    fn test_config_glob_and_flags() {
        let config = parse(&["concatfs", "-g", "-o", "-d", "/mnt/joined", "/logs/app.*"]).unwrap();
        assert_eq!(config.source, SourceMode::Glob(OsString::from("/logs/app.*")));
        assert!(config.allow_other);
        assert!(config.debug);
    }

    #[test]
    fn test_config_files_keeps_order() {
        let config = parse(&["concatfs", "--files", "/mnt/joined", "b", "a", "b"]).unwrap();
        assert_eq!(
            config.source,
            SourceMode::Files(vec!["b".into(), "a".into(), "b".into()])
        );
    }

    #[test]
    fn test_config_manifest_needs_single_source() {
        let result = parse(&["concatfs", "/mnt/joined", "one.txt", "two.txt"]);
        assert!(matches!(result, Err(StartupError::InvalidArguments(_))));
    }

    #[test]
    fn test_config_rejects_conflicting_modes() {
        let result = Args::try_parse_from(["concatfs", "-g", "-f", "/mnt/joined", "x"]);
        assert!(result.is_err());
        let result = Args::try_parse_from(["concatfs", "/mnt/joined"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_build_table_from_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, b"abc").unwrap();

        let table = SourceMode::Files(vec![a.clone(), a]).build_table().unwrap();
        assert_eq!(table.total_size(), 6);

        let result = SourceMode::Files(vec![dir.path().join("missing")]).build_table();
        assert!(matches!(result, Err(StartupError::Table(_))));
    }

    fn manifest_config(dir: &TempDir, lines: &str) -> MountConfig {
        let manifest = dir.path().join("list.txt");
        fs::write(&manifest, lines).unwrap();
        MountConfig {
            mount_point: dir.path().join("joined"),
            source: SourceMode::Manifest(manifest),
            allow_other: false,
            debug: false,
            print_table: false,
        }
    }

    #[test]
    fn test_config_prepare_empty_table_removes_placeholder() {
        let dir = TempDir::new().unwrap();
        let config = manifest_config(&dir, "/nonexistent/concatfs/a\n\n");

        let result = config.prepare();
        assert!(matches!(result, Err(StartupError::Table(TableError::Empty))));
        assert!(!config.mount_point.exists());
    }

    #[test]
    fn test_config_prepare_keeps_placeholder_while_mounted() {
        let dir = TempDir::new().unwrap();
        let member = dir.path().join("a");
        fs::write(&member, b"hello").unwrap();
        let config = manifest_config(&dir, &format!("{}\n", member.display()));

        let adapter = config.prepare().unwrap();
        assert_eq!(adapter.table().total_size(), 5);
        assert!(config.mount_point.exists());

        drop(adapter);
        assert!(!config.mount_point.exists());
    }

    #[test]
    fn test_config_prepare_rejects_directory_before_building() {
        let dir = TempDir::new().unwrap();
        let mut config = manifest_config(&dir, "");
        config.mount_point = dir.path().to_path_buf();

        let result = config.prepare();
        assert!(matches!(result, Err(StartupError::MountPointNotFile(_))));
    }

    #[test]
    fn test_config_table_json() {
        let dir = TempDir::new().unwrap();
        let member = dir.path().join("a");
        fs::write(&member, b"abc").unwrap();
        let config = manifest_config(&dir, &format!("{}\n", member.display()));

        let json: serde_json::Value = serde_json::from_str(&config.table_json().unwrap()).unwrap();
        assert_eq!(json["total_size"], 3);
        assert_eq!(json["members"][0]["size"], 3);
        assert!(!config.mount_point.exists());
    }
}

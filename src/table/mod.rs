//! File table module for the virtual file's member list
//!
//! This module implements the member table with the following features:
//! - Member files with owned read handles and sizes captured at build time
//! - Offset to member lookup over precomputed prefix sums
//! - Construction from a manifest, a glob pattern or an argument list

pub mod builder;
pub mod error;
pub mod glob;
pub mod member;
pub mod table;

pub use builder::FileTableBuilder;
pub use error::{TableError, TableResult};
pub use self::glob::GlobPattern;
pub use member::MemberFile;
pub use table::{FileTable, MemberSummary, TableSummary};

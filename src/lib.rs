//! concatfs: several files exposed as one read-only virtual file

// Global type definitions
pub mod types;

// Import various modules
pub mod adapter;
pub mod config;
pub mod mount;
pub mod reader;
pub mod table;
pub mod vfs;

#[cfg(test)]
mod testutil;

// Re-export the main entry points for easier access
pub use adapter::ConcatFs;
pub use reader::VirtualFileReader;
pub use table::{FileTable, FileTableBuilder};

// Re-export vfs items for easier access
pub use vfs::VfsError;
pub use vfs::VfsInterface;

//! Global type definitions
//!
//! Stores constants used by the adapter and the FUSE binding

use std::time::Duration;

/// The only path served by the adapter
pub const VIRTUAL_PATH: &str = "/";

/// Inode of the virtual file (FUSE root inode)
pub const ROOT_INO: u64 = 1;

/// Filesystem name reported to the kernel
pub const FS_NAME: &str = "concatfs";

/// Attribute cache lifetime handed to the kernel
pub const ATTR_TTL: Duration = Duration::from_secs(1);

/// Unit of the block count in stat results
pub const STAT_BLOCK_SIZE: u64 = 512;

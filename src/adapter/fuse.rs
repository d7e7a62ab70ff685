//! FUSE binding for ConcatFs
//!
//! The mount point is a regular file, so the root inode is the virtual file itself.
//! Every callback resolves the inode to the adapter's path and forwards the request.
//! The session is served from a background thread while the caller waits for a
//! termination signal or for the kernel to tear the mount down.

use crate::adapter::ConcatFs;
use crate::types::{ATTR_TTL, FS_NAME, ROOT_INO, STAT_BLOCK_SIZE, VIRTUAL_PATH};
use crate::vfs::FileStat;
use fuser::{
    FileAttr, FileType, Filesystem, KernelConfig, MountOption, ReplyAttr, ReplyData, ReplyEmpty,
    ReplyEntry, ReplyOpen, Request,
};
use libc::c_int;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread;

/// Options applied when mounting
#[derive(Debug, Clone, Default)]
pub struct MountOptions {
    /// Let users other than the mount owner access the file
    pub allow_other: bool,
}

impl MountOptions {
    pub fn to_fuser_options(&self) -> Vec<MountOption> {
        let mut options = vec![
            MountOption::RO,
            MountOption::FSName(FS_NAME.to_string()),
            MountOption::Subtype(FS_NAME.to_string()),
            MountOption::DefaultPermissions,
            MountOption::AutoUnmount,
        ];
        if self.allow_other {
            options.push(MountOption::AllowOther);
        }
        options
    }
}

/// Why serving stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// A termination signal was delivered to the process
    Signal(c_int),
    /// The kernel destroyed the session (external unmount)
    Unmounted,
}

/// fuser::Filesystem wrapper around the adapter
pub struct ConcatFuse {
    fs: ConcatFs,
    shutdown: Option<Sender<Shutdown>>,
}

impl ConcatFuse {
    pub fn new(fs: ConcatFs) -> Self {
        Self { fs, shutdown: None }
    }

    /// Wrapper that reports `Shutdown::Unmounted` on `tx` once destroyed
    pub fn with_shutdown(fs: ConcatFs, tx: Sender<Shutdown>) -> Self {
        Self {
            fs,
            shutdown: Some(tx),
        }
    }

    fn path_of(ino: u64) -> Option<&'static str> {
        (ino == ROOT_INO).then_some(VIRTUAL_PATH)
    }
}

/// Convert adapter attributes into the kernel's view of the virtual file
pub fn to_file_attr(stat: &FileStat) -> FileAttr {
    FileAttr {
        ino: ROOT_INO,
        size: stat.size,
        blocks: stat.size.div_ceil(STAT_BLOCK_SIZE),
        atime: stat.atime,
        mtime: stat.mtime,
        ctime: stat.ctime,
        crtime: stat.ctime,
        kind: FileType::RegularFile,
        perm: stat.permissions(),
        nlink: u32::try_from(stat.nlink).unwrap_or(u32::MAX),
        uid: stat.uid,
        gid: stat.gid,
        rdev: 0,
        blksize: stat.blksize,
        flags: 0,
    }
}

impl Filesystem for ConcatFuse {
    fn init(&mut self, _req: &Request<'_>, _config: &mut KernelConfig) -> Result<(), c_int> {
        let table = self.fs.table();
        log::info!(
            "{} mounted: {} members, {} bytes",
            FS_NAME,
            table.member_count(),
            table.total_size()
        );
        Ok(())
    }

    fn destroy(&mut self) {
        log::info!("{} unmounted", FS_NAME);
        self.fs.on_unmount();
        if let Some(tx) = self.shutdown.take() {
            // The waiting side is gone when the unmount was ours
            let _ = tx.send(Shutdown::Unmounted);
        }
    }

    fn lookup(&mut self, _req: &Request<'_>, _parent: u64, _name: &OsStr, reply: ReplyEntry) {
        // The root is a file; it has no entries
        reply.error(libc::ENOENT);
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let Some(path) = Self::path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.fs.get_attributes(path) {
            Ok(stat) => reply.attr(&ATTR_TTL, &to_file_attr(&stat)),
            Err(err) => reply.error(err.errno()),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        if Self::path_of(ino).is_none() {
            reply.error(libc::ENOENT);
            return;
        }
        if flags & libc::O_ACCMODE != libc::O_RDONLY {
            reply.error(libc::EROFS);
            return;
        }
        reply.opened(0, 0);
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let Some(path) = Self::path_of(ino) else {
            reply.error(libc::ENOENT);
            return;
        };
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(libc::EINVAL);
            return;
        };
        match self.fs.read(path, offset, size as usize) {
            Ok(data) => reply.data(&data),
            Err(err) => {
                log::debug!("read at {} failed: {}", offset, err);
                reply.error(err.errno());
            }
        }
    }

    fn unlink(&mut self, _req: &Request<'_>, _parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let path = Path::new(VIRTUAL_PATH).join(name);
        match self.fs.unlink(&path.to_string_lossy()) {
            Ok(()) => reply.ok(),
            Err(err) => reply.error(err.errno()),
        }
    }
}

/// Forward SIGINT, SIGTERM and SIGHUP to `tx` until the returned handle is closed
pub fn listen_for_signals(tx: Sender<Shutdown>) -> io::Result<Handle> {
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    let handle = signals.handle();
    thread::Builder::new()
        .name("concatfs-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                if tx.send(Shutdown::Signal(signal)).is_err() {
                    break;
                }
            }
        })?;
    Ok(handle)
}

/// Mount the adapter on `mountpoint` and serve requests until shutdown
///
/// Returns once a termination signal arrives or the mount is removed from
/// outside. The session is dropped before returning, which unmounts it and runs
/// `destroy`, so the adapter's placeholder is cleaned up either way.
pub fn mount(fs: ConcatFs, mountpoint: &Path, options: &MountOptions) -> io::Result<Shutdown> {
    let (tx, rx) = mpsc::channel();
    let signals = listen_for_signals(tx.clone())?;

    let fuse = ConcatFuse::with_shutdown(fs, tx);
    let session = match fuser::spawn_mount2(fuse, mountpoint, &options.to_fuser_options()) {
        Ok(session) => session,
        Err(err) => {
            signals.close();
            return Err(err);
        }
    };

    let reason = rx.recv().unwrap_or(Shutdown::Unmounted);
    match reason {
        Shutdown::Signal(signal) => log::info!("signal {} received, unmounting", signal),
        Shutdown::Unmounted => log::info!("{} was unmounted", mountpoint.display()),
    }

    drop(session);
    signals.close();
    Ok(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mount::MountPoint;
    use crate::testutil::{mem_stat, table_of};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_fuse_attr_from_stat() {
        let mut stat = mem_stat(10);
        stat.size = 1025;
        let attr = to_file_attr(&stat);

        assert_eq!(attr.ino, ROOT_INO);
        assert_eq!(attr.size, 1025);
        assert_eq!(attr.blocks, 3);
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.perm, 0o640);
        assert_eq!(attr.uid, 1000);
        assert_eq!(attr.gid, 100);
        assert_eq!(attr.mtime, stat.mtime);
    }

    #[test]
    fn test_fuse_mount_options() {
        let options = MountOptions::default().to_fuser_options();
        assert!(options.contains(&MountOption::RO));
        assert!(options.contains(&MountOption::AutoUnmount));
        assert!(!options.contains(&MountOption::AllowOther));

        let options = MountOptions { allow_other: true }.to_fuser_options();
        assert!(options.contains(&MountOption::AllowOther));
    }

    #[test]
    fn test_fuse_inode_mapping() {
        assert_eq!(ConcatFuse::path_of(ROOT_INO), Some(VIRTUAL_PATH));
        assert_eq!(ConcatFuse::path_of(2), None);

        let fs = ConcatFuse::new(ConcatFs::new(table_of(&[b"abc"])));
        assert_eq!(fs.fs.table().total_size(), 3);
    }

    #[test]
    fn test_fuse_destroy_removes_placeholder_and_notifies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("joined");
        let mount_point = MountPoint::prepare(&path).unwrap();
        assert!(path.exists());

        let (tx, rx) = mpsc::channel();
        let adapter = ConcatFs::with_mount_point(table_of(&[b"abc"]), mount_point);
        let mut fuse = ConcatFuse::with_shutdown(adapter, tx);
        fuse.destroy();

        assert!(!path.exists());
        assert_eq!(rx.try_recv(), Ok(Shutdown::Unmounted));

        // A second destroy neither notifies nor touches the file system
        fuse.destroy();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_fuse_signal_wakes_waiter() {
        let (tx, rx) = mpsc::channel();
        let handle = listen_for_signals(tx).unwrap();

        signal_hook::low_level::raise(SIGHUP).unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Ok(Shutdown::Signal(SIGHUP))
        );
        handle.close();
    }
}

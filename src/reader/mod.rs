//! Virtual file read path
//!
//! Maps a `(offset, length)` request on the virtual file onto positional reads
//! against the member files. The reader holds no position state of its own, so
//! any number of reads may run concurrently against the same table.

use crate::table::FileTable;
use crate::vfs::VfsResult;

/// Stateless reader over a built FileTable
#[derive(Debug, Clone, Copy)]
pub struct VirtualFileReader<'a> {
    table: &'a FileTable,
}

impl<'a> VirtualFileReader<'a> {
    pub fn new(table: &'a FileTable) -> Self {
        Self { table }
    }

    /// Read up to `length` bytes starting at virtual `offset`
    ///
    /// - `offset` at or past the end yields an empty buffer
    /// - `length` is clamped to the bytes remaining after `offset`
    /// - any member read error fails the whole call; partial data is dropped
    /// - running out of members, or a member returning fewer bytes than its
    ///   declared size, ends the call with a short read
    pub fn read(&self, offset: u64, length: usize) -> VfsResult<Vec<u8>> {
        let total_size = self.table.total_size();
        if offset >= total_size {
            return Ok(Vec::new());
        }

        // total_size - offset cannot underflow here
        let available = total_size - offset;
        let length = usize::try_from(available).map_or(length, |avail| length.min(avail));
        if length == 0 {
            return Ok(Vec::new());
        }

        let (mut index, mut file_offset) = match self.table.member_at(0) {
            Some(first) if offset < first.size() => (0, offset),
            _ => match self.table.locate(offset) {
                Some(position) => position,
                None => return Ok(Vec::new()),
            },
        };

        let mut buf = vec![0u8; length];
        let mut filled = 0;

        while filled < length {
            let Some(member) = self.table.member_at(index) else {
                break;
            };

            let member_left = member.size().saturating_sub(file_offset);
            if member_left == 0 {
                index += 1;
                file_offset = 0;
                continue;
            }

            let wanted = length - filled;
            let want = usize::try_from(member_left).map_or(wanted, |left| left.min(wanted));
            let n = member.pread(&mut buf[filled..filled + want], file_offset)?;
            if n == 0 {
                log::debug!(
                    "{} ended at {} before its recorded size {}",
                    member.path().display(),
                    file_offset,
                    member.size()
                );
                break;
            }

            filled += n;
            file_offset += n as u64;
        }

        buf.truncate(filled);
        Ok(buf)
    }
}

/// Read from `table` without constructing a reader first
pub fn read(table: &FileTable, offset: u64, length: usize) -> VfsResult<Vec<u8>> {
    VirtualFileReader::new(table).read(offset, length)
}

//! FileTable: the ordered set of member files behind the virtual file

use crate::table::MemberFile;
use serde::Serialize;

/// Ordered, immutable-after-build collection of member files
///
/// Stores:
/// - members: concatenation order, fixed at build time
/// - ends: exclusive end offset of every member in the virtual file (prefix sums)
/// - total_size: always equal to the sum of all member sizes
///
/// Member `i` owns the half-open range `[ends[i] - size_i, ends[i])`. An offset that
/// lands exactly on a boundary belongs to the next member, and empty members never
/// own an offset.
#[derive(Debug, Default)]
pub struct FileTable {
    members: Vec<MemberFile>,
    ends: Vec<u64>,
    total_size: u64,
}

impl FileTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a member, keeping `total_size` and the prefix sums in step
    ///
    /// Hands the member back if the total would overflow `u64`.
    pub(crate) fn push(&mut self, member: MemberFile) -> Result<usize, MemberFile> {
        let Some(end) = self.total_size.checked_add(member.size()) else {
            return Err(member);
        };
        self.total_size = end;
        self.ends.push(end);
        self.members.push(member);
        Ok(self.members.len() - 1)
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Size of the virtual file in bytes
    #[inline]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Member at `index` in concatenation order
    #[inline]
    pub fn member_at(&self, index: usize) -> Option<&MemberFile> {
        self.members.get(index)
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberFile> {
        self.members.iter()
    }

    /// Offset in the virtual file at which member `index` starts
    pub fn member_start(&self, index: usize) -> Option<u64> {
        let member = self.members.get(index)?;
        Some(self.ends[index] - member.size())
    }

    /// Map a virtual offset to `(member_index, intra_file_offset)`
    ///
    /// Returns `None` when `offset >= total_size`.
    pub fn locate(&self, offset: u64) -> Option<(usize, u64)> {
        if offset >= self.total_size {
            return None;
        }
        // First member whose end lies past the offset
        let index = self.ends.partition_point(|&end| end <= offset);
        let start = self.ends[index] - self.members[index].size();
        Some((index, offset - start))
    }

    /// Serializable description of the table
    pub fn summary(&self) -> TableSummary {
        let members = self
            .members
            .iter()
            .zip(&self.ends)
            .map(|(member, &end)| MemberSummary {
                path: member.path().display().to_string(),
                offset: end - member.size(),
                size: member.size(),
            })
            .collect();

        TableSummary {
            total_size: self.total_size,
            members,
        }
    }
}

/// One member as reported by [`FileTable::summary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub path: String,
    /// Start offset in the virtual file
    pub offset: u64,
    pub size: u64,
}

/// Table layout as reported by [`FileTable::summary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub total_size: u64,
    pub members: Vec<MemberSummary>,
}

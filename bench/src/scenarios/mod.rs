//! Benchmark scenarios module

use concatfs::FileTable;
use rand::Rng;

/// Scenario trait - picks the next read a worker issues
pub trait Scenario: Send + Sync {
    /// Offset and length of the next read; `cursor` is the worker's own position
    fn next_read(
        &self,
        table: &FileTable,
        rng: &mut rand::rngs::StdRng,
        cursor: &mut u64,
    ) -> (u64, usize);

    /// Get scenario name
    fn name(&self) -> &str;
}

/// Sequential scenario - each worker streams the file from its own cursor
pub struct Sequential {
    read_size: usize,
}

impl Sequential {
    pub fn new(read_size: usize) -> Self {
        Self { read_size }
    }
}

impl Scenario for Sequential {
    fn next_read(
        &self,
        table: &FileTable,
        _rng: &mut rand::rngs::StdRng,
        cursor: &mut u64,
    ) -> (u64, usize) {
        if *cursor >= table.total_size() {
            *cursor = 0;
        }
        let offset = *cursor;
        *cursor += self.read_size as u64;
        (offset, self.read_size)
    }

    fn name(&self) -> &str {
        "sequential"
    }
}

/// Random scenario - uniformly distributed offsets
pub struct Random {
    read_size: usize,
}

impl Random {
    pub fn new(read_size: usize) -> Self {
        Self { read_size }
    }
}

impl Scenario for Random {
    fn next_read(
        &self,
        table: &FileTable,
        rng: &mut rand::rngs::StdRng,
        _cursor: &mut u64,
    ) -> (u64, usize) {
        (rng.gen_range(0..table.total_size()), self.read_size)
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Boundary scenario - reads straddling the seam between two members
pub struct Boundary {
    read_size: usize,
}

impl Boundary {
    pub fn new(read_size: usize) -> Self {
        Self { read_size }
    }
}

impl Scenario for Boundary {
    fn next_read(
        &self,
        table: &FileTable,
        rng: &mut rand::rngs::StdRng,
        _cursor: &mut u64,
    ) -> (u64, usize) {
        let index = rng.gen_range(0..table.member_count());
        let start = table.member_start(index).unwrap_or(0);
        let half = (self.read_size / 2) as u64;
        (start.saturating_sub(half), self.read_size)
    }

    fn name(&self) -> &str {
        "boundary"
    }
}

//! Memory block model.
//!
//! The simulated address space is a list of contiguous blocks. A block
//! is either free or owned by one process. Blocks are created by
//! splitting and are never merged.

use serde::{Deserialize, Serialize};

/// A segment of the linear address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    /// Identifier issued once, when the block is created.
    pub id: usize,
    /// Size in abstract units.
    pub size: u64,
    /// Whether a process owns this block.
    pub occupied: bool,
    /// Owning process, when occupied.
    pub owner: Option<u32>,
}

impl MemoryBlock {
    /// Creates a free block.
    pub fn free(id: usize, size: u64) -> Self {
        Self {
            id,
            size,
            occupied: false,
            owner: None,
        }
    }

    /// Whether the block is free and can hold `size` units.
    #[inline]
    pub fn fits(&self, size: u64) -> bool {
        !self.occupied && self.size >= size
    }

    /// Marks the block as owned by `pid`.
    pub(crate) fn occupy(&mut self, pid: u32) {
        self.occupied = true;
        self.owner = Some(pid);
    }

    /// Marks the block free.
    pub(crate) fn vacate(&mut self) {
        self.occupied = false;
        self.owner = None;
    }
}

/// A request for contiguous memory on behalf of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRequest {
    /// Requesting process.
    pub pid: u32,
    /// Units requested.
    pub size: u64,
}

impl MemoryRequest {
    /// Creates a request.
    pub fn new(pid: u32, size: u64) -> Self {
        Self { pid, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_fits() {
        let mut b = MemoryBlock::free(0, 100);
        assert!(b.fits(100));
        assert!(b.fits(1));
        assert!(!b.fits(101));

        b.occupy(5);
        assert!(!b.fits(1));
        assert_eq!(b.owner, Some(5));

        b.vacate();
        assert!(b.fits(100));
        assert_eq!(b.owner, None);
    }
}

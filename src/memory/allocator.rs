//! Contiguous memory allocator.
//!
//! # Algorithm
//!
//! 1. The strategy picks a free block at least as large as the request.
//! 2. If the block is larger, the remainder is split off as a new free
//!    block inserted right after it, and the chosen block shrinks to the
//!    requested size.
//! 3. The chosen block is marked occupied by the requesting process.
//!
//! Split-off blocks receive ids from a counter owned by the allocator, so
//! ids stay unique for the life of the allocator. Blocks are never merged,
//! so the block count never decreases and the block sizes always sum to
//! the total memory size.

use serde::{Deserialize, Serialize};

use super::AllocationStrategy;
use crate::error::{Result, SimError};
use crate::models::MemoryBlock;

/// Outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Requesting process.
    pub pid: u32,
    /// Id of the block now owned by `pid`.
    pub block_id: usize,
    /// Position of that block in the list.
    pub block_index: usize,
    /// Units allocated (equals the request).
    pub size: u64,
    /// Block size before the split.
    pub source_size: u64,
    /// Id of the free remainder, if the block was split.
    pub remainder_id: Option<usize>,
    /// Strategy that chose the block.
    pub strategy: AllocationStrategy,
}

/// Occupancy summary of the address space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Total memory size.
    pub total_size: u64,
    /// Units held by processes.
    pub used: u64,
    /// Units in free blocks.
    pub free: u64,
    /// Number of occupied blocks.
    pub occupied_blocks: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Largest single free block.
    pub largest_free: u64,
    /// `1 - largest_free / free`; 0.0 when nothing is free.
    pub external_fragmentation: f64,
}

/// A partitioned address space with First-Fit / Best-Fit placement.
///
/// Serialize-only. Build one with [`MemoryAllocator::new`] so the block
/// sizes sum to `total_size` and `next_block_id` is ahead of every block id.
///
/// # Example
///
/// ```
/// use u_ossim::memory::{AllocationStrategy, MemoryAllocator};
///
/// let mut memory = MemoryAllocator::new(1000, AllocationStrategy::FirstFit).unwrap();
/// let a = memory.allocate(1, 300).unwrap();
/// assert_eq!(a.block_id, 0);
/// assert_eq!(memory.block_count(), 2);
/// assert!(memory.allocate(2, 800).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryAllocator {
    total_size: u64,
    strategy: AllocationStrategy,
    blocks: Vec<MemoryBlock>,
    next_block_id: usize,
}

impl MemoryAllocator {
    /// Creates an address space of `total_size` units as a single free block (id 0).
    ///
    /// # Errors
    /// `InvalidMemorySize` if `total_size` is zero.
    pub fn new(total_size: u64, strategy: AllocationStrategy) -> Result<Self> {
        if total_size == 0 {
            return Err(SimError::InvalidMemorySize);
        }
        Ok(Self {
            total_size,
            strategy,
            blocks: vec![MemoryBlock::free(0, total_size)],
            next_block_id: 1,
        })
    }

    /// Allocates with the configured strategy.
    ///
    /// # Errors
    /// - `InvalidRequestSize` for a zero-size request.
    /// - `AllocationFailed` when no free block fits; the block list is unchanged.
    pub fn allocate(&mut self, pid: u32, size: u64) -> Result<Allocation> {
        self.allocate_with(self.strategy, pid, size)
    }

    /// Allocates with First-Fit regardless of the configured strategy.
    pub fn first_fit(&mut self, pid: u32, size: u64) -> Result<Allocation> {
        self.allocate_with(AllocationStrategy::FirstFit, pid, size)
    }

    /// Allocates with Best-Fit regardless of the configured strategy.
    pub fn best_fit(&mut self, pid: u32, size: u64) -> Result<Allocation> {
        self.allocate_with(AllocationStrategy::BestFit, pid, size)
    }

    /// Allocates with an explicit strategy.
    pub fn allocate_with(
        &mut self,
        strategy: AllocationStrategy,
        pid: u32,
        size: u64,
    ) -> Result<Allocation> {
        if size == 0 {
            return Err(SimError::InvalidRequestSize { pid });
        }

        let Some(index) = strategy.select(&self.blocks, size) else {
            tracing::warn!(pid, size, %strategy, "allocation failed");
            return Err(SimError::AllocationFailed { pid, size });
        };

        let source_size = self.blocks[index].size;
        let remainder_id = if source_size > size {
            let id = self.issue_block_id();
            self.blocks
                .insert(index + 1, MemoryBlock::free(id, source_size - size));
            tracing::debug!(
                block = self.blocks[index].id,
                remainder = id,
                remainder_size = source_size - size,
                "split block"
            );
            Some(id)
        } else {
            None
        };

        let block = &mut self.blocks[index];
        block.size = size;
        block.occupy(pid);
        tracing::debug!(pid, block = block.id, size, source_size, %strategy, "allocated");

        Ok(Allocation {
            pid,
            block_id: block.id,
            block_index: index,
            size,
            source_size,
            remainder_id,
            strategy,
        })
    }

    /// Frees every block owned by `pid` and returns how many were freed.
    ///
    /// Freed blocks keep their size and position; adjacent free blocks are
    /// not coalesced.
    pub fn release(&mut self, pid: u32) -> usize {
        let mut freed = 0;
        for block in self.blocks.iter_mut().filter(|b| b.owner == Some(pid)) {
            block.vacate();
            freed += 1;
        }
        tracing::debug!(pid, freed, "released");
        freed
    }

    fn issue_block_id(&mut self) -> usize {
        let id = self.next_block_id;
        self.next_block_id += 1;
        id
    }

    /// Blocks in address order.
    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    /// Blocks paired with their start offsets.
    pub fn layout(&self) -> Vec<(u64, &MemoryBlock)> {
        let mut offset = 0;
        self.blocks
            .iter()
            .map(|b| {
                let start = offset;
                offset += b.size;
                (start, b)
            })
            .collect()
    }

    /// Blocks owned by `pid`.
    pub fn blocks_of(&self, pid: u32) -> Vec<&MemoryBlock> {
        self.blocks.iter().filter(|b| b.owner == Some(pid)).collect()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total memory size.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Configured strategy.
    pub fn strategy(&self) -> AllocationStrategy {
        self.strategy
    }

    /// Occupancy summary.
    pub fn stats(&self) -> MemoryStats {
        let (occupied, free): (Vec<&MemoryBlock>, Vec<&MemoryBlock>) =
            self.blocks.iter().partition(|b| b.occupied);
        let used: u64 = occupied.iter().map(|b| b.size).sum();
        let free_total: u64 = free.iter().map(|b| b.size).sum();
        let largest_free = free.iter().map(|b| b.size).max().unwrap_or(0);
        let external_fragmentation = if free_total == 0 {
            0.0
        } else {
            1.0 - largest_free as f64 / free_total as f64
        };

        MemoryStats {
            total_size: self.total_size,
            used,
            free: free_total,
            occupied_blocks: occupied.len(),
            free_blocks: free.len(),
            largest_free,
            external_fragmentation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_sum(m: &MemoryAllocator) -> u64 {
        m.blocks().iter().map(|b| b.size).sum()
    }

    #[test]
    fn test_new_single_free_block() {
        let m = MemoryAllocator::new(1024, AllocationStrategy::FirstFit).unwrap();
        assert_eq!(m.blocks(), &[MemoryBlock::free(0, 1024)]);
        assert_eq!(m.total_size(), 1024);
        assert_eq!(
            MemoryAllocator::new(0, AllocationStrategy::BestFit).unwrap_err(),
            SimError::InvalidMemorySize
        );
    }

    #[test]
    fn test_first_fit_split() {
        let mut m = MemoryAllocator::new(1000, AllocationStrategy::FirstFit).unwrap();
        let a = m.allocate(1, 300).unwrap();
        assert_eq!(a.block_id, 0);
        assert_eq!(a.source_size, 1000);
        assert_eq!(a.remainder_id, Some(1));

        let blocks = m.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].size, blocks[0].occupied, blocks[0].owner), (300, true, Some(1)));
        assert_eq!((blocks[1].id, blocks[1].size, blocks[1].occupied), (1, 700, false));
        assert_eq!(size_sum(&m), 1000);
    }

    #[test]
    fn test_exact_fit_no_split() {
        let mut m = MemoryAllocator::new(500, AllocationStrategy::FirstFit).unwrap();
        let a = m.allocate(3, 500).unwrap();
        assert_eq!(a.remainder_id, None);
        assert_eq!(m.block_count(), 1);
        assert!(m.blocks()[0].occupied);
    }

    #[test]
    fn test_block_ids_unique_and_monotonic() {
        let mut m = MemoryAllocator::new(1000, AllocationStrategy::FirstFit).unwrap();
        for pid in 1..=4 {
            m.allocate(pid, 100).unwrap();
        }
        m.release(2);
        m.allocate(5, 50).unwrap();
        let mut ids: Vec<usize> = m.blocks().iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), 6);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_failure_leaves_blocks_unchanged() {
        let mut m = MemoryAllocator::new(1000, AllocationStrategy::BestFit).unwrap();
        m.allocate(1, 600).unwrap();
        let before = m.blocks().to_vec();
        assert_eq!(
            m.allocate(2, 401).unwrap_err(),
            SimError::AllocationFailed { pid: 2, size: 401 }
        );
        assert_eq!(m.blocks(), before.as_slice());
    }

    #[test]
    fn test_zero_request_rejected() {
        let mut m = MemoryAllocator::new(10, AllocationStrategy::FirstFit).unwrap();
        assert_eq!(
            m.allocate(4, 0).unwrap_err(),
            SimError::InvalidRequestSize { pid: 4 }
        );
        assert_eq!(m.block_count(), 1);
    }

    #[test]
    fn test_best_fit_vs_first_fit_after_release() {
        // Layout after setup: [A:200 free][B:100 occ][C:100 free][D:600 free]
        let build = || {
            let mut m = MemoryAllocator::new(1000, AllocationStrategy::FirstFit).unwrap();
            m.allocate(1, 200).unwrap();
            m.allocate(2, 100).unwrap();
            m.allocate(3, 100).unwrap();
            m.release(1);
            m.release(3);
            m
        };

        let mut ff = build();
        let a = ff.first_fit(9, 100).unwrap();
        assert_eq!(a.block_index, 0);

        let mut bf = build();
        let a = bf.best_fit(9, 100).unwrap();
        assert_eq!(a.block_index, 2);
        assert_eq!(a.remainder_id, None);
    }

    #[test]
    fn test_best_fit_equal_waste_lowest_index() {
        let mut m = MemoryAllocator::new(900, AllocationStrategy::BestFit).unwrap();
        m.allocate(1, 300).unwrap();
        m.allocate(2, 300).unwrap();
        m.allocate(3, 300).unwrap();
        m.release(1);
        m.release(3);
        let a = m.allocate(4, 250).unwrap();
        assert_eq!(a.block_index, 0);
        assert_eq!(m.blocks()[1].size, 50);
    }

    #[test]
    fn test_release_without_coalescing() {
        let mut m = MemoryAllocator::new(300, AllocationStrategy::FirstFit).unwrap();
        m.allocate(1, 100).unwrap();
        m.allocate(1, 100).unwrap();
        assert_eq!(m.blocks_of(1).len(), 2);
        assert_eq!(m.release(1), 2);
        assert_eq!(m.release(1), 0);
        assert_eq!(m.block_count(), 3);
        assert!(m.blocks().iter().all(|b| !b.occupied));
        // Three adjacent 100-unit holes: 250 does not fit.
        assert!(m.allocate(2, 250).is_err());
    }

    #[test]
    fn test_stats_and_layout() {
        let mut m = MemoryAllocator::new(1000, AllocationStrategy::FirstFit).unwrap();
        m.allocate(1, 200).unwrap();
        m.allocate(2, 300).unwrap();
        m.release(1);

        let stats = m.stats();
        assert_eq!(stats.used, 300);
        assert_eq!(stats.free, 700);
        assert_eq!(stats.free_blocks, 2);
        assert_eq!(stats.occupied_blocks, 1);
        assert_eq!(stats.largest_free, 500);
        assert!((stats.external_fragmentation - (1.0 - 500.0 / 700.0)).abs() < 1e-10);

        let offsets: Vec<u64> = m.layout().iter().map(|(start, _)| *start).collect();
        assert_eq!(offsets, vec![0, 200, 500]);
    }

    #[test]
    fn test_stats_full_memory() {
        let mut m = MemoryAllocator::new(100, AllocationStrategy::FirstFit).unwrap();
        m.allocate(1, 100).unwrap();
        let stats = m.stats();
        assert_eq!(stats.free, 0);
        assert!((stats.external_fragmentation - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_allocator_serializes_state() {
        let mut m = MemoryAllocator::new(100, AllocationStrategy::BestFit).unwrap();
        m.allocate(7, 40).unwrap();
        let json: serde_json::Value = serde_json::to_value(&m).unwrap();
        assert_eq!(json["total_size"], 100);
        assert_eq!(json["next_block_id"], 2);
        assert_eq!(json["blocks"].as_array().map(Vec::len), Some(2));
    }
}

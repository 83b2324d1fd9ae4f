//! Contiguous memory allocation.
//!
//! Manages a linear address space as a list of blocks and places
//! requests with First-Fit or Best-Fit. Blocks split on allocation and
//! are never coalesced.
//!
//! The allocator is single-threaded: one call mutates the block list in
//! place, and concurrent callers must serialize their requests.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 9.2
//! - Knuth (1997), "The Art of Computer Programming", Vol. 1, §2.5

mod allocator;
mod strategy;

pub use allocator::{Allocation, MemoryAllocator, MemoryStats};
pub use strategy::AllocationStrategy;

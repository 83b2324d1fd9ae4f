//! Simulation domain models.
//!
//! Provides the data types shared by the schedulers and the allocator.
//!
//! # Domain Mappings
//!
//! | u-ossim | Textbook term |
//! |---------|---------------|
//! | Process | PCB / job |
//! | Workload | Job batch |
//! | Schedule | Gantt chart + trace |
//! | MemoryBlock | Partition / hole |

mod memory;
mod process;
mod schedule;
mod workload;

pub use memory::{MemoryBlock, MemoryRequest};
pub use process::{Process, ProcessState};
pub use schedule::{ExecutionSlice, Schedule, TraceEvent};
pub use workload::Workload;

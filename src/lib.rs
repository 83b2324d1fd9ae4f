//! Operating-system simulation engine.
//!
//! Simulates two classical OS subsystems over in-memory data: CPU process
//! scheduling and contiguous memory allocation. Every run is synchronous
//! and deterministic for a given input order.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `Workload`, `Schedule`,
//!   `TraceEvent`, `MemoryBlock`, `MemoryRequest`
//! - **`scheduler`**: FCFS, SPN and Round Robin schedulers, plus
//!   `ScheduleMetrics` (response, wait, turnaround, throughput)
//! - **`memory`**: First-Fit / Best-Fit `MemoryAllocator`
//! - **`validation`**: Input integrity checks (duplicate pids, zero bursts)
//! - **`config`**: JSON session configuration
//! - **`simulation`**: `Simulator` driver producing a serializable report
//!
//! # Architecture
//!
//! The crate is the engine only. Menus, operator input and table printing
//! belong to a front end that passes validated data in and renders the
//! structured results it gets back. The library logs through `tracing`
//! and never installs a subscriber.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts"
//! - Stallings (2018), "Operating Systems: Internals and Design Principles"
//! - Tanenbaum & Bos (2014), "Modern Operating Systems"

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod scheduler;
pub mod simulation;
pub mod validation;

pub use error::{Result, SimError};

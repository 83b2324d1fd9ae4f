//! Error types for the simulation engine.
//!
//! Every failure in the engine is reported as a typed [`SimError`].
//! None of them are fatal: an `AllocationFailed` in particular is an
//! expected outcome of a memory request, and callers continue with
//! their remaining requests.

use thiserror::Error;

use crate::validation::ValidationError;

/// Engine result alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Failures reported by schedulers, the allocator, and the driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Round Robin quantum below the accepted minimum.
    #[error("invalid quantum {quantum}: must be at least {minimum}")]
    InvalidQuantum {
        /// Requested quantum.
        quantum: u64,
        /// Smallest accepted quantum.
        minimum: u64,
    },

    /// Scheduling or metrics requested for zero processes.
    #[error("workload contains no processes")]
    EmptyWorkload,

    /// A process has a zero CPU burst.
    #[error("process {pid} has a zero service time")]
    InvalidServiceTime {
        /// Offending process.
        pid: u32,
    },

    /// The simulated clock would pass `u64::MAX` while running this process.
    #[error("process {pid} would run past the end of the time axis")]
    TimeOverflow {
        /// First process whose burst no longer fits.
        pid: u32,
    },

    /// Metrics requested before every process was scheduled.
    #[error("process {pid} has not been scheduled to completion")]
    IncompleteSchedule {
        /// First process found without a start or finish time.
        pid: u32,
    },

    /// Start/finish times contradict arrival or service time.
    #[error("process {pid} has inconsistent timing")]
    InconsistentSchedule {
        /// Offending process.
        pid: u32,
    },

    /// No free block can hold the request.
    #[error("no free block can hold {size} units for process {pid}")]
    AllocationFailed {
        /// Requesting process.
        pid: u32,
        /// Requested size.
        size: u64,
    },

    /// Memory initialized with zero capacity.
    #[error("memory size must be positive")]
    InvalidMemorySize,

    /// Allocation request for zero units.
    #[error("process {pid} requested zero units of memory")]
    InvalidRequestSize {
        /// Requesting process.
        pid: u32,
    },

    /// Placement strategy name not recognized.
    #[error("unknown allocation strategy '{0}' (expected first-fit or best-fit)")]
    UnknownStrategy(String),

    /// Scheduling algorithm name not recognized.
    #[error("unknown scheduling algorithm '{0}' (expected fcfs, spn or rr:<quantum>)")]
    UnknownAlgorithm(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input failed loader-side validation.
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

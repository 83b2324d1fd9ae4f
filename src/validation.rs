//! Input validation for workloads and memory requests.
//!
//! The engine accepts any workload it can simulate; these checks are for
//! the loader side, before data reaches a scheduler or allocator.
//! Detects:
//! - Empty workloads
//! - Duplicate pids (the engine tolerates them, but metrics become ambiguous)
//! - Zero service times
//! - Zero-size memory requests
//!
//! All problems are collected, not just the first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{MemoryRequest, Process};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// No processes supplied.
    EmptyWorkload,
    /// Two processes share a pid.
    DuplicatePid,
    /// A process has a zero burst.
    ZeroServiceTime,
    /// A memory request asks for zero units.
    ZeroRequestSize,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a batch of processes.
///
/// Checks:
/// 1. At least one process
/// 2. No duplicate pids
/// 3. Every service time is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_workload(processes: &[Process]) -> ValidationResult {
    let mut errors = Vec::new();

    if processes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyWorkload,
            "Workload has no processes",
        ));
    }

    let mut seen = HashSet::new();
    for p in processes {
        if !seen.insert(p.pid) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePid,
                format!("Duplicate pid: {}", p.pid),
            ));
        }
        if p.service_time == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroServiceTime,
                format!("Process {} has zero service time", p.pid),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a batch of memory requests.
pub fn validate_requests(requests: &[MemoryRequest]) -> ValidationResult {
    let errors: Vec<ValidationError> = requests
        .iter()
        .filter(|r| r.size == 0)
        .map(|r| {
            ValidationError::new(
                ValidationErrorKind::ZeroRequestSize,
                format!("Process {} requested zero units", r.pid),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Workload model.
//!
//! A workload is the ordered batch of processes handed to a scheduler.
//! Order matters: it is the final tie-breaker for every algorithm.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Process;

/// An ordered batch of processes.
///
/// Schedulers never mutate a workload; each run works on its own copy.
///
/// # Example
///
/// ```
/// use u_ossim::models::Workload;
///
/// let workload = Workload::new()
///     .with_process(1, 0, 12)
///     .with_process(2, 1, 5)
///     .with_process(3, 2, 8);
/// assert_eq!(workload.len(), 3);
/// assert_eq!(workload.total_service_time(), 25);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    processes: Vec<Process>,
}

impl Workload {
    /// Creates an empty workload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workload from existing process records.
    ///
    /// Scheduling state on the records is reset.
    pub fn from_processes(processes: impl IntoIterator<Item = Process>) -> Self {
        Self {
            processes: processes
                .into_iter()
                .map(|p| Process::new(p.pid, p.arrival, p.service_time))
                .collect(),
        }
    }

    /// Creates a workload from `(pid, arrival, service_time)` triples.
    pub fn from_triples(triples: &[(u32, u64, u64)]) -> Self {
        Self {
            processes: triples
                .iter()
                .map(|&(pid, arrival, service)| Process::new(pid, arrival, service))
                .collect(),
        }
    }

    /// Generates `count` processes with pids `1..=count`, arrivals in
    /// `0..=max_arrival` and bursts in `1..=max_service`.
    pub fn random<R: Rng>(count: usize, max_arrival: u64, max_service: u64, rng: &mut R) -> Self {
        let max_service = max_service.max(1);
        let processes = (1..=count)
            .map(|pid| {
                let arrival = rng.random_range(0..=max_arrival);
                let service = rng.random_range(1..=max_service);
                Process::new(pid as u32, arrival, service)
            })
            .collect();
        Self { processes }
    }

    /// Appends a process.
    pub fn with_process(mut self, pid: u32, arrival: u64, service_time: u64) -> Self {
        self.push(Process::new(pid, arrival, service_time));
        self
    }

    /// Appends a process record, resetting its scheduling state.
    pub fn push(&mut self, process: Process) {
        self.processes
            .push(Process::new(process.pid, process.arrival, process.service_time));
    }

    /// Process records in input order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether the workload has no processes.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Sum of all bursts, saturating at `u64::MAX`.
    pub fn total_service_time(&self) -> u64 {
        self.processes
            .iter()
            .fold(0u64, |total, p| total.saturating_add(p.service_time))
    }

    /// Earliest arrival, if any.
    pub fn first_arrival(&self) -> Option<u64> {
        self.processes.iter().map(|p| p.arrival).min()
    }
}

impl FromIterator<Process> for Workload {
    fn from_iter<I: IntoIterator<Item = Process>>(iter: I) -> Self {
        Self::from_processes(iter)
    }
}

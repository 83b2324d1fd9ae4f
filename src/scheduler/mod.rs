//! CPU schedulers and schedule metrics.
//!
//! Each scheduler consumes a [`Workload`] and produces a [`Schedule`]
//! on a private copy of the process records, so repeated runs over the
//! same workload never contaminate each other.
//!
//! # Algorithms
//!
//! | Scheduler | Preemptive | Selection |
//! |-----------|------------|-----------|
//! | [`Fcfs`] | no | earliest arrival, then input order |
//! | [`Spn`] | no | shortest burst among arrived, then arrival, then input order |
//! | [`RoundRobin`] | yes | FIFO ready queue, fixed quantum |
//!
//! # Metrics
//!
//! [`ScheduleMetrics`] computes response, wait and turnaround times and
//! throughput from a completed schedule.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Stallings (2018), "Operating Systems: Internals and Design Principles", Ch. 9

mod fcfs;
mod metrics;
mod round_robin;
mod spn;

pub use fcfs::Fcfs;
pub use metrics::{ProcessMetrics, ScheduleMetrics};
pub use round_robin::RoundRobin;
pub use spn::Spn;

use std::fmt::{self, Debug};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_QUANTUM;
use crate::error::{Result, SimError};
use crate::models::{Process, Schedule, Workload};

/// A CPU scheduling algorithm.
///
/// Implementations must be deterministic: the same workload in the same
/// order always yields the same schedule.
pub trait CpuScheduler: Send + Sync + Debug {
    /// Short algorithm name (e.g., "FCFS").
    fn name(&self) -> &'static str;

    /// Simulates the workload to completion.
    ///
    /// # Errors
    /// `EmptyWorkload` for zero processes, `InvalidServiceTime` for a zero burst.
    fn schedule(&self, workload: &Workload) -> Result<Schedule>;

    /// Algorithm description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Selects a scheduling algorithm by name.
///
/// Parses from `"fcfs"`, `"spn"`, `"rr"` (default quantum) or `"rr:<quantum>"`.
///
/// ```
/// use u_ossim::scheduler::SchedulingAlgorithm;
///
/// let algo: SchedulingAlgorithm = "rr:4".parse().unwrap();
/// assert_eq!(algo, SchedulingAlgorithm::RoundRobin { quantum: 4 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingAlgorithm {
    /// First-Come-First-Served.
    Fcfs,
    /// Shortest-Process-Next.
    Spn,
    /// Round Robin with the given quantum.
    RoundRobin {
        /// Time slice granted per dispatch.
        quantum: u64,
    },
}

impl SchedulingAlgorithm {
    /// Instantiates the scheduler.
    ///
    /// # Errors
    /// `InvalidQuantum` for a zero Round Robin quantum.
    pub fn build(&self) -> Result<Box<dyn CpuScheduler>> {
        Ok(match *self {
            Self::Fcfs => Box::new(Fcfs),
            Self::Spn => Box::new(Spn),
            Self::RoundRobin { quantum } => Box::new(RoundRobin::new(quantum)?),
        })
    }

    /// Builds the scheduler and runs it over `workload`.
    pub fn schedule(&self, workload: &Workload) -> Result<Schedule> {
        self.build()?.schedule(workload)
    }
}

impl FromStr for SchedulingAlgorithm {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let (name, param) = match normalized.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (normalized.as_str(), None),
        };
        match (name, param) {
            ("fcfs" | "fifo", None) => Ok(Self::Fcfs),
            ("spn" | "sjf", None) => Ok(Self::Spn),
            ("rr" | "round-robin", None) => Ok(Self::RoundRobin {
                quantum: DEFAULT_QUANTUM,
            }),
            ("rr" | "round-robin", Some(q)) => q
                .parse()
                .map(|quantum| Self::RoundRobin { quantum })
                .map_err(|_| SimError::UnknownAlgorithm(s.to_string())),
            _ => Err(SimError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::Spn => write!(f, "SPN"),
            Self::RoundRobin { quantum } => write!(f, "RR(q={quantum})"),
        }
    }
}

/// Checks the workload and copies it into a fresh schedule.
///
/// No clock value can exceed the latest arrival plus the sum of all
/// bursts, so once that horizon fits in `u64` the simulation loops
/// cannot overflow.
pub(crate) fn prepare(algorithm: &str, workload: &Workload) -> Result<Schedule> {
    if workload.is_empty() {
        return Err(SimError::EmptyWorkload);
    }
    if let Some(p) = workload.processes().iter().find(|p| p.service_time == 0) {
        return Err(SimError::InvalidServiceTime { pid: p.pid });
    }
    time_horizon(workload.processes())?;
    Ok(Schedule::new(algorithm, workload.processes().to_vec()))
}

/// Latest arrival plus every burst.
///
/// # Errors
/// `TimeOverflow` naming the first process whose burst does not fit.
pub(crate) fn time_horizon(processes: &[Process]) -> Result<u64> {
    let latest = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
    processes.iter().try_fold(latest, |horizon, p| {
        horizon
            .checked_add(p.service_time)
            .ok_or(SimError::TimeOverflow { pid: p.pid })
    })
}

/// Earliest arrival among unfinished processes that have not yet arrived at `now`.
pub(crate) fn next_arrival(processes: &[Process], now: u64) -> Option<u64> {
    processes
        .iter()
        .filter(|p| !p.is_finished() && p.arrival > now)
        .map(|p| p.arrival)
        .min()
}

/// Logs the end-of-run summary.
pub(crate) fn log_completion(schedule: &Schedule) {
    tracing::info!(
        algorithm = %schedule.algorithm,
        processes = schedule.process_count(),
        makespan = schedule.makespan(),
        idle = schedule.idle_time(),
        "schedule complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithms() {
        assert_eq!("fcfs".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::Fcfs));
        assert_eq!(" SPN ".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::Spn));
        assert_eq!(
            "RR:3".parse::<SchedulingAlgorithm>(),
            Ok(SchedulingAlgorithm::RoundRobin { quantum: 3 })
        );
        assert_eq!(
            "round-robin".parse::<SchedulingAlgorithm>(),
            Ok(SchedulingAlgorithm::RoundRobin {
                quantum: DEFAULT_QUANTUM
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            "lottery".parse::<SchedulingAlgorithm>(),
            Err(SimError::UnknownAlgorithm(_))
        ));
        assert!(matches!(
            "rr:abc".parse::<SchedulingAlgorithm>(),
            Err(SimError::UnknownAlgorithm(_))
        ));
        assert!(matches!(
            "fcfs:2".parse::<SchedulingAlgorithm>(),
            Err(SimError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(SchedulingAlgorithm::Fcfs.to_string(), "FCFS");
        assert_eq!(
            SchedulingAlgorithm::RoundRobin { quantum: 4 }.to_string(),
            "RR(q=4)"
        );
    }

    #[test]
    fn test_build_rejects_zero_quantum() {
        let err = SchedulingAlgorithm::RoundRobin { quantum: 0 }
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidQuantum { quantum: 0, .. }));
    }

    #[test]
    fn test_prepare_checks_workload() {
        assert_eq!(
            prepare("x", &Workload::new()).unwrap_err(),
            SimError::EmptyWorkload
        );
        let w = Workload::new().with_process(1, 0, 2).with_process(8, 0, 0);
        assert_eq!(
            prepare("x", &w).unwrap_err(),
            SimError::InvalidServiceTime { pid: 8 }
        );
    }

    #[test]
    fn test_time_horizon() {
        let w = Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]);
        assert_eq!(time_horizon(w.processes()), Ok(27));

        let w = Workload::from_triples(&[(1, 0, 5), (2, u64::MAX - 7, 1), (3, 0, 1)]);
        assert_eq!(time_horizon(w.processes()), Ok(u64::MAX));

        let w = Workload::from_triples(&[(1, 0, 5), (2, u64::MAX - 7, 1), (3, 0, 2)]);
        assert_eq!(
            time_horizon(w.processes()),
            Err(SimError::TimeOverflow { pid: 3 })
        );
    }

    #[test]
    fn test_arrival_at_end_of_time_rejected() {
        let w = Workload::from_triples(&[(1, u64::MAX, 1)]);
        for algo in [
            SchedulingAlgorithm::Fcfs,
            SchedulingAlgorithm::Spn,
            SchedulingAlgorithm::RoundRobin { quantum: 4 },
        ] {
            assert_eq!(
                algo.schedule(&w).unwrap_err(),
                SimError::TimeOverflow { pid: 1 }
            );
        }
    }

    #[test]
    fn test_schedule_near_end_of_time() {
        let w = Workload::from_triples(&[(1, u64::MAX - 5, 3), (2, 0, 2)]);
        for algo in [
            SchedulingAlgorithm::Fcfs,
            SchedulingAlgorithm::Spn,
            SchedulingAlgorithm::RoundRobin { quantum: 2 },
        ] {
            let schedule = algo.schedule(&w).unwrap();
            assert_eq!(
                schedule.finish_times(),
                vec![Some(u64::MAX - 2), Some(2)],
                "{algo}"
            );
            let metrics = ScheduleMetrics::calculate(&schedule).unwrap();
            assert_eq!(metrics.makespan, u64::MAX - 2);
            assert!((metrics.avg_turnaround_time - 2.5).abs() < 1e-10);
        }
    }

    #[test]
    fn test_every_algorithm_leaves_workload_untouched() {
        let w = Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]);
        let before = w.clone();
        for algo in [
            SchedulingAlgorithm::Fcfs,
            SchedulingAlgorithm::Spn,
            SchedulingAlgorithm::RoundRobin { quantum: 4 },
        ] {
            let schedule = algo.schedule(&w).unwrap();
            assert!(schedule.is_complete());
        }
        assert_eq!(w, before);
    }

    #[test]
    fn test_next_arrival() {
        let procs = vec![Process::new(1, 0, 1), Process::new(2, 7, 1), Process::new(3, 4, 1)];
        assert_eq!(next_arrival(&procs, 0), Some(4));
        assert_eq!(next_arrival(&procs, 4), Some(7));
        assert_eq!(next_arrival(&procs, 7), None);
    }
}

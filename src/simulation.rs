//! Simulation driver.
//!
//! [`Simulator`] turns a validated [`SimulationConfig`] into a
//! [`SimulationReport`]: one scheduling run per configured algorithm, each
//! on its own copy of the workload, plus an optional replay of memory
//! requests against a fresh allocator.
//!
//! Allocation failures are recorded in the report and the replay moves
//! on to the next request. Everything in the report is `Serialize`, so a
//! front end can render it as tables or dump it as JSON.
//!
//! # Example
//!
//! ```
//! use u_ossim::config::SimulationConfig;
//! use u_ossim::models::{MemoryRequest, Workload};
//! use u_ossim::simulation::Simulator;
//!
//! let workload = Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]);
//! let config = SimulationConfig::new(&workload)
//!     .with_memory(1000, "first-fit", vec![MemoryRequest::new(1, 300)]);
//!
//! let report = Simulator::new(&config).unwrap().run().unwrap();
//! assert_eq!(report.runs.len(), 3);
//! assert_eq!(report.memory.unwrap().allocated_count(), 1);
//! ```

use serde::Serialize;
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::memory::{Allocation, AllocationStrategy, MemoryAllocator, MemoryStats};
use crate::models::{MemoryBlock, MemoryRequest, Schedule, Workload};
use crate::scheduler::{ScheduleMetrics, SchedulingAlgorithm};

/// Result of one scheduling algorithm over the workload.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmRun {
    /// Algorithm that produced the schedule.
    pub algorithm: SchedulingAlgorithm,
    /// Populated process records, slices and trace.
    pub schedule: Schedule,
    /// Aggregate and per-process metrics.
    pub metrics: ScheduleMetrics,
}

/// Outcome of one replayed memory request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationOutcome {
    /// A block was assigned.
    Allocated(Allocation),
    /// No free block was large enough.
    Failed {
        /// Requesting process.
        pid: u32,
        /// Units requested.
        size: u64,
        /// Rendered error.
        reason: String,
    },
}

impl AllocationOutcome {
    /// Whether the request was satisfied.
    pub fn is_allocated(&self) -> bool {
        matches!(self, Self::Allocated(_))
    }
}

/// Memory half of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryReport {
    /// Strategy used for every request.
    pub strategy: AllocationStrategy,
    /// One outcome per request, in request order.
    pub outcomes: Vec<AllocationOutcome>,
    /// Final block list.
    pub blocks: Vec<MemoryBlock>,
    /// Final occupancy summary.
    pub stats: MemoryStats,
}

impl MemoryReport {
    /// Number of satisfied requests.
    pub fn allocated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_allocated()).count()
    }

    /// Number of failed requests.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.allocated_count()
    }
}

/// Everything a simulation session produced.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Scheduling runs, in configured order.
    pub runs: Vec<AlgorithmRun>,
    /// Memory replay, when configured.
    pub memory: Option<MemoryReport>,
}

impl SimulationReport {
    /// Finds the run for `algorithm`.
    pub fn run_for(&self, algorithm: SchedulingAlgorithm) -> Option<&AlgorithmRun> {
        self.runs.iter().find(|r| r.algorithm == algorithm)
    }

    /// Run with the lowest average wait time (first on ties).
    pub fn best_by_wait(&self) -> Option<&AlgorithmRun> {
        self.runs.iter().reduce(|best, run| {
            if run.metrics.avg_wait_time < best.metrics.avg_wait_time {
                run
            } else {
                best
            }
        })
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone)]
struct MemoryPlan {
    total_size: u64,
    strategy: AllocationStrategy,
    requests: Vec<MemoryRequest>,
}

/// Validated, ready-to-run simulation session.
#[derive(Debug, Clone)]
pub struct Simulator {
    workload: Workload,
    algorithms: Vec<SchedulingAlgorithm>,
    memory: Option<MemoryPlan>,
}

impl Simulator {
    /// Validates `config` and resolves every name in it.
    ///
    /// # Errors
    /// Anything [`SimulationConfig::validate`] reports.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let algorithms = config.resolve_algorithms()?;
        let memory = match (&config.memory, config.resolve_strategy()?) {
            (Some(m), Some(strategy)) => Some(MemoryPlan {
                total_size: m.total_size,
                strategy,
                requests: m.requests.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            workload: config.workload(),
            algorithms,
            memory,
        })
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(&SimulationConfig::from_json(json)?)
    }

    /// The workload every run starts from.
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Resolved algorithms, in run order.
    pub fn algorithms(&self) -> &[SchedulingAlgorithm] {
        &self.algorithms
    }

    /// Runs every algorithm and the memory replay.
    ///
    /// # Errors
    /// Scheduler or metrics errors. Allocation failures are not errors;
    /// they appear as [`AllocationOutcome::Failed`].
    pub fn run(&self) -> Result<SimulationReport> {
        let runs = self
            .algorithms
            .iter()
            .map(|&algorithm| self.run_algorithm(algorithm))
            .collect::<Result<Vec<_>>>()?;
        let memory = self.memory.as_ref().map(replay).transpose()?;

        info!(
            runs = runs.len(),
            memory = memory.is_some(),
            "simulation finished"
        );
        Ok(SimulationReport { runs, memory })
    }

    fn run_algorithm(&self, algorithm: SchedulingAlgorithm) -> Result<AlgorithmRun> {
        let schedule = algorithm.schedule(&self.workload)?;
        let metrics = ScheduleMetrics::calculate(&schedule)?;
        Ok(AlgorithmRun {
            algorithm,
            schedule,
            metrics,
        })
    }
}

fn replay(plan: &MemoryPlan) -> Result<MemoryReport> {
    let mut allocator = MemoryAllocator::new(plan.total_size, plan.strategy)?;
    let outcomes = plan
        .requests
        .iter()
        .map(|req| match allocator.allocate(req.pid, req.size) {
            Ok(allocation) => AllocationOutcome::Allocated(allocation),
            Err(e) => AllocationOutcome::Failed {
                pid: req.pid,
                size: req.size,
                reason: e.to_string(),
            },
        })
        .collect();

    Ok(MemoryReport {
        strategy: plan.strategy,
        outcomes,
        stats: allocator.stats(),
        blocks: allocator.blocks().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn reference() -> SimulationConfig {
        SimulationConfig::new(&Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]))
    }

    #[test]
    fn test_runs_every_algorithm() {
        let report = Simulator::new(&reference()).unwrap().run().unwrap();
        let algorithms: Vec<SchedulingAlgorithm> = report.runs.iter().map(|r| r.algorithm).collect();
        assert_eq!(
            algorithms,
            vec![
                SchedulingAlgorithm::Fcfs,
                SchedulingAlgorithm::Spn,
                SchedulingAlgorithm::RoundRobin { quantum: 4 },
            ]
        );
        assert!(report.memory.is_none());

        let fcfs = report.run_for(SchedulingAlgorithm::Fcfs).unwrap();
        assert_eq!(fcfs.schedule.finish_times(), vec![Some(12), Some(17), Some(25)]);
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let sim = Simulator::new(&reference()).unwrap();
        let first = sim.run().unwrap();
        let second = sim.run().unwrap();
        for (a, b) in first.runs.iter().zip(&second.runs) {
            assert_eq!(a.schedule, b.schedule);
        }
        assert!(sim.workload().processes().iter().all(|p| p.start_time.is_none()));
    }

    #[test]
    fn test_rr_reference_run() {
        let report = Simulator::new(&reference().with_algorithms(["rr:4"]))
            .unwrap()
            .run()
            .unwrap();
        let rr = &report.runs[0];
        assert_eq!(rr.schedule.start_times(), vec![Some(0), Some(8), Some(12)]);
        assert_eq!(rr.schedule.finish_times(), vec![Some(20), Some(21), Some(25)]);
    }

    #[test]
    fn test_best_by_wait() {
        // Average waits: FCFS 23/3, SPN 19/3, RR(4) 27/3.
        let workload = Workload::from_triples(&[(1, 0, 10), (2, 1, 6), (3, 2, 2)]);
        let report = Simulator::new(&SimulationConfig::new(&workload))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(
            report.best_by_wait().unwrap().algorithm,
            SchedulingAlgorithm::Spn
        );
    }

    #[test]
    fn test_memory_failure_does_not_stop_replay() {
        let config = reference().with_memory(
            1000,
            "first-fit",
            vec![
                MemoryRequest::new(1, 600),
                MemoryRequest::new(2, 500),
                MemoryRequest::new(3, 400),
            ],
        );
        let memory = Simulator::new(&config).unwrap().run().unwrap().memory.unwrap();

        assert_eq!(memory.allocated_count(), 2);
        assert_eq!(memory.failed_count(), 1);
        assert!(matches!(
            memory.outcomes[1],
            AllocationOutcome::Failed { pid: 2, size: 500, .. }
        ));
        assert!(memory.outcomes[2].is_allocated());
        assert_eq!(memory.stats.used, 1000);
        assert_eq!(memory.blocks.iter().map(|b| b.size).sum::<u64>(), 1000);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let err = Simulator::new(&reference().with_algorithms(["lottery"])).unwrap_err();
        assert_eq!(err, SimError::UnknownAlgorithm("lottery".into()));

        let err = Simulator::new(&reference().with_quantum(1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidQuantum { quantum: 1, .. }));
    }

    #[test]
    fn test_from_json_and_report_json() {
        let sim = Simulator::from_json(
            r#"{
                "processes": [{ "pid": 7, "arrival": 3, "service_time": 2 }],
                "algorithms": ["spn"],
                "memory": { "total_size": 10, "strategy": "bf",
                            "requests": [{ "pid": 7, "size": 20 }] }
            }"#,
        )
        .unwrap();
        assert_eq!(sim.algorithms(), &[SchedulingAlgorithm::Spn]);

        let report = sim.run().unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["runs"][0]["metrics"]["makespan"], 5);
        assert_eq!(json["memory"]["strategy"], "best-fit");
        assert_eq!(json["memory"]["outcomes"][0]["outcome"], "failed");
    }
}

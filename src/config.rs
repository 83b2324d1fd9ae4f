//! Simulation configuration.
//!
//! A [`SimulationConfig`] describes one simulation session: the workload,
//! which scheduling algorithms to run over it, and optionally a memory
//! size, placement strategy and allocation requests. It is plain data with
//! serde derives, loaded from JSON by the surrounding CLI.
//!
//! ```
//! use u_ossim::config::SimulationConfig;
//!
//! let config = SimulationConfig::from_json(r#"{
//!     "processes": [
//!         { "pid": 1, "arrival": 0, "service_time": 12 },
//!         { "pid": 2, "arrival": 1, "service_time": 5 }
//!     ],
//!     "algorithms": ["fcfs", "rr"],
//!     "quantum": 3,
//!     "memory": { "total_size": 1024, "strategy": "best-fit",
//!                 "requests": [{ "pid": 1, "size": 200 }] }
//! }"#).unwrap();
//! assert_eq!(config.processes.len(), 2);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::memory::AllocationStrategy;
use crate::models::{MemoryRequest, Process, Workload};
use crate::scheduler::SchedulingAlgorithm;
use crate::validation::{validate_requests, validate_workload};

/// Smallest quantum accepted from configuration.
pub const MIN_QUANTUM: u64 = 2;

/// Quantum used when a Round Robin run names none.
pub const DEFAULT_QUANTUM: u64 = 4;

/// One workload entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Process id.
    pub pid: u32,
    /// Arrival time.
    pub arrival: u64,
    /// Burst length.
    #[serde(alias = "service", alias = "burst")]
    pub service_time: u64,
}

/// Memory section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Address space size.
    pub total_size: u64,
    /// Placement strategy name (`"first-fit"` / `"best-fit"`).
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Requests replayed in order.
    #[serde(default)]
    pub requests: Vec<MemoryRequest>,
}

/// A full simulation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Workload, in input order.
    pub processes: Vec<ProcessSpec>,
    /// Algorithm names (`"fcfs"`, `"spn"`, `"rr"`, `"rr:<q>"`).
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
    /// Quantum for Round Robin entries that name none.
    #[serde(default = "default_quantum")]
    pub quantum: u64,
    /// Optional memory simulation.
    #[serde(default)]
    pub memory: Option<MemoryConfig>,
}

fn default_strategy() -> String {
    AllocationStrategy::default().name().to_string()
}

fn default_algorithms() -> Vec<String> {
    vec!["fcfs".into(), "spn".into(), "rr".into()]
}

fn default_quantum() -> u64 {
    DEFAULT_QUANTUM
}

impl SimulationConfig {
    /// Creates a configuration running every algorithm over `workload`.
    pub fn new(workload: &Workload) -> Self {
        Self {
            processes: workload
                .processes()
                .iter()
                .map(|p| ProcessSpec {
                    pid: p.pid,
                    arrival: p.arrival,
                    service_time: p.service_time,
                })
                .collect(),
            algorithms: default_algorithms(),
            quantum: DEFAULT_QUANTUM,
            memory: None,
        }
    }

    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces the algorithm list.
    pub fn with_algorithms<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.algorithms = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default Round Robin quantum.
    pub fn with_quantum(mut self, quantum: u64) -> Self {
        self.quantum = quantum;
        self
    }

    /// Enables the memory simulation.
    pub fn with_memory(
        mut self,
        total_size: u64,
        strategy: impl Into<String>,
        requests: Vec<MemoryRequest>,
    ) -> Self {
        self.memory = Some(MemoryConfig {
            total_size,
            strategy: strategy.into(),
            requests,
        });
        self
    }

    /// Builds the workload.
    pub fn workload(&self) -> Workload {
        self.processes
            .iter()
            .map(|s| Process::new(s.pid, s.arrival, s.service_time))
            .collect()
    }

    /// Resolves algorithm names.
    ///
    /// A bare `"rr"` takes `self.quantum`.
    ///
    /// # Errors
    /// `UnknownAlgorithm` for unrecognized names, `InvalidQuantum` for a
    /// quantum below [`MIN_QUANTUM`].
    pub fn resolve_algorithms(&self) -> Result<Vec<SchedulingAlgorithm>> {
        self.algorithms
            .iter()
            .map(|name| {
                let algorithm = match name.parse::<SchedulingAlgorithm>()? {
                    SchedulingAlgorithm::RoundRobin { .. } if !name.contains(':') => {
                        SchedulingAlgorithm::RoundRobin {
                            quantum: self.quantum,
                        }
                    }
                    other => other,
                };
                if let SchedulingAlgorithm::RoundRobin { quantum } = algorithm {
                    if quantum < MIN_QUANTUM {
                        return Err(SimError::InvalidQuantum {
                            quantum,
                            minimum: MIN_QUANTUM,
                        });
                    }
                }
                Ok(algorithm)
            })
            .collect()
    }

    /// Resolves the placement strategy, if memory is configured.
    pub fn resolve_strategy(&self) -> Result<Option<AllocationStrategy>> {
        self.memory
            .as_ref()
            .map(|m| m.strategy.parse::<AllocationStrategy>())
            .transpose()
    }

    /// Runs every check a caller must make before invoking the engine.
    ///
    /// # Errors
    /// - `Validation` with every workload/request problem found.
    /// - `UnknownAlgorithm`, `InvalidQuantum`, `UnknownStrategy`, `InvalidMemorySize`.
    pub fn validate(&self) -> Result<()> {
        let workload = self.workload();
        let mut errors = validate_workload(workload.processes())
            .err()
            .unwrap_or_default();
        if let Some(memory) = &self.memory {
            errors.extend(validate_requests(&memory.requests).err().unwrap_or_default());
        }
        if !errors.is_empty() {
            return Err(SimError::Validation(errors));
        }

        self.resolve_algorithms()?;
        self.resolve_strategy()?;
        if self.memory.as_ref().is_some_and(|m| m.total_size == 0) {
            return Err(SimError::InvalidMemorySize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn reference() -> SimulationConfig {
        SimulationConfig::new(&Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]))
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let config =
            SimulationConfig::from_json(r#"{ "processes": [{ "pid": 1, "arrival": 0, "burst": 4 }] }"#)
                .unwrap();
        assert_eq!(config.algorithms, vec!["fcfs", "spn", "rr"]);
        assert_eq!(config.quantum, DEFAULT_QUANTUM);
        assert_eq!(config.memory, None);
        assert_eq!(config.processes[0].service_time, 4);
    }

    #[test]
    fn test_memory_strategy_default() {
        let config = SimulationConfig::from_json(
            r#"{ "processes": [], "memory": { "total_size": 64 } }"#,
        )
        .unwrap();
        assert_eq!(
            config.resolve_strategy().unwrap(),
            Some(AllocationStrategy::FirstFit)
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = SimulationConfig::from_json("{ processes: ").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = reference().with_memory(512, "best-fit", vec![MemoryRequest::new(1, 64)]);
        let json = config.to_json().unwrap();
        assert_eq!(SimulationConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_resolve_algorithms_quantum() {
        let config = reference()
            .with_algorithms(["fcfs", "rr", "rr:6"])
            .with_quantum(3);
        assert_eq!(
            config.resolve_algorithms().unwrap(),
            vec![
                SchedulingAlgorithm::Fcfs,
                SchedulingAlgorithm::RoundRobin { quantum: 3 },
                SchedulingAlgorithm::RoundRobin { quantum: 6 },
            ]
        );
    }

    #[test]
    fn test_quantum_below_minimum_rejected() {
        let config = reference().with_algorithms(["rr:1"]);
        assert_eq!(
            config.validate().unwrap_err(),
            SimError::InvalidQuantum {
                quantum: 1,
                minimum: MIN_QUANTUM
            }
        );
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let config = reference().with_memory(100, "worst-fit", vec![]);
        assert!(matches!(
            config.validate().unwrap_err(),
            SimError::UnknownStrategy(_)
        ));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = reference().with_memory(100, "first-fit", vec![MemoryRequest::new(9, 0)]);
        config.processes.push(ProcessSpec {
            pid: 1,
            arrival: 0,
            service_time: 0,
        });
        let SimError::Validation(errors) = config.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        let kinds: Vec<ValidationErrorKind> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicatePid));
        assert!(kinds.contains(&ValidationErrorKind::ZeroServiceTime));
        assert!(kinds.contains(&ValidationErrorKind::ZeroRequestSize));
    }

    #[test]
    fn test_zero_memory_rejected() {
        let config = reference().with_memory(0, "first-fit", vec![]);
        assert_eq!(config.validate().unwrap_err(), SimError::InvalidMemorySize);
    }
}

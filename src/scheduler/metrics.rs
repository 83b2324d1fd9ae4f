//! Schedule metrics.
//!
//! Derives per-process timing and aggregate indicators from a completed
//! schedule. Pure function of the final process records: computing it
//! twice over the same schedule yields identical values.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Response | start - arrival |
//! | Wait | finish - arrival - service |
//! | Turnaround | finish - arrival |
//! | Throughput | processes / latest finish |
//! | CPU Utilization | total service / latest finish |
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::{Process, Schedule};

/// Timing figures for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process id.
    pub pid: u32,
    /// Arrival time.
    pub arrival: u64,
    /// Burst length.
    pub service_time: u64,
    /// First dispatch.
    pub start_time: u64,
    /// Completion.
    pub finish_time: u64,
    /// start - arrival.
    pub response_time: u64,
    /// turnaround - service.
    pub wait_time: u64,
    /// finish - arrival.
    pub turnaround_time: u64,
}

impl ProcessMetrics {
    /// Computes the figures for a completed process.
    ///
    /// # Errors
    /// `IncompleteSchedule` when start or finish is unset;
    /// `InconsistentSchedule` when the times contradict arrival or burst.
    pub fn from_process(process: &Process) -> Result<Self> {
        let pid = process.pid;
        let (Some(start), Some(finish)) = (process.start_time, process.finish_time) else {
            return Err(SimError::IncompleteSchedule { pid });
        };
        if start < process.arrival
            || finish < start
            || finish - process.arrival < process.service_time
        {
            return Err(SimError::InconsistentSchedule { pid });
        }

        let turnaround = finish - process.arrival;
        Ok(Self {
            pid,
            arrival: process.arrival,
            service_time: process.service_time,
            start_time: start,
            finish_time: finish,
            response_time: start - process.arrival,
            wait_time: turnaround - process.service_time,
            turnaround_time: turnaround,
        })
    }
}

/// Aggregate schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Algorithm that produced the schedule.
    pub algorithm: String,
    /// Per-process rows, in workload order.
    pub processes: Vec<ProcessMetrics>,
    /// Mean response time.
    pub avg_response_time: f64,
    /// Mean wait time.
    pub avg_wait_time: f64,
    /// Mean turnaround time.
    pub avg_turnaround_time: f64,
    /// Processes completed per time unit.
    pub throughput: f64,
    /// Latest finish time.
    pub makespan: u64,
    /// Fraction of the makespan the CPU was busy (0.0..1.0).
    pub cpu_utilization: f64,
    /// Longest single wait.
    pub max_wait_time: u64,
}

impl ScheduleMetrics {
    /// Computes metrics from a completed schedule.
    ///
    /// # Errors
    /// - `EmptyWorkload` when the schedule has no processes.
    /// - `InvalidServiceTime` for a zero burst.
    /// - `IncompleteSchedule` / `InconsistentSchedule` from [`ProcessMetrics::from_process`].
    pub fn calculate(schedule: &Schedule) -> Result<Self> {
        if schedule.processes.is_empty() {
            return Err(SimError::EmptyWorkload);
        }

        let mut rows = Vec::with_capacity(schedule.processes.len());
        for process in &schedule.processes {
            if process.service_time == 0 {
                return Err(SimError::InvalidServiceTime { pid: process.pid });
            }
            rows.push(ProcessMetrics::from_process(process)?);
        }

        let n = rows.len() as f64;
        let mean =
            |f: fn(&ProcessMetrics) -> u64| rows.iter().map(|r| f(r) as f64).sum::<f64>() / n;
        let avg_response_time = mean(|r: &ProcessMetrics| r.response_time);
        let avg_wait_time = mean(|r: &ProcessMetrics| r.wait_time);
        let avg_turnaround_time = mean(|r: &ProcessMetrics| r.turnaround_time);

        // Non-zero: every burst is positive.
        let makespan = rows.iter().map(|r| r.finish_time).max().unwrap_or(1).max(1);
        let total_service: f64 = rows.iter().map(|r| r.service_time as f64).sum();
        let max_wait_time = rows.iter().map(|r| r.wait_time).max().unwrap_or(0);

        Ok(Self {
            algorithm: schedule.algorithm.clone(),
            throughput: n / makespan as f64,
            cpu_utilization: total_service / makespan as f64,
            processes: rows,
            avg_response_time,
            avg_wait_time,
            avg_turnaround_time,
            makespan,
            max_wait_time,
        })
    }

    /// Row for the first process carrying `pid`.
    pub fn for_pid(&self, pid: u32) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|r| r.pid == pid)
    }

    /// Number of processes measured.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}

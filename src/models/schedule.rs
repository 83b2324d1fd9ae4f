//! Schedule (simulation result) model.
//!
//! A schedule holds the populated process records produced by one
//! scheduler run, the CPU timeline as execution slices, and the ordered
//! trace of idle/dispatch/preempt/finish events that a reporting layer
//! renders as step-by-step output.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3 (Gantt charts)

use serde::{Deserialize, Serialize};

use super::{Process, ProcessState};

/// A simulated CPU schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Name of the algorithm that produced this schedule.
    pub algorithm: String,
    /// Process records in workload (input) order.
    pub processes: Vec<Process>,
    /// Contiguous CPU executions, in time order.
    pub slices: Vec<ExecutionSlice>,
    /// Trace events, in time order.
    pub events: Vec<TraceEvent>,
}

/// A contiguous interval during which one process held the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSlice {
    /// Process id.
    pub pid: u32,
    /// Position of the process in the workload.
    pub index: usize,
    /// Slice start.
    pub start: u64,
    /// Slice end (exclusive).
    pub end: u64,
}

/// A step of the simulation, emitted in time order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// CPU had nothing ready during `[from, to)`.
    Idle {
        /// Idle period start.
        from: u64,
        /// Idle period end.
        to: u64,
    },
    /// Process received the CPU for up to `slice` units.
    Dispatch {
        /// Process id.
        pid: u32,
        /// Workload position.
        index: usize,
        /// Dispatch time.
        at: u64,
        /// Granted run length.
        slice: u64,
    },
    /// Process lost the CPU with work remaining.
    Preempt {
        /// Process id.
        pid: u32,
        /// Workload position.
        index: usize,
        /// Preemption time.
        at: u64,
        /// CPU time still owed.
        remaining: u64,
    },
    /// Process completed its burst.
    Finish {
        /// Process id.
        pid: u32,
        /// Workload position.
        index: usize,
        /// Completion time.
        at: u64,
    },
}

impl ExecutionSlice {
    /// Slice length.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

impl Schedule {
    /// Creates a schedule over the given (unscheduled) process records.
    pub fn new(algorithm: impl Into<String>, processes: Vec<Process>) -> Self {
        Self {
            algorithm: algorithm.into(),
            processes,
            slices: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Appends a trace event.
    pub fn record(&mut self, event: TraceEvent) {
        tracing::debug!(algorithm = %self.algorithm, ?event, "trace");
        self.events.push(event);
    }

    /// Records CPU idleness from `now` until `until` and returns the new clock.
    pub(crate) fn idle_until(&mut self, now: u64, until: u64) -> u64 {
        if until > now {
            self.record(TraceEvent::Idle {
                from: now,
                to: until,
            });
            until
        } else {
            now
        }
    }

    /// Runs the process at `index` for at most `quantum` units starting at
    /// `now`, recording the dispatch and its outcome. Returns the new clock.
    pub(crate) fn run(&mut self, index: usize, now: u64, quantum: u64) -> u64 {
        let process = &mut self.processes[index];
        let pid = process.pid;
        process.dispatch(now);
        let slice = quantum.min(process.remaining_time);
        let end = process.execute(now, slice);
        let remaining = process.remaining_time;

        self.record(TraceEvent::Dispatch {
            pid,
            index,
            at: now,
            slice,
        });
        self.slices.push(ExecutionSlice {
            pid,
            index,
            start: now,
            end,
        });
        if remaining == 0 {
            self.record(TraceEvent::Finish { pid, index, at: end });
        } else {
            self.record(TraceEvent::Preempt {
                pid,
                index,
                at: end,
                remaining,
            });
        }
        end
    }

    /// Latest finish time (or slice end) across all processes.
    pub fn makespan(&self) -> u64 {
        let finish = self
            .processes
            .iter()
            .filter_map(|p| p.finish_time)
            .max()
            .unwrap_or(0);
        let last_slice = self.slices.iter().map(|s| s.end).max().unwrap_or(0);
        finish.max(last_slice)
    }

    /// Total time the CPU spent executing processes.
    pub fn busy_time(&self) -> u64 {
        self.slices
            .iter()
            .fold(0u64, |total, s| total.saturating_add(s.duration()))
    }

    /// Total time the CPU spent idle before the makespan.
    pub fn idle_time(&self) -> u64 {
        self.makespan().saturating_sub(self.busy_time())
    }

    /// Busy time over makespan. `None` for an empty timeline.
    pub fn cpu_utilization(&self) -> Option<f64> {
        let makespan = self.makespan();
        if makespan == 0 {
            return None;
        }
        Some(self.busy_time() as f64 / makespan as f64)
    }

    /// Slices belonging to the process at workload position `index`.
    pub fn slices_for_index(&self, index: usize) -> Vec<&ExecutionSlice> {
        self.slices.iter().filter(|s| s.index == index).collect()
    }

    /// State of the process at workload position `index` at `time`.
    pub fn state_at(&self, index: usize, time: u64) -> Option<ProcessState> {
        let process = self.processes.get(index)?;
        let running = self
            .slices
            .iter()
            .any(|s| s.index == index && s.start <= time && time < s.end);
        Some(if running {
            ProcessState::Running
        } else {
            process.state_at(time)
        })
    }

    /// First process record carrying `pid`.
    pub fn process_by_pid(&self, pid: u32) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    /// Pids in the order they received the CPU (repeats for preempted processes).
    pub fn dispatch_order(&self) -> Vec<u32> {
        self.slices.iter().map(|s| s.pid).collect()
    }

    /// Pids in the order they completed.
    pub fn completion_order(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Finish { pid, .. } => Some(*pid),
                _ => None,
            })
            .collect()
    }

    /// Start times in workload order (`None` if unset).
    pub fn start_times(&self) -> Vec<Option<u64>> {
        self.processes.iter().map(|p| p.start_time).collect()
    }

    /// Finish times in workload order (`None` if unset).
    pub fn finish_times(&self) -> Vec<Option<u64>> {
        self.processes.iter().map(|p| p.finish_time).collect()
    }

    /// First process lacking a start or finish time.
    pub fn first_incomplete(&self) -> Option<&Process> {
        self.processes
            .iter()
            .find(|p| p.start_time.is_none() || p.finish_time.is_none())
    }

    /// Whether every process ran to completion.
    pub fn is_complete(&self) -> bool {
        self.first_incomplete().is_none()
    }

    /// Number of processes.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}

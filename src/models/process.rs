//! Process record (PCB) model.
//!
//! A process is the unit of CPU work in a workload. It carries an
//! immutable description (pid, arrival, burst) and the mutable fields a
//! scheduler fills in while simulating it.
//!
//! # Time Representation
//! All times are abstract integer time units relative to t=0.
//! Unset start/finish times are `None`.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 3.1

use serde::{Deserialize, Serialize};

/// Lifecycle state of a simulated process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Arrival time not yet reached.
    #[default]
    NotArrived,
    /// Waiting for the CPU.
    Ready,
    /// Holding the CPU.
    Running,
    /// Entire burst executed.
    Finished,
}

/// A process record.
///
/// `start_time` is set exactly once, at first dispatch. `finish_time` is set
/// exactly once, when `remaining_time` reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Caller-supplied identifier. Not required to be unique or contiguous.
    pub pid: u32,
    /// Time at which the process becomes eligible to run.
    pub arrival: u64,
    /// Total CPU time required (burst).
    pub service_time: u64,
    /// CPU time still owed.
    pub remaining_time: u64,
    /// First dispatch time.
    pub start_time: Option<u64>,
    /// Completion time.
    pub finish_time: Option<u64>,
    /// Whether the process has been dispatched at least once.
    pub started: bool,
    /// Current lifecycle state.
    pub state: ProcessState,
}

impl Process {
    /// Creates an unscheduled process.
    pub fn new(pid: u32, arrival: u64, service_time: u64) -> Self {
        Self {
            pid,
            arrival,
            service_time,
            remaining_time: service_time,
            start_time: None,
            finish_time: None,
            started: false,
            state: ProcessState::NotArrived,
        }
    }

    /// Whether the process has arrived by `time`.
    #[inline]
    pub fn has_arrived(&self, time: u64) -> bool {
        self.arrival <= time
    }

    /// Whether the whole burst has executed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == ProcessState::Finished
    }

    /// State at `time` as seen from the recorded timing.
    ///
    /// Does not report `Running`; that needs the CPU timeline, see
    /// [`Schedule::state_at`](crate::models::Schedule::state_at).
    pub fn state_at(&self, time: u64) -> ProcessState {
        match self.finish_time {
            Some(finish) if finish <= time => ProcessState::Finished,
            _ if !self.has_arrived(time) => ProcessState::NotArrived,
            _ => ProcessState::Ready,
        }
    }

    /// Time from arrival to first dispatch.
    pub fn response_time(&self) -> Option<u64> {
        self.start_time.map(|start| start.saturating_sub(self.arrival))
    }

    /// Time spent ready but not running.
    pub fn wait_time(&self) -> Option<u64> {
        self.turnaround_time()
            .map(|turnaround| turnaround.saturating_sub(self.service_time))
    }

    /// Time from arrival to completion.
    pub fn turnaround_time(&self) -> Option<u64> {
        self.finish_time
            .map(|finish| finish.saturating_sub(self.arrival))
    }

    /// Marks the process ready to run.
    pub(crate) fn admit(&mut self) {
        if self.state == ProcessState::NotArrived {
            self.state = ProcessState::Ready;
        }
    }

    /// Hands the CPU to the process. Records the start time on the first
    /// dispatch only.
    pub(crate) fn dispatch(&mut self, now: u64) {
        self.state = ProcessState::Running;
        if !self.started {
            self.started = true;
            self.start_time = Some(now);
        }
    }

    /// Runs the process for `slice` time units and returns the new clock.
    ///
    /// Transitions to `Finished` when nothing remains, otherwise back to `Ready`.
    pub(crate) fn execute(&mut self, now: u64, slice: u64) -> u64 {
        let slice = slice.min(self.remaining_time);
        // Schedulers check up front that max arrival + total burst fits in u64.
        let end = now.saturating_add(slice);
        self.remaining_time -= slice;
        if self.remaining_time == 0 {
            self.finish_time = Some(end);
            self.state = ProcessState::Finished;
        } else {
            self.state = ProcessState::Ready;
        }
        end
    }
}

//! Round Robin scheduler.
//!
//! # Algorithm
//!
//! Each tick of the loop:
//! 1. Scan processes by workload index and enqueue every one that has
//!    arrived, is unfinished and is not already queued.
//! 2. If the queue is empty, the CPU idles until the next arrival.
//! 3. Dequeue the head and run it for `min(quantum, remaining)`.
//! 4. A finished process leaves the system. A preempted one is not
//!    re-queued directly: the next scan admits it again, in index order,
//!    together with anything that arrived during its slice.
//!
//! So a process arriving during (or exactly at the end of) a slice is
//! queued ahead of the preempted process only if its index is lower.
//! This differs from the common textbook variant that re-queues the
//! preempted process immediately, ahead of every arrival of its slice.
//!
//! Admission is by index, not by arrival. On a workload not sorted by
//! arrival, a quantum longer than every burst does not reproduce FCFS:
//! processes that arrive while the CPU is busy are queued in index order.

use std::collections::VecDeque;

use super::{log_completion, next_arrival, prepare, CpuScheduler};
use crate::config::MIN_QUANTUM;
use crate::error::{Result, SimError};
use crate::models::{Schedule, Workload};

/// Preemptive Round Robin scheduler.
///
/// # Example
///
/// ```
/// use u_ossim::models::Workload;
/// use u_ossim::scheduler::{CpuScheduler, RoundRobin};
///
/// let workload = Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]);
/// let schedule = RoundRobin::new(4).unwrap().schedule(&workload).unwrap();
/// assert_eq!(schedule.finish_times(), vec![Some(20), Some(21), Some(25)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: u64,
}

impl RoundRobin {
    /// Creates a scheduler with the given quantum.
    ///
    /// # Errors
    /// `InvalidQuantum` if `quantum` is zero.
    pub fn new(quantum: u64) -> Result<Self> {
        Self::with_minimum(quantum, 1)
    }

    /// Creates a scheduler enforcing the caller-level minimum quantum
    /// ([`MIN_QUANTUM`]).
    pub fn strict(quantum: u64) -> Result<Self> {
        Self::with_minimum(quantum, MIN_QUANTUM)
    }

    fn with_minimum(quantum: u64, minimum: u64) -> Result<Self> {
        if quantum < minimum {
            return Err(SimError::InvalidQuantum { quantum, minimum });
        }
        Ok(Self { quantum })
    }

    /// Time slice granted per dispatch.
    pub fn quantum(&self) -> u64 {
        self.quantum
    }
}

impl CpuScheduler for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn schedule(&self, workload: &Workload) -> Result<Schedule> {
        let mut schedule = prepare(self.name(), workload)?;
        let n = schedule.processes.len();

        let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
        let mut queued = vec![false; n];
        let mut finished = 0;
        let mut now = 0;

        while finished < n {
            for (i, p) in schedule.processes.iter_mut().enumerate() {
                if !queued[i] && !p.is_finished() && p.has_arrived(now) {
                    p.admit();
                    queue.push_back(i);
                    queued[i] = true;
                }
            }

            let Some(index) = queue.pop_front() else {
                let next = next_arrival(&schedule.processes, now).unwrap_or(now.saturating_add(1));
                now = schedule.idle_until(now, next);
                continue;
            };
            queued[index] = false;

            now = schedule.run(index, now, self.quantum);
            if schedule.processes[index].is_finished() {
                finished += 1;
            }
        }

        log_completion(&schedule);
        Ok(schedule)
    }

    fn description(&self) -> &'static str {
        "Round Robin"
    }
}

//! First-Come-First-Served scheduler.
//!
//! # Algorithm
//!
//! 1. Stable-sort processes by arrival (ties keep input order).
//! 2. Walk the sorted list with a clock starting at 0.
//! 3. If the clock is behind the next arrival, the CPU idles until it.
//! 4. Run each process for its full burst.
//!
//! # Complexity
//! O(n log n)

use super::{log_completion, prepare, CpuScheduler};
use crate::error::Result;
use crate::models::{Schedule, Workload};

/// Non-preemptive First-Come-First-Served scheduler.
///
/// # Example
///
/// ```
/// use u_ossim::models::Workload;
/// use u_ossim::scheduler::{CpuScheduler, Fcfs};
///
/// let workload = Workload::from_triples(&[(1, 0, 12), (2, 1, 5), (3, 2, 8)]);
/// let schedule = Fcfs.schedule(&workload).unwrap();
/// assert_eq!(schedule.finish_times(), vec![Some(12), Some(17), Some(25)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl CpuScheduler for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn schedule(&self, workload: &Workload) -> Result<Schedule> {
        let mut schedule = prepare(self.name(), workload)?;

        let mut order: Vec<usize> = (0..schedule.processes.len()).collect();
        order.sort_by_key(|&i| schedule.processes[i].arrival);

        let mut now = 0;
        for index in order {
            let (arrival, burst) = {
                let p = &schedule.processes[index];
                (p.arrival, p.service_time)
            };
            now = schedule.idle_until(now, arrival);
            schedule.processes[index].admit();
            now = schedule.run(index, now, burst);
        }

        log_completion(&schedule);
        Ok(schedule)
    }

    fn description(&self) -> &'static str {
        "First-Come-First-Served"
    }
}

//! Shortest-Process-Next scheduler.
//!
//! # Algorithm
//!
//! 1. Admit every unfinished process that has arrived into the ready set
//!    (scan in input order).
//! 2. If the ready set is empty, the CPU idles until the next arrival.
//! 3. Pick the ready process with the smallest burst; ties go to the
//!    earlier arrival, then to input order.
//! 4. Run it for its whole burst.
//!
//! The choice is committed at the decision point: a shorter process that
//! arrives while another is running waits for it to finish. With
//! `[(1, 0, 10), (2, 1, 2)]` pid 1 runs first even though pid 2 is shorter.
//!
//! # Complexity
//! O(n²)

use super::{log_completion, next_arrival, prepare, CpuScheduler};
use crate::error::Result;
use crate::models::{Schedule, Workload};

/// Non-preemptive Shortest-Process-Next scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spn;

impl CpuScheduler for Spn {
    fn name(&self) -> &'static str {
        "SPN"
    }

    fn schedule(&self, workload: &Workload) -> Result<Schedule> {
        let mut schedule = prepare(self.name(), workload)?;
        let n = schedule.processes.len();

        let mut ready: Vec<usize> = Vec::with_capacity(n);
        let mut queued = vec![false; n];
        let mut completed = 0;
        let mut now = 0;

        while completed < n {
            for (i, p) in schedule.processes.iter_mut().enumerate() {
                if !queued[i] && !p.is_finished() && p.has_arrived(now) {
                    p.admit();
                    ready.push(i);
                    queued[i] = true;
                }
            }

            let selected = ready
                .iter()
                .enumerate()
                .min_by_key(|&(_, &i)| {
                    let p = &schedule.processes[i];
                    (p.service_time, p.arrival, i)
                })
                .map(|(pos, _)| pos);

            let Some(pos) = selected else {
                let next = next_arrival(&schedule.processes, now).unwrap_or(now.saturating_add(1));
                now = schedule.idle_until(now, next);
                continue;
            };

            let index = ready.remove(pos);
            let burst = schedule.processes[index].remaining_time;
            now = schedule.run(index, now, burst);
            completed += 1;
        }

        log_completion(&schedule);
        Ok(schedule)
    }

    fn description(&self) -> &'static str {
        "Shortest-Process-Next"
    }
}

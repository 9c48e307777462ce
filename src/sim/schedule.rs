//! Deterministic millisecond scheduler
//!
//! Replaces wall-clock interval timers. Timers due at the same instant fire in
//! registration order, so a run is fully reproducible from its inputs.

/// Handle to a registered timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<J> {
    id: TimerId,
    due_ms: u64,
    /// Some = repeating interval
    period_ms: Option<u64>,
    job: J,
}

/// Periodic and one-shot timers over a simulated clock
#[derive(Debug, Clone)]
pub struct Scheduler<J> {
    now_ms: u64,
    timers: Vec<Timer<J>>,
    next_id: u64,
}

impl<J: Clone> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: Clone> Scheduler<J> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            timers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Repeat `job` every `period_ms`, first firing one period from now
    pub fn every(&mut self, period_ms: u64, job: J) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(self.now_ms + period_ms, Some(period_ms), job)
    }

    /// Run `job` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, job: J) -> TimerId {
        self.insert(self.now_ms + delay_ms, None, job)
    }

    fn insert(&mut self, due_ms: u64, period_ms: Option<u64>, job: J) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms,
            period_ms,
            job,
        });
        id
    }

    /// Cancel a timer. Unknown, fired or already-cancelled handles are a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the next job due at or before `until_ms`, moving the clock to its
    /// due time. Periodic timers are re-armed.
    pub fn next_due(&mut self, until_ms: u64) -> Option<J> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(idx, _)| idx)?;

        let timer = &mut self.timers[idx];
        self.now_ms = self.now_ms.max(timer.due_ms);
        let job = timer.job.clone();
        let period_ms = timer.period_ms;
        match period_ms {
            Some(period) => self.timers[idx].due_ms += period,
            None => {
                self.timers.remove(idx);
            }
        }
        Some(job)
    }

    /// Move the clock forward once every due job up to `until_ms` ran
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        while let Some(job) = scheduler.next_due(until) {
            fired.push((scheduler.now_ms(), job));
        }
        scheduler.settle(until);
        fired
    }

    #[test]
    fn test_intervals_fire_in_time_then_registration_order() {
        let mut scheduler = Scheduler::new();
        scheduler.every(50, "slow");
        scheduler.every(25, "fast");

        let fired = drain(&mut scheduler, 100);
        assert_eq!(
            fired,
            vec![
                (25, "fast"),
                (50, "slow"),
                (50, "fast"),
                (75, "fast"),
                (100, "slow"),
                (100, "fast"),
            ]
        );
        assert_eq!(scheduler.now_ms(), 100);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.settle(40);
        scheduler.after(500, "boom");

        assert!(drain(&mut scheduler, 539).is_empty());
        assert_eq!(drain(&mut scheduler, 540), vec![(540, "boom")]);
        assert!(drain(&mut scheduler, 2000).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.after(10, "boom");
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(drain(&mut scheduler, 100).is_empty());

        let fired = scheduler.after(10, "late");
        drain(&mut scheduler, 200);
        assert!(!scheduler.cancel(fired));
    }

    #[test]
    fn test_cancelled_interval_stops_repeating() {
        let mut scheduler = Scheduler::new();
        let tick = scheduler.every(10, "tick");
        scheduler.after(15, "boom");
        assert_eq!(drain(&mut scheduler, 10), vec![(10, "tick")]);
        assert!(scheduler.cancel(tick));
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(drain(&mut scheduler, 1000), vec![(15, "boom")]);
        assert_eq!(scheduler.pending(), 0);
    }
}

//! Periodic-callback capability. A tracker registers callbacks here and the
//! host hands fired ids back through the tracker's `on_tick`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clock::{Clock, ManualClock};

/// Handle for one scheduler registration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TickId(u64);

impl TickId {
    pub fn from_raw(raw: u64) -> Self {
        TickId(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Fire `id` every `interval_ms` until cancelled.
    fn every(&mut self, interval_ms: u64) -> TickId;
    /// Fire `id` once after `delay_ms`.
    fn after(&mut self, delay_ms: u64) -> TickId;
    /// Cancelling an unknown or already fired id does nothing.
    fn cancel(&mut self, id: TickId);
}

struct Registration {
    id: TickId,
    due_ms: u64,
    interval_ms: Option<u64>,
}

struct ManualInner {
    clock: ManualClock,
    next_id: u64,
    live: Vec<Registration>,
}

impl ManualInner {
    fn register(&mut self, delay_ms: u64, interval_ms: Option<u64>) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        self.live.push(Registration {
            id,
            due_ms: self.clock.now_ms() + delay_ms,
            interval_ms,
        });
        id
    }
}

/// Deterministic scheduler for tests. Nothing fires on its own; callers pull
/// due ids with [`ManualScheduler::next_due`], which moves the shared clock
/// forward to each firing time.
#[derive(Clone)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    pub fn new(clock: &ManualClock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner {
                clock: clock.clone(),
                next_id: 0,
                live: Vec::new(),
            })),
        }
    }

    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_live(&self, id: TickId) -> bool {
        self.inner.borrow().live.iter().any(|r| r.id == id)
    }

    /// Earliest registration due at or before `until_ms`. The clock is set
    /// to its due time, recurring registrations are re-armed and one-shots
    /// are dropped.
    pub fn next_due(&self, until_ms: u64) -> Option<TickId> {
        let mut inner = self.inner.borrow_mut();
        let idx = inner
            .live
            .iter()
            .enumerate()
            .filter(|(_, r)| r.due_ms <= until_ms)
            .min_by_key(|(_, r)| r.due_ms)
            .map(|(i, _)| i)?;

        let due = inner.live[idx].due_ms;
        let now = inner.clock.now_ms();
        inner.clock.set(due.max(now));

        let id = inner.live[idx].id;
        match inner.live[idx].interval_ms {
            Some(interval) => inner.live[idx].due_ms += interval,
            None => {
                inner.live.remove(idx);
            }
        }
        Some(id)
    }
}

impl Scheduler for ManualScheduler {
    fn every(&mut self, interval_ms: u64) -> TickId {
        self.inner.borrow_mut().register(interval_ms, Some(interval_ms))
    }

    fn after(&mut self, delay_ms: u64) -> TickId {
        self.inner.borrow_mut().register(delay_ms, None)
    }

    fn cancel(&mut self, id: TickId) {
        self.inner.borrow_mut().live.retain(|r| r.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurring_fires_on_cadence() {
        let clock = ManualClock::new(0);
        let mut sched = ManualScheduler::new(&clock);
        let id = sched.every(1000);

        assert_eq!(sched.next_due(999), None);
        assert_eq!(sched.next_due(3000), Some(id));
        assert_eq!(clock.now_ms(), 1000);
        assert_eq!(sched.next_due(3000), Some(id));
        assert_eq!(sched.next_due(3000), Some(id));
        assert_eq!(clock.now_ms(), 3000);
        assert_eq!(sched.next_due(3000), None);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let clock = ManualClock::new(500);
        let mut sched = ManualScheduler::new(&clock);
        let id = sched.after(100);

        assert_eq!(sched.next_due(10_000), Some(id));
        assert_eq!(clock.now_ms(), 600);
        assert_eq!(sched.next_due(10_000), None);
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_cancel_removes_registration() {
        let clock = ManualClock::new(0);
        let mut sched = ManualScheduler::new(&clock);
        let a = sched.every(10);
        let b = sched.every(25);
        sched.cancel(a);
        sched.cancel(a);

        assert!(!sched.is_live(a));
        assert_eq!(sched.next_due(100), Some(b));
        assert_eq!(clock.now_ms(), 25);
    }

    #[test]
    fn test_earliest_registration_wins() {
        let clock = ManualClock::new(0);
        let mut sched = ManualScheduler::new(&clock);
        sched.every(1000);
        let fast = sched.every(10);

        assert_eq!(sched.next_due(1000), Some(fast));
        clock.set(995);
        // Overdue registrations fire without moving the clock backwards.
        assert_eq!(sched.next_due(1000), Some(fast));
        assert_eq!(clock.now_ms(), 995);
    }
}

//! Background pump: owns every live tick registration and posts a
//! `Pump(id)` event to the main loop whenever one comes due.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use timer_core::{Scheduler, TickId};

use crate::app::AppEvent;

#[derive(Debug)]
pub enum PumpControl {
    Start {
        id: TickId,
        delay_ms: u64,
        repeat: bool,
    },
    Stop(TickId),
    Quit,
}

/// Main-thread handle to the pump. Clones share one id counter so ids stay
/// unique across every tracker using the pump.
#[derive(Clone)]
pub struct PumpScheduler {
    control: Sender<PumpControl>,
    next_id: Rc<Cell<u64>>,
}

impl PumpScheduler {
    fn register(&mut self, delay_ms: u64, repeat: bool) -> TickId {
        let id = TickId::from_raw(self.next_id.get() + 1);
        self.next_id.set(id.raw());
        self.control
            .send(PumpControl::Start { id, delay_ms, repeat })
            .ok();
        id
    }

    pub fn quit(&self) {
        self.control.send(PumpControl::Quit).ok();
    }
}

impl Scheduler for PumpScheduler {
    fn every(&mut self, interval_ms: u64) -> TickId {
        self.register(interval_ms, true)
    }

    fn after(&mut self, delay_ms: u64) -> TickId {
        self.register(delay_ms, false)
    }

    fn cancel(&mut self, id: TickId) {
        self.control.send(PumpControl::Stop(id)).ok();
    }
}

pub fn spawn_pump(events: Sender<AppEvent>) -> (PumpScheduler, JoinHandle<()>) {
    let (control, rx) = mpsc::channel();
    let handle = thread::spawn(move || pump_thread(rx, events));
    let scheduler = PumpScheduler {
        control,
        next_id: Rc::new(Cell::new(0)),
    };
    (scheduler, handle)
}

struct Registration {
    id: TickId,
    due: Instant,
    interval: Option<Duration>,
}

fn pump_thread(control: Receiver<PumpControl>, events: Sender<AppEvent>) {
    let mut live: Vec<Registration> = Vec::new();

    loop {
        let now = Instant::now();
        let mut i = 0;
        while i < live.len() {
            if live[i].due > now {
                i += 1;
                continue;
            }
            if events.send(AppEvent::Pump(live[i].id)).is_err() {
                return;
            }
            match live[i].interval {
                // Anchored to the previous due time so sleep overshoot does
                // not accumulate.
                Some(interval) => {
                    live[i].due += interval;
                    i += 1;
                }
                None => {
                    live.remove(i);
                }
            }
        }

        let next_due = live.iter().map(|r| r.due).min();
        let msg = match next_due {
            Some(due) => control.recv_timeout(due.saturating_duration_since(Instant::now())),
            None => control.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match msg {
            Ok(PumpControl::Start { id, delay_ms, repeat }) => {
                log::trace!("pump: start {:?} every {}ms repeat={}", id, delay_ms, repeat);
                let delay = Duration::from_millis(delay_ms);
                live.push(Registration {
                    id,
                    due: Instant::now() + delay,
                    interval: repeat.then_some(delay),
                });
            }
            Ok(PumpControl::Stop(id)) => {
                log::trace!("pump: stop {:?}", id);
                live.retain(|r| r.id != id);
            }
            Ok(PumpControl::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
    log::debug!("pump: exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    fn next_pump(rx: &Receiver<AppEvent>) -> TickId {
        match rx.recv_timeout(WAIT) {
            Ok(AppEvent::Pump(id)) => id,
            other => panic!("expected a pump event, got {:?}", other),
        }
    }

    #[test]
    fn test_recurring_keeps_firing() {
        let (tx, rx) = mpsc::channel();
        let (mut sched, handle) = spawn_pump(tx);
        let id = sched.every(5);
        for _ in 0..3 {
            assert_eq!(next_pump(&rx), id);
        }
        sched.quit();
        handle.join().unwrap();
    }

    #[test]
    fn test_one_shot_and_cancel() {
        let (tx, rx) = mpsc::channel();
        let (mut sched, handle) = spawn_pump(tx);
        let ticker = sched.every(5);
        assert_eq!(next_pump(&rx), ticker);
        sched.cancel(ticker);

        // Control messages are handled in order, so once the marker fires
        // the cancel has taken effect.
        let marker = sched.after(1);
        while next_pump(&rx) != marker {}
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_iter().all(|e| !matches!(e, AppEvent::Pump(id) if id == ticker)));

        sched.quit();
        handle.join().unwrap();
    }

    #[test]
    fn test_ids_unique_across_clones() {
        let (tx, _rx) = mpsc::channel();
        let (mut a, handle) = spawn_pump(tx);
        let mut b = a.clone();
        let first = a.after(10_000);
        let second = b.after(10_000);
        assert_ne!(first, second);
        a.quit();
        handle.join().unwrap();
    }
}

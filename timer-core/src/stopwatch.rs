//! Elapsed-time tracker.
//!
//! Elapsed time is always derived from two clock readings, never from
//! counting ticks, so late or dropped ticks only delay the display.

use crate::clock::Clock;
use crate::format::{format_hms_cs, Hmsc};
use crate::schedule::{Scheduler, TickId};
use crate::{Outcome, TimerState};

/// Display refresh cadence while running.
pub const STOPWATCH_TICK_MS: u64 = 10;

pub trait StopwatchSink {
    fn show_elapsed(&mut self, elapsed: Hmsc);
    /// Full lap list, newest first.
    fn show_laps(&mut self, laps: &[Lap]);
    fn state_changed(&mut self, _state: TimerState) {}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    pub number: u32,
    pub elapsed_ms: u64,
}

impl Lap {
    pub fn label(&self) -> String {
        format!("Lap {}", self.number)
    }

    pub fn time(&self) -> String {
        format_hms_cs(self.elapsed_ms)
    }
}

pub struct Stopwatch<C, S, D> {
    clock: C,
    scheduler: S,
    sink: D,
    state: TimerState,
    start_epoch_ms: u64,
    accumulated_ms: u64,
    laps: Vec<Lap>,
    next_lap: u32,
    ticker: Option<TickId>,
}

impl<C: Clock, S: Scheduler, D: StopwatchSink> Stopwatch<C, S, D> {
    pub fn new(clock: C, scheduler: S, sink: D) -> Self {
        Self {
            clock,
            scheduler,
            sink,
            state: TimerState::Idle,
            start_epoch_ms: 0,
            accumulated_ms: 0,
            laps: Vec::new(),
            next_lap: 1,
            ticker: None,
        }
    }

    /// Start from idle or resume from pause, continuing from the banked time.
    pub fn start(&mut self) -> Outcome {
        if self.state == TimerState::Running {
            log::debug!("stopwatch: start ignored, already running");
            return Outcome::Ignored;
        }
        self.start_epoch_ms = self.clock.now_ms().saturating_sub(self.accumulated_ms);
        self.stop_ticker();
        self.ticker = Some(self.scheduler.every(STOPWATCH_TICK_MS));
        self.set_state(TimerState::Running);
        Outcome::Applied
    }

    pub fn pause(&mut self) -> Outcome {
        if self.state != TimerState::Running {
            log::debug!("stopwatch: pause ignored while {:?}", self.state);
            return Outcome::Ignored;
        }
        self.stop_ticker();
        self.accumulated_ms = self.clock.now_ms().saturating_sub(self.start_epoch_ms);
        self.set_state(TimerState::Paused);
        self.sink.show_elapsed(Hmsc::from_ms(self.accumulated_ms));
        Outcome::Applied
    }

    pub fn reset(&mut self) -> Outcome {
        self.stop_ticker();
        self.start_epoch_ms = 0;
        self.accumulated_ms = 0;
        self.laps.clear();
        self.next_lap = 1;
        self.set_state(TimerState::Idle);
        self.sink.show_elapsed(Hmsc::default());
        self.sink.show_laps(&self.laps);
        Outcome::Applied
    }

    /// Snapshot the running time as a new lap at the front of the list.
    pub fn record_lap(&mut self) -> Outcome {
        if self.state != TimerState::Running {
            log::debug!("stopwatch: lap ignored while {:?}", self.state);
            return Outcome::Ignored;
        }
        let lap = Lap {
            number: self.next_lap,
            elapsed_ms: self.current_elapsed(),
        };
        self.next_lap += 1;
        self.laps.insert(0, lap);
        self.sink.show_laps(&self.laps);
        Outcome::Applied
    }

    pub fn current_elapsed(&self) -> u64 {
        match self.state {
            TimerState::Running => self.clock.now_ms().saturating_sub(self.start_epoch_ms),
            _ => self.accumulated_ms,
        }
    }

    /// Called by the host when a scheduler registration fires. Ids this
    /// stopwatch no longer owns are dropped.
    pub fn on_tick(&mut self, id: TickId) -> Outcome {
        if self.ticker != Some(id) || self.state != TimerState::Running {
            return Outcome::Ignored;
        }
        self.sink.show_elapsed(Hmsc::from_ms(self.current_elapsed()));
        Outcome::Applied
    }

    pub fn owns_tick(&self, id: TickId) -> bool {
        self.ticker == Some(id)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Banked time from finished running intervals.
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn start_stop_label(&self) -> &'static str {
        match self.state {
            TimerState::Running => "Pause",
            _ => "Start",
        }
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    fn stop_ticker(&mut self) {
        if let Some(id) = self.ticker.take() {
            self.scheduler.cancel(id);
        }
    }

    fn set_state(&mut self, state: TimerState) {
        self.state = state;
        self.sink.state_changed(state);
    }
}

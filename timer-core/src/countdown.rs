//! Countdown tracker: counts whole seconds down from a duration read off the
//! input form, then signals completion once.

use crate::format::Hms;
use crate::schedule::{Scheduler, TickId};
use crate::{Outcome, TimerState};

pub const COUNTDOWN_TICK_MS: u64 = 1000;
/// Gap between the completion cue and the acknowledgment request, so the
/// cue is already playing when the acknowledgment blocks.
pub const EXPIRY_ACK_DELAY_MS: u64 = 100;

pub trait CountdownSink {
    fn show_remaining(&mut self, remaining: Hms);
    fn state_changed(&mut self, _state: TimerState) {}
    /// Countdown hit zero. Start the audible/visual cue.
    fn time_up(&mut self);
    /// Blocking acknowledgment, requested shortly after `time_up`.
    fn acknowledge(&mut self);
}

/// Source of the hours/minutes/seconds the user entered, read on demand.
pub trait DurationInput {
    fn read_hms(&self) -> (i64, i64, i64);

    fn total_seconds(&self) -> i64 {
        let (h, m, s) = self.read_hms();
        h.saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(s)
    }
}

/// Raw text of the three duration fields.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DurationFields {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl DurationFields {
    pub fn new(
        hours: impl Into<String>,
        minutes: impl Into<String>,
        seconds: impl Into<String>,
    ) -> Self {
        Self {
            hours: hours.into(),
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }
}

impl DurationInput for DurationFields {
    fn read_hms(&self) -> (i64, i64, i64) {
        (
            parse_field(&self.hours),
            parse_field(&self.minutes),
            parse_field(&self.seconds),
        )
    }
}

/// Leading integer of `text`, or 0 when there is none. Leading whitespace
/// and a sign are accepted; parsing stops at the first non-digit.
pub fn parse_field(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

pub struct Countdown<S, D> {
    scheduler: S,
    sink: D,
    state: TimerState,
    remaining_seconds: u64,
    configured_seconds: u64,
    has_session: bool,
    ticker: Option<TickId>,
    pending_ack: Option<TickId>,
}

impl<S: Scheduler, D: CountdownSink> Countdown<S, D> {
    pub fn new(scheduler: S, sink: D) -> Self {
        Self {
            scheduler,
            sink,
            state: TimerState::Idle,
            remaining_seconds: 0,
            configured_seconds: 0,
            has_session: false,
            ticker: None,
            pending_ack: None,
        }
    }

    /// Resume a paused session, or begin a new one from `input`. A new
    /// session with a total of zero or less does not start.
    pub fn start(&mut self, input: &impl DurationInput) -> Outcome {
        match self.state {
            TimerState::Running | TimerState::Expired => {
                log::debug!("countdown: start ignored while {:?}", self.state);
                return Outcome::Ignored;
            }
            TimerState::Idle | TimerState::Paused => {}
        }

        if !self.has_session {
            let total = input.total_seconds();
            if total <= 0 {
                log::debug!("countdown: refusing to start with total {}s", total);
                self.remaining_seconds = 0;
                return Outcome::Ignored;
            }
            self.remaining_seconds = total as u64;
            self.configured_seconds = self.remaining_seconds;
            self.has_session = true;
            log::info!("countdown: new session of {}s", self.configured_seconds);
        }

        self.stop_ticker();
        self.ticker = Some(self.scheduler.every(COUNTDOWN_TICK_MS));
        self.set_state(TimerState::Running);
        self.sink.show_remaining(Hms::from_secs(self.remaining_seconds));
        Outcome::Applied
    }

    pub fn pause(&mut self) -> Outcome {
        if self.state != TimerState::Running {
            log::debug!("countdown: pause ignored while {:?}", self.state);
            return Outcome::Ignored;
        }
        self.stop_ticker();
        self.set_state(TimerState::Paused);
        Outcome::Applied
    }

    /// Back to idle from any state. The input form is left untouched so the
    /// same duration can be started again.
    pub fn reset(&mut self) -> Outcome {
        if let Some(id) = self.pending_ack.take() {
            self.scheduler.cancel(id);
        }
        self.go_idle();
        Outcome::Applied
    }

    /// Called by the host when a scheduler registration fires.
    pub fn on_tick(&mut self, id: TickId) -> Outcome {
        if self.pending_ack == Some(id) {
            self.pending_ack = None;
            self.sink.acknowledge();
            self.go_idle();
            return Outcome::Applied;
        }
        if self.ticker != Some(id) || self.state != TimerState::Running {
            return Outcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.sink.show_remaining(Hms::from_secs(self.remaining_seconds));
        if self.remaining_seconds == 0 {
            self.expire();
        }
        Outcome::Applied
    }

    pub fn owns_tick(&self, id: TickId) -> bool {
        self.ticker == Some(id) || self.pending_ack == Some(id)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Duration of the most recently started session.
    pub fn configured_seconds(&self) -> u64 {
        self.configured_seconds
    }

    pub fn start_stop_label(&self) -> &'static str {
        match self.state {
            TimerState::Running => "Pause",
            TimerState::Paused => "Resume",
            _ => "Start",
        }
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    fn expire(&mut self) {
        self.stop_ticker();
        self.has_session = false;
        self.set_state(TimerState::Expired);
        log::info!("countdown: time up after {}s", self.configured_seconds);
        self.sink.time_up();
        self.pending_ack = Some(self.scheduler.after(EXPIRY_ACK_DELAY_MS));
    }

    fn go_idle(&mut self) {
        self.stop_ticker();
        self.remaining_seconds = 0;
        self.has_session = false;
        self.set_state(TimerState::Idle);
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

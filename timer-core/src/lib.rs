//! Pure timing logic library with no platform dependencies.
//! Testable on host with a manual clock and scheduler, driven by a real
//! pump thread in the terminal app.

pub mod clock;
pub mod countdown;
pub mod format;
pub mod schedule;
pub mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{
    Countdown, CountdownSink, DurationFields, DurationInput, COUNTDOWN_TICK_MS,
    EXPIRY_ACK_DELAY_MS,
};
pub use format::{format_hms, format_hms_cs, pad2, Hms, Hmsc};
pub use schedule::{ManualScheduler, Scheduler, TickId};
pub use stopwatch::{Lap, Stopwatch, StopwatchSink, STOPWATCH_TICK_MS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    /// Never started, or reset.
    Idle,
    Running,
    Paused,
    /// Countdown reached zero and is waiting for the acknowledgment.
    Expired,
}

/// Result of a tracker command. Commands issued from the wrong state are
/// ignored rather than reported as errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Applied,
    Ignored,
}

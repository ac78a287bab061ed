//! Time decomposition and display formatting, kept apart from the trackers
//! so the arithmetic can be checked without any sink.

use std::fmt;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;
const MS_PER_CENTI: u64 = 10;

/// Zero-pad to at least two digits. Larger values are never truncated.
pub fn pad2(n: u64) -> String {
    format!("{:02}", n)
}

/// Elapsed milliseconds split into display fields.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Hmsc {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub centis: u64,
}

impl Hmsc {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
            centis: (ms % MS_PER_SECOND) / MS_PER_CENTI,
        }
    }

    /// Milliseconds represented by the fields (floored to 10 ms).
    pub fn to_ms(&self) -> u64 {
        self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
            + self.centis * MS_PER_CENTI
    }

    pub fn fields(&self) -> [String; 4] {
        [
            pad2(self.hours),
            pad2(self.minutes),
            pad2(self.seconds),
            pad2(self.centis),
        ]
    }
}

impl fmt::Display for Hmsc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

/// Remaining whole seconds split into display fields.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
            seconds: secs % 60,
        }
    }

    pub fn to_secs(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    pub fn fields(&self) -> [String; 3] {
        [pad2(self.hours), pad2(self.minutes), pad2(self.seconds)]
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Format milliseconds as "HH:MM:SS.cs" (centiseconds)
pub fn format_hms_cs(ms: u64) -> String {
    Hmsc::from_ms(ms).to_string()
}

/// Format whole seconds as "HH:MM:SS"
pub fn format_hms(secs: u64) -> String {
    Hms::from_secs(secs).to_string()
}

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

const BELL: &str = "\x07";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Alert {
    /// Countdown reached zero.
    TimeUp,
    /// Ask the user to confirm they saw it.
    Acknowledge,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub bell: bool,
    pub acknowledge: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            bell: true,
            acknowledge: true,
        }
    }
}

/// Play the cue for `alert`. Returns true when the caller should hold the
/// next input line as the acknowledgment.
pub fn fire_alert(config: &AlertConfig, out: &mut impl Write, alert: Alert) -> io::Result<bool> {
    match alert {
        Alert::TimeUp => {
            if config.bell {
                out.write_all(BELL.as_bytes())?;
                out.flush()?;
            }
            log::info!("timer finished");
            Ok(false)
        }
        Alert::Acknowledge => Ok(config.acknowledge),
    }
}

use std::io::{self, Write};

use timer_core::{
    Clock, Countdown, DurationFields, Outcome, Scheduler, Stopwatch, TickId, TimerState,
};

use crate::alerts::{fire_alert, Alert, AlertConfig};
use crate::command::{parse_command, Command};
use crate::config::Settings;
use crate::ui::{self, StopwatchView, TimerView};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Pump(TickId),
    Input(String),
    InputClosed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum Panel {
    Stopwatch,
    Timer,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<C, S> {
    pub stopwatch: Stopwatch<C, S, StopwatchView>,
    pub countdown: Countdown<S, TimerView>,
    pub form: DurationFields,
    pub panel: Panel,
    alert_config: AlertConfig,
    awaiting_ack: bool,
    show_help: bool,
    message: Option<String>,
    frame_dirty: bool,
}

impl<C: Clock, S: Scheduler + Clone> App<C, S> {
    pub fn new(clock: C, scheduler: S, settings: &Settings, panel: Panel) -> Self {
        Self {
            stopwatch: Stopwatch::new(clock, scheduler.clone(), StopwatchView::new()),
            countdown: Countdown::new(scheduler, TimerView::new()),
            form: DurationFields::from(&settings.timer),
            panel,
            alert_config: settings.alerts.clone(),
            awaiting_ack: false,
            show_help: false,
            message: None,
            frame_dirty: true,
        }
    }

    pub fn handle_pump(&mut self, id: TickId) {
        if self.stopwatch.owns_tick(id) {
            self.stopwatch.on_tick(id);
        } else if self.countdown.owns_tick(id) {
            self.countdown.on_tick(id);
        } else {
            log::trace!("dropping stale tick {:?}", id);
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Flow {
        self.frame_dirty = true;
        if self.awaiting_ack {
            log::debug!("time-up acknowledged");
            self.awaiting_ack = false;
            return Flow::Continue;
        }

        self.message = None;
        match parse_command(line) {
            Ok(Some(cmd)) => self.execute(cmd),
            Ok(None) => Flow::Continue,
            Err(e) => {
                log::debug!("bad input {:?}: {}", line, e);
                self.message = Some(e.to_string());
                Flow::Continue
            }
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Flow {
        log::debug!("command {:?} on {:?}", cmd, self.panel);
        match cmd {
            Command::StartStop => match self.panel {
                Panel::Stopwatch => {
                    if self.stopwatch.state() == TimerState::Running {
                        self.stopwatch.pause();
                    } else {
                        self.stopwatch.start();
                    }
                }
                Panel::Timer => {
                    let outcome = if self.countdown.state() == TimerState::Running {
                        self.countdown.pause()
                    } else {
                        self.countdown.start(&self.form)
                    };
                    if outcome == Outcome::Ignored && self.countdown.state() == TimerState::Idle {
                        self.message = Some("enter a duration first (set H M S)".into());
                    }
                }
            },
            Command::Lap => match self.panel {
                Panel::Stopwatch => {
                    self.stopwatch.record_lap();
                }
                Panel::Timer => self.message = Some("laps are recorded on the stopwatch".into()),
            },
            Command::Reset => {
                match self.panel {
                    Panel::Stopwatch => self.stopwatch.reset(),
                    Panel::Timer => self.countdown.reset(),
                };
            }
            Command::Show(panel) => {
                if panel != self.panel {
                    log::info!("switching to {:?}", panel);
                }
                self.panel = panel;
            }
            Command::SetDuration(fields) => self.form = fields,
            Command::Help => self.show_help = !self.show_help,
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    pub fn awaiting_ack(&self) -> bool {
        self.awaiting_ack
    }

    /// Play pending alerts and redraw whatever changed since the last call.
    pub fn render(&mut self, out: &mut impl Write) -> io::Result<()> {
        for alert in self.countdown.sink_mut().take_alerts() {
            let hold = fire_alert(&self.alert_config, out, alert)?;
            if alert == Alert::Acknowledge && hold {
                self.awaiting_ack = true;
                self.frame_dirty = true;
            }
        }

        let sw_view = self.stopwatch.sink();
        let full = self.frame_dirty
            || match self.panel {
                Panel::Stopwatch => sw_view.dirty,
                Panel::Timer => self.countdown.sink().dirty,
            };

        if full {
            ui::clear_screen(out)?;
            ui::draw_tabs(out, self.panel)?;
            match self.panel {
                Panel::Stopwatch => {
                    ui::draw_stopwatch(out, sw_view, self.stopwatch.start_stop_label())?
                }
                Panel::Timer => ui::draw_timer(
                    out,
                    self.countdown.sink(),
                    &self.form,
                    self.countdown.start_stop_label(),
                )?,
            }
            if self.awaiting_ack() {
                ui::draw_time_up(out)?;
            }
            ui::draw_footer(out, self.message.as_deref(), self.show_help)?;
        } else {
            match self.panel {
                Panel::Stopwatch if sw_view.digits_dirty => {
                    ui::draw_stopwatch_digits(out, sw_view)?
                }
                Panel::Timer if self.countdown.sink().digits_dirty => {
                    ui::draw_timer_digits(out, self.countdown.sink())?
                }
                _ => {}
            }
        }

        self.frame_dirty = false;
        let sw_view = self.stopwatch.sink_mut();
        sw_view.dirty = false;
        sw_view.digits_dirty = false;
        let cd_view = self.countdown.sink_mut();
        cd_view.dirty = false;
        cd_view.digits_dirty = false;
        out.flush()
    }
}

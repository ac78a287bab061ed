use std::io::{self, Write};

use crossterm::cursor::{MoveTo, RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use timer_core::{
    CountdownSink, DurationFields, Hms, Hmsc, Lap, StopwatchSink, TimerState,
};

use crate::alerts::Alert;
use crate::app::Panel;
use crate::command::HELP_TEXT;

/// Screen row holding the big digits on both panels.
const DIGITS_ROW: u16 = 3;

/// Latest stopwatch output, kept for redraws.
pub struct StopwatchView {
    pub elapsed: Hmsc,
    pub laps: Vec<(String, String)>,
    pub state: TimerState,
    pub dirty: bool,
    pub digits_dirty: bool,
}

impl StopwatchView {
    pub fn new() -> Self {
        Self {
            elapsed: Hmsc::default(),
            laps: Vec::new(),
            state: TimerState::Idle,
            dirty: true,
            digits_dirty: false,
        }
    }
}

impl StopwatchSink for StopwatchView {
    fn show_elapsed(&mut self, elapsed: Hmsc) {
        self.elapsed = elapsed;
        self.digits_dirty = true;
    }

    fn show_laps(&mut self, laps: &[Lap]) {
        self.laps = laps.iter().map(|l| (l.label(), l.time())).collect();
        self.dirty = true;
    }

    fn state_changed(&mut self, state: TimerState) {
        self.state = state;
        self.dirty = true;
    }
}

/// Latest countdown output plus alerts not yet played.
pub struct TimerView {
    pub remaining: Hms,
    pub state: TimerState,
    pub dirty: bool,
    pub digits_dirty: bool,
    alerts: Vec<Alert>,
}

impl TimerView {
    pub fn new() -> Self {
        Self {
            remaining: Hms::default(),
            state: TimerState::Idle,
            dirty: true,
            digits_dirty: false,
            alerts: Vec::new(),
        }
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }
}

impl CountdownSink for TimerView {
    fn show_remaining(&mut self, remaining: Hms) {
        self.remaining = remaining;
        self.digits_dirty = true;
    }

    fn state_changed(&mut self, state: TimerState) {
        self.state = state;
        self.dirty = true;
    }

    fn time_up(&mut self) {
        self.alerts.push(Alert::TimeUp);
    }

    fn acknowledge(&mut self) {
        self.alerts.push(Alert::Acknowledge);
    }
}

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Replace the digits line, leaving the cursor (and any half-typed
/// command) where it was.
fn redraw_digits_line(out: &mut impl Write, digits: String) -> io::Result<()> {
    queue!(
        out,
        SavePosition,
        MoveTo(0, DIGITS_ROW - 1),
        Clear(ClearType::CurrentLine),
        Print(digits),
        RestorePosition
    )
}

pub fn draw_tabs(out: &mut impl Write, active: Panel) -> io::Result<()> {
    let tab = |panel: Panel, name: &str| {
        if panel == active {
            format!("[ {} ]", name)
        } else {
            format!("  {}  ", name)
        }
    };
    writeln!(
        out,
        "{}  {}",
        tab(Panel::Stopwatch, "Stopwatch"),
        tab(Panel::Timer, "Timer")
    )?;
    writeln!(out)
}

fn stopwatch_digits(view: &StopwatchView) -> String {
    let [h, m, s, cs] = view.elapsed.fields();
    format!("   {}:{}:{}.{}", h, m, s, cs)
}

pub fn draw_stopwatch(out: &mut impl Write, view: &StopwatchView, label: &str) -> io::Result<()> {
    writeln!(out, "{}", stopwatch_digits(view))?;
    writeln!(out)?;
    writeln!(out, "   [{}]  lap  reset", label)?;
    writeln!(out)?;
    for (name, time) in &view.laps {
        writeln!(out, "   {:<8} {}", name, time)?;
    }
    Ok(())
}

pub fn draw_stopwatch_digits(out: &mut impl Write, view: &StopwatchView) -> io::Result<()> {
    redraw_digits_line(out, stopwatch_digits(view))
}

fn timer_digits(view: &TimerView) -> String {
    let [h, m, s] = view.remaining.fields();
    format!("   {}:{}:{}", h, m, s)
}

pub fn draw_timer_digits(out: &mut impl Write, view: &TimerView) -> io::Result<()> {
    redraw_digits_line(out, timer_digits(view))
}

pub fn draw_timer(
    out: &mut impl Write,
    view: &TimerView,
    form: &DurationFields,
    label: &str,
) -> io::Result<()> {
    match view.state {
        TimerState::Idle => writeln!(
            out,
            "   Hours [{}]  Minutes [{}]  Seconds [{}]",
            form.hours, form.minutes, form.seconds
        )?,
        _ => writeln!(out, "{}", timer_digits(view))?,
    }
    writeln!(out)?;
    writeln!(out, "   [{}]  reset", label)
}

pub fn draw_footer(out: &mut impl Write, message: Option<&str>, show_help: bool) -> io::Result<()> {
    writeln!(out)?;
    if let Some(msg) = message {
        writeln!(out, " ! {}", msg)?;
    }
    if show_help {
        for line in HELP_TEXT.lines() {
            writeln!(out, "{}", line)?;
        }
    } else {
        writeln!(out, " s=start/pause l=lap r=reset t=timer sw=stopwatch ?=help q=quit")?;
    }
    write!(out, "> ")
}

pub fn draw_time_up(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, " *** Time's Up! ***  press Enter")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_stopwatch_laps_listed_in_order() {
        let mut view = StopwatchView::new();
        view.show_elapsed(Hmsc::from_ms(4_000));
        view.show_laps(&[
            Lap { number: 2, elapsed_ms: 2_500 },
            Lap { number: 1, elapsed_ms: 1_000 },
        ]);
        let text = render(|out| draw_stopwatch(out, &view, "Pause"));
        assert!(text.contains("00:00:04.00"));
        assert!(text.contains("[Pause]"));
        let lap2 = text.find("Lap 2").unwrap();
        let lap1 = text.find("Lap 1").unwrap();
        assert!(lap2 < lap1);
    }

    #[test]
    fn test_timer_shows_form_when_idle() {
        let view = TimerView::new();
        let form = DurationFields::new("0", "5", "");
        let text = render(|out| draw_timer(out, &view, &form, "Start"));
        assert!(text.contains("Minutes [5]"));
        assert!(text.contains("Seconds []"));
    }

    #[test]
    fn test_timer_shows_digits_when_running() {
        let mut view = TimerView::new();
        view.state_changed(TimerState::Running);
        view.show_remaining(Hms::from_secs(3_725));
        let text = render(|out| draw_timer(out, &view, &DurationFields::default(), "Pause"));
        assert!(text.contains("01:02:05"));
        assert!(!text.contains("Hours ["));
    }

    #[test]
    fn test_alerts_taken_once() {
        let mut view = TimerView::new();
        view.time_up();
        view.acknowledge();
        assert_eq!(view.take_alerts(), vec![Alert::TimeUp, Alert::Acknowledge]);
        assert!(view.take_alerts().is_empty());
    }

    #[test]
    fn test_active_tab_marked() {
        let text = render(|out| draw_tabs(out, Panel::Timer));
        assert!(text.contains("[ Timer ]"));
        assert!(text.contains("  Stopwatch  "));
    }
}

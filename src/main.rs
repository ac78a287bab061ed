mod alerts;
mod app;
mod command;
mod config;
mod pump;
mod ui;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::Context;
use clap::Parser;
use timer_core::SystemClock;

use crate::app::{App, AppEvent, Flow, Panel};
use crate::config::{ConfigStore, TimerForm};

#[derive(Parser)]
#[command(name = "widget-timers")]
#[command(about = "Stopwatch with laps and a countdown timer", long_about = None)]
struct Cli {
    /// Settings file to use instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Panel shown at startup.
    #[arg(long, value_enum, default_value_t = Panel::Stopwatch)]
    panel: Panel,
    /// Log filter, overrides the settings file (RUST_LOG wins over both).
    #[arg(long)]
    log_level: Option<String>,
}

fn input_thread(events: Sender<AppEvent>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if events.send(AppEvent::Input(line)).is_err() {
            return;
        }
    }
    events.send(AppEvent::InputClosed).ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = match cli.config {
        Some(path) => ConfigStore::at(path),
        None => ConfigStore::default_location()?,
    };
    let mut settings = store
        .load()
        .with_context(|| format!("loading settings from {}", store.path().display()))?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("widget-timers starting, settings at {}", store.path().display());

    let (tx, rx) = mpsc::channel();
    let (scheduler, pump) = pump::spawn_pump(tx.clone());
    thread::spawn(move || input_thread(tx));

    let mut app = App::new(SystemClock::new(), scheduler.clone(), &settings, cli.panel);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.render(&mut out)?;

    loop {
        match rx.recv() {
            Ok(AppEvent::Pump(id)) => app.handle_pump(id),
            Ok(AppEvent::Input(line)) => {
                if app.handle_line(&line) == Flow::Quit {
                    break;
                }
            }
            Ok(AppEvent::InputClosed) | Err(_) => break,
        }
        app.render(&mut out)?;
    }

    // Clean up
    app.stopwatch.reset();
    app.countdown.reset();
    scheduler.quit();
    if pump.join().is_err() {
        log::error!("pump thread panicked");
    }

    settings.timer = TimerForm::from(&app.form);
    if let Err(e) = store.save(&settings) {
        log::error!("failed to save settings: {}", e);
    }
    log::info!("widget-timers exiting");
    Ok(())
}

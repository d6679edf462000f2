use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

mod app;
mod heatmap;
mod store;
mod timer;
mod ui;

use app::App;
use store::SessionStore;
use timer::{Timer, TimerConfig};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Cadence of the countdown refresh while the timer runs.
const TICK_RATE: Duration = Duration::from_secs(1);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "⏱ focusgrid - a focus timer with a calendar heatmap")]
struct Args {
    /// Focus duration in minutes for this run
    #[arg(short, long, value_parser = parse_minutes)]
    focus: Option<u32>,
    /// Break duration in minutes for this run
    #[arg(short = 'b', long = "break", value_parser = parse_minutes)]
    break_minutes: Option<u32>,
    /// Activity label sessions are logged under
    #[arg(short, long)]
    label: Option<String>,
}

fn parse_minutes(s: &str) -> std::result::Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(m) if m > 0 => Ok(m),
        Ok(_) => Err("minutes must be greater than zero".into()),
        Err(_) => Err("expected a whole number of minutes".into()),
    }
}

// ============================================================================
// Storage Paths & JSON Helpers
// ============================================================================

fn get_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(".");
    path.push("focusgrid");
    let _ = fs::create_dir_all(&path);
    path.push(filename);
    path
}

// Config is reconstructible from defaults, so a corrupt file falls back
// silently; the session log gets stricter treatment in SessionStore.
fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &PathBuf) -> T {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub(crate) fn save_json<T: Serialize>(path: &PathBuf, data: &T) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(data)?)?;
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_json::<TimerConfig>(&get_path("config.json"));
    config.sanitize();

    if let Some(minutes) = args.focus {
        config.focus_minutes = minutes;
    }
    if let Some(minutes) = args.break_minutes {
        config.break_minutes = minutes;
    }
    if let Some(label) = args.label {
        config.activity_label = label;
    }

    let store = SessionStore::new(get_path("productivity_data.json"));
    let mut app = App::new(Timer::new(config), store, get_path("config.json"));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if app::handle_input(key, app, Local::now()) {
                    app.flush_on_quit(Local::now());
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick(Local::now());
            last_tick = Instant::now();
        }
    }
}

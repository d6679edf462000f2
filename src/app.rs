//! Application state shared between the event loop and the renderer, plus
//! the key handlers that drive it.

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use notify_rust::{Notification, Timeout, Urgency};

use crate::heatmap;
use crate::store::SessionStore;
use crate::timer::{Phase, Status, Timer, MAX_BREAK_MINUTES, MAX_FOCUS_MINUTES};

#[derive(PartialEq, Clone, Copy)]
pub enum View {
    Timer,
    Heatmap,
    Settings,
    Help,
}

#[derive(PartialEq, Clone, Copy)]
pub enum SettingsField {
    FocusMinutes,
    BreakMinutes,
    ActivityLabel,
}

impl SettingsField {
    fn next(self) -> Self {
        match self {
            Self::FocusMinutes => Self::BreakMinutes,
            Self::BreakMinutes => Self::ActivityLabel,
            Self::ActivityLabel => Self::FocusMinutes,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::FocusMinutes => Self::ActivityLabel,
            Self::BreakMinutes => Self::FocusMinutes,
            Self::ActivityLabel => Self::BreakMinutes,
        }
    }
}

pub struct App {
    pub timer: Timer,
    pub store: SessionStore,
    pub view: View,
    pub settings_field: SettingsField,
    pub settings_editing: bool,
    pub settings_input: String,
    /// Trailing-year series shown by the heatmap view, rebuilt on entry.
    pub heatmap: Vec<(NaiveDate, u64)>,
    /// Last storage problem, surfaced in the footer instead of crashing the
    /// timer.
    pub message: Option<String>,
    config_path: PathBuf,
}

impl App {
    pub fn new(timer: Timer, store: SessionStore, config_path: PathBuf) -> Self {
        Self {
            timer,
            store,
            view: View::Timer,
            settings_field: SettingsField::FocusMinutes,
            settings_editing: false,
            settings_input: String::new(),
            heatmap: Vec::new(),
            message: None,
            config_path,
        }
    }

    pub fn on_tick(&mut self, now: DateTime<Local>) {
        if self.timer.tick(now) {
            let (title, body) = match self.timer.phase() {
                Phase::Focus => ("Focus time is up", "Step away and take your break."),
                Phase::Break => ("Break is over", "Back to focus."),
            };
            notify(title, body);
        }
    }

    /// An in-progress focus run still counts; flush it through the ordinary
    /// save rule before the process exits.
    pub fn flush_on_quit(&mut self, now: DateTime<Local>) {
        let _ = self.timer.reset(now, &self.store);
    }

    pub fn open_heatmap(&mut self, today: NaiveDate) {
        match self
            .store
            .load()
            .and_then(|log| heatmap::project(&log, today))
        {
            Ok(series) => {
                self.heatmap = series;
                self.view = View::Heatmap;
            }
            Err(e) => self.message = Some(format!("could not read log: {e}")),
        }
    }

    fn save_config(&mut self) {
        if let Err(e) = crate::save_json(&self.config_path, &self.timer.config) {
            self.message = Some(format!("config save failed: {e}"));
        }
    }

    fn report(&mut self, result: crate::Result<()>) {
        if let Err(e) = result {
            self.message = Some(format!("save failed: {e}"));
        }
    }
}

fn notify(title: &str, body: &str) {
    let _ = Notification::new()
        .summary(title)
        .body(body)
        .appname("focusgrid")
        .icon("alarm-clock")
        .urgency(Urgency::Critical)
        .timeout(Timeout::Milliseconds(10_000))
        .show();
}

/// Route a key press to the active view. Returns true when the app should
/// quit.
pub fn handle_input(key: KeyEvent, app: &mut App, now: DateTime<Local>) -> bool {
    app.message = None;

    if app.settings_editing {
        match key.code {
            KeyCode::Char(c) => app.settings_input.push(c),
            KeyCode::Backspace => {
                app.settings_input.pop();
            }
            KeyCode::Enter => apply_setting(app),
            KeyCode::Esc => {
                app.settings_editing = false;
                app.settings_input.clear();
            }
            _ => {}
        }
        return false;
    }

    match app.view {
        View::Settings => handle_settings_view(key, app),
        View::Heatmap => handle_heatmap_view(key, app, now),
        _ => handle_main_view(key, app, now),
    }
}

fn handle_main_view(key: KeyEvent, app: &mut App, now: DateTime<Local>) -> bool {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return true;
    }

    match key.code {
        KeyCode::Char(' ') => match app.timer.status() {
            Status::Idle => app.timer.start(now),
            _ => app.timer.toggle_pause(now),
        },
        KeyCode::Char('r') => {
            let result = app.timer.reset(now, &app.store);
            app.report(result);
        }
        KeyCode::Char('b') => {
            let result = app.timer.toggle_mode(now, &app.store);
            app.report(result);
        }
        KeyCode::Char('g') => app.open_heatmap(now.date_naive()),
        KeyCode::Char('d') => app.view = View::Settings,
        KeyCode::Char('h') | KeyCode::Char('?') => {
            app.view = if app.view == View::Help {
                View::Timer
            } else {
                View::Help
            };
        }
        _ => {}
    }

    false
}

fn handle_heatmap_view(key: KeyEvent, app: &mut App, now: DateTime<Local>) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('g') => app.view = View::Timer,
        KeyCode::Char('r') => app.open_heatmap(now.date_naive()),
        _ => {}
    }
    false
}

fn handle_settings_view(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('d') => app.view = View::Timer,
        KeyCode::Down | KeyCode::Char('j') => app.settings_field = app.settings_field.next(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_field = app.settings_field.prev(),
        KeyCode::Enter | KeyCode::Char('e') => start_editing(app),
        _ => {}
    }
    false
}

fn start_editing(app: &mut App) {
    app.settings_input = match app.settings_field {
        SettingsField::FocusMinutes => app.timer.config.focus_minutes.to_string(),
        SettingsField::BreakMinutes => app.timer.config.break_minutes.to_string(),
        SettingsField::ActivityLabel => app.timer.config.activity_label.clone(),
    };
    app.settings_editing = true;
}

// Out-of-range input leaves the config untouched; the state machine never
// sees an invalid value.
fn apply_setting(app: &mut App) {
    let input = app.settings_input.trim();
    let mut applied = false;

    match app.settings_field {
        SettingsField::FocusMinutes => {
            if let Ok(m) = input.parse::<u32>() {
                if (1..=MAX_FOCUS_MINUTES).contains(&m) {
                    app.timer.config.focus_minutes = m;
                    applied = true;
                }
            }
        }
        SettingsField::BreakMinutes => {
            if let Ok(m) = input.parse::<u32>() {
                if (1..=MAX_BREAK_MINUTES).contains(&m) {
                    app.timer.config.break_minutes = m;
                    applied = true;
                }
            }
        }
        SettingsField::ActivityLabel => {
            if !input.is_empty() {
                app.timer.config.activity_label = input.to_string();
                applied = true;
            }
        }
    }

    if applied {
        app.timer.refresh_idle();
        app.save_config();
    }
    app.settings_editing = false;
    app.settings_input.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::TempDir;
    use crate::timer::TimerConfig;

    fn app(dir: &TempDir) -> App {
        App::new(
            Timer::new(TimerConfig::default()),
            dir.store(),
            dir.path.join("config.json"),
        )
    }

    fn edit(app: &mut App, field: SettingsField, input: &str) {
        app.settings_field = field;
        app.settings_editing = true;
        app.settings_input = input.into();
        apply_setting(app);
    }

    #[test]
    fn zero_minutes_are_rejected_at_the_boundary() {
        let dir = TempDir::new();
        let mut app = app(&dir);
        edit(&mut app, SettingsField::FocusMinutes, "0");

        assert_eq!(app.timer.config.focus_minutes, 25);
        assert!(!app.settings_editing);
    }

    #[test]
    fn label_edits_are_trimmed_and_persisted() {
        let dir = TempDir::new();
        let mut app = app(&dir);
        edit(&mut app, SettingsField::ActivityLabel, "  Deep Work  ");

        assert_eq!(app.timer.config.activity_label, "Deep Work");
        assert!(dir.path.join("config.json").exists());
    }

    #[test]
    fn applied_edit_refreshes_the_idle_display() {
        let dir = TempDir::new();
        let mut app = app(&dir);
        edit(&mut app, SettingsField::FocusMinutes, "30");

        assert_eq!(app.timer.config.focus_minutes, 30);
        assert_eq!(app.timer.display_time(), "30:00");
    }
}

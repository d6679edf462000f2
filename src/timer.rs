//! The focus/break countdown state machine.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::store::SessionStore;
use crate::Result;

/// Date key format of the session log.
pub const DATE_FMT: &str = "%d.%m.%Y";

pub const MAX_FOCUS_MINUTES: u32 = 240;
pub const MAX_BREAK_MINUTES: u32 = 60;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Self::Focus => "🎯 FOCUS",
            Self::Break => "☕ BREAK",
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Focus => Self::Break,
            Self::Break => Self::Focus,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Idle,
    Running,
    Paused,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TimerConfig {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub activity_label: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            activity_label: "Study".into(),
        }
    }
}

impl TimerConfig {
    /// Bring out-of-range values (hand-edited config file, zero minutes)
    /// back inside the accepted bounds. The state machine assumes a
    /// sanitized config on every transition.
    pub fn sanitize(&mut self) {
        self.focus_minutes = self.focus_minutes.clamp(1, MAX_FOCUS_MINUTES);
        self.break_minutes = self.break_minutes.clamp(1, MAX_BREAK_MINUTES);
        if self.activity_label.trim().is_empty() {
            self.activity_label = Self::default().activity_label;
        }
    }
}

pub struct Timer {
    pub config: TimerConfig,
    phase: Phase,
    status: Status,
    /// Remaining seconds in the current countdown; negative once the
    /// configured duration has been overrun. Derived from `end_time` on
    /// every tick while running, frozen while paused or idle.
    elapsed_seconds: i64,
    end_time: Option<DateTime<Local>>,
    notified: bool,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        let elapsed_seconds = config.focus_minutes as i64 * 60;
        Self {
            config,
            phase: Phase::Focus,
            status: Status::Idle,
            elapsed_seconds,
            end_time: None,
            notified: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn elapsed_seconds(&self) -> i64 {
        self.elapsed_seconds
    }

    fn configured_seconds(&self) -> i64 {
        let minutes = match self.phase {
            Phase::Focus => self.config.focus_minutes,
            Phase::Break => self.config.break_minutes,
        };
        minutes as i64 * 60
    }

    /// Begin the countdown for the current phase. Any status but Idle
    /// ignores the press.
    pub fn start(&mut self, now: DateTime<Local>) {
        if self.status != Status::Idle {
            return;
        }
        self.elapsed_seconds = self.configured_seconds();
        self.end_time = Some(now + Duration::seconds(self.elapsed_seconds));
        self.status = Status::Running;
        self.notified = false;
    }

    /// Pause a running countdown, or resume a paused one with exactly the
    /// remaining time it was frozen with. Idle ignores the press.
    pub fn toggle_pause(&mut self, now: DateTime<Local>) {
        match self.status {
            Status::Running => {
                self.sync_elapsed(now);
                self.status = Status::Paused;
            }
            Status::Paused => {
                self.end_time = Some(now + Duration::seconds(self.elapsed_seconds));
                self.status = Status::Running;
                self.notified = false;
            }
            Status::Idle => {}
        }
    }

    /// Refresh the countdown from the wall clock. Returns true exactly once
    /// per running period, the first time the remaining time reaches zero;
    /// the host fires the desktop notification on that signal.
    pub fn tick(&mut self, now: DateTime<Local>) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.sync_elapsed(now);
        if self.elapsed_seconds <= 0 && !self.notified {
            self.notified = true;
            return true;
        }
        false
    }

    /// Stop and rewind the current phase. Focus progress made so far is
    /// flushed to the log first; resetting from Idle writes nothing.
    pub fn reset(&mut self, now: DateTime<Local>, store: &SessionStore) -> Result<()> {
        if self.status != Status::Idle {
            self.sync_elapsed(now);
            self.flush_focus_progress(now, store)?;
        }
        self.rewind();
        Ok(())
    }

    /// Flip between focus and break. A running countdown is flushed before
    /// the switch; the new phase starts idle at its full duration.
    pub fn toggle_mode(&mut self, now: DateTime<Local>, store: &SessionStore) -> Result<()> {
        if self.status == Status::Running {
            self.sync_elapsed(now);
            self.flush_focus_progress(now, store)?;
        }
        self.phase = self.phase.flipped();
        self.rewind();
        Ok(())
    }

    /// Re-derive the idle display after a config edit.
    pub fn refresh_idle(&mut self) {
        if self.status == Status::Idle {
            self.elapsed_seconds = self.configured_seconds();
        }
    }

    fn rewind(&mut self) {
        self.status = Status::Idle;
        self.notified = false;
        self.end_time = None;
        self.elapsed_seconds = self.configured_seconds();
    }

    // The stored end time is stale while paused; only a running countdown
    // re-derives from the clock.
    fn sync_elapsed(&mut self, now: DateTime<Local>) {
        if self.status == Status::Running {
            if let Some(end) = self.end_time {
                self.elapsed_seconds = (end - now).num_seconds();
            }
        }
    }

    // Break time never counts toward the log, and runs under a full minute
    // are dropped rather than recorded as zero.
    fn flush_focus_progress(&self, now: DateTime<Local>, store: &SessionStore) -> Result<()> {
        if self.phase != Phase::Focus {
            return Ok(());
        }
        let minutes = (self.config.focus_minutes as i64 * 60 - self.elapsed_seconds) / 60;
        if minutes <= 0 {
            return Ok(());
        }
        let date = now.format(DATE_FMT).to_string();
        store.record_session(&date, &self.config.activity_label, minutes as u64)
    }

    /// `MM:SS`, with a leading `-` once the countdown has run over.
    pub fn display_time(&self) -> String {
        let sign = if self.elapsed_seconds < 0 { "-" } else { "" };
        let secs = self.elapsed_seconds.abs();
        format!("{}{:02}:{:02}", sign, secs / 60, secs % 60)
    }

    /// Fraction of the current phase already spent, for the progress gauge.
    pub fn progress_ratio(&self) -> f64 {
        let total = self.configured_seconds() as f64;
        (1.0 - self.elapsed_seconds as f64 / total).clamp(0.0, 1.0)
    }
}

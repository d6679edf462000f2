//! Day-keyed session log, persisted as a single JSON file.
//!
//! The whole log is loaded, mutated in memory and rewritten on every save.
//! There is no locking; the application is single-instance.

use std::{collections::BTreeMap, fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// One logged block of focus work within a day.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionEntry {
    pub activity_label: String,
    pub focus_duration: u64,
}

/// Calendar date (`DD.MM.YYYY`) to the sessions recorded on that date.
pub type DailyLog = BTreeMap<String, Vec<SessionEntry>>;

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted log. A missing file means no history yet; a file
    /// that exists but does not parse is an error, never guessed at.
    pub fn load(&self) -> Result<DailyLog> {
        if !self.path.exists() {
            return Ok(DailyLog::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Add `minutes` to the entry for `(date, label)`, creating the date and
    /// the entry as needed. Repeat saves for the same label accumulate into
    /// the existing entry rather than duplicating it.
    pub fn record_session(&self, date: &str, label: &str, minutes: u64) -> Result<()> {
        let mut log = self.load()?;
        let sessions = log.entry(date.to_string()).or_default();

        match sessions.iter_mut().find(|s| s.activity_label == label) {
            Some(entry) => entry.focus_duration += minutes,
            None => sessions.push(SessionEntry {
                activity_label: label.into(),
                focus_duration: minutes,
            }),
        }

        crate::save_json(&self.path, &log)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_TEMP_DIR: AtomicUsize = AtomicUsize::new(0);

    /// Unique per-test scratch directory, removed on drop.
    pub(crate) struct TempDir {
        pub path: PathBuf,
    }

    impl TempDir {
        pub fn new() -> Self {
            let sequence = NEXT_TEMP_DIR.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "focusgrid-tests-{}-{}",
                std::process::id(),
                sequence
            ));
            fs::create_dir_all(&path).expect("create temp dir");
            Self { path }
        }

        pub fn store(&self) -> SessionStore {
            SessionStore::new(self.path.join("productivity_data.json"))
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn missing_file_loads_as_empty_history() {
        let dir = TempDir::new();
        assert!(dir.store().load().unwrap().is_empty());
    }

    #[test]
    fn same_label_accumulates() {
        let dir = TempDir::new();
        let store = dir.store();
        store.record_session("01.01.2024", "Study", 10).unwrap();
        store.record_session("01.01.2024", "Study", 5).unwrap();

        let log = store.load().unwrap();
        let sessions = &log["01.01.2024"];
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].focus_duration, 15);
    }

    #[test]
    fn labels_keep_separate_entries_in_insertion_order() {
        let dir = TempDir::new();
        let store = dir.store();
        store.record_session("01.01.2024", "Study", 10).unwrap();
        store.record_session("01.01.2024", "Reading", 20).unwrap();
        store.record_session("01.01.2024", "Study", 10).unwrap();

        let log = store.load().unwrap();
        let sessions = &log["01.01.2024"];
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].activity_label, "Study");
        assert_eq!(sessions[0].focus_duration, 20);
        assert_eq!(sessions[1].activity_label, "Reading");
        assert_eq!(sessions[1].focus_duration, 20);
    }

    #[test]
    fn dates_are_tracked_independently() {
        let dir = TempDir::new();
        let store = dir.store();
        store.record_session("01.01.2024", "Study", 10).unwrap();
        store.record_session("02.01.2024", "Study", 25).unwrap();

        let log = store.load().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log["01.01.2024"][0].focus_duration, 10);
        assert_eq!(log["02.01.2024"][0].focus_duration, 25);
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = TempDir::new();
        let store = dir.store();
        fs::write(dir.path.join("productivity_data.json"), "{ not json").unwrap();

        assert!(store.load().is_err());
        assert!(store.record_session("01.01.2024", "Study", 10).is_err());
    }
}

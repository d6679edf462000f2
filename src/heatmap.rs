//! Projection of the daily log into the trailing-year series behind the
//! calendar heatmap.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::store::DailyLog;
use crate::timer::DATE_FMT;
use crate::Result;

/// Days looked back from `as_of`; the series is inclusive on both ends.
pub const WINDOW_DAYS: i64 = 365;

/// Total focus minutes for every day of the trailing year ending at `as_of`.
/// Days with no recorded sessions appear explicitly with a zero total, so the
/// series is always 366 contiguous dates.
pub fn project(log: &DailyLog, as_of: NaiveDate) -> Result<Vec<(NaiveDate, u64)>> {
    let mut totals: HashMap<NaiveDate, u64> = HashMap::new();
    for (date_str, sessions) in log {
        let date = NaiveDate::parse_from_str(date_str, DATE_FMT)
            .map_err(|e| format!("bad date key {date_str:?} in log: {e}"))?;
        let minutes: u64 = sessions.iter().map(|s| s.focus_duration).sum();
        *totals.entry(date).or_insert(0) += minutes;
    }

    let start = as_of - Duration::days(WINDOW_DAYS);
    Ok((0..=WINDOW_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            (date, totals.get(&date).copied().unwrap_or(0))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionEntry;

    fn entry(label: &str, minutes: u64) -> SessionEntry {
        SessionEntry {
            activity_label: label.into(),
            focus_duration: minutes,
        }
    }

    fn log_with(date: &str, sessions: Vec<SessionEntry>) -> DailyLog {
        let mut log = DailyLog::new();
        log.insert(date.into(), sessions);
        log
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn covers_exactly_one_trailing_year() {
        let as_of = day(2024, 1, 1);
        let series = project(&DailyLog::new(), as_of).unwrap();

        assert_eq!(series.len(), 366);
        assert_eq!(series.first().unwrap().0, as_of - Duration::days(365));
        assert_eq!(series.last().unwrap().0, as_of);
        for pair in series.windows(2) {
            assert_eq!(pair[1].0 - pair[0].0, Duration::days(1));
        }
    }

    #[test]
    fn absent_days_are_explicit_zeros() {
        let as_of = day(2024, 1, 1);
        let log = log_with("01.01.2024", vec![entry("Study", 30)]);
        let series = project(&log, as_of).unwrap();

        assert_eq!(series.last().unwrap(), &(as_of, 30));
        assert!(series[..series.len() - 1].iter().all(|(_, total)| *total == 0));
    }

    #[test]
    fn sums_all_sessions_of_a_day() {
        let as_of = day(2024, 3, 1);
        let log = log_with("15.02.2024", vec![entry("Study", 30), entry("Reading", 15)]);
        let series = project(&log, as_of).unwrap();

        let (_, total) = series
            .iter()
            .find(|(date, _)| *date == day(2024, 2, 15))
            .unwrap();
        assert_eq!(*total, 45);
    }

    #[test]
    fn days_outside_the_window_are_dropped() {
        let as_of = day(2024, 1, 1);
        let mut log = log_with("31.12.2022", vec![entry("Study", 30)]);
        log.insert("02.01.2024".into(), vec![entry("Study", 10)]);
        let series = project(&log, as_of).unwrap();

        assert_eq!(series.len(), 366);
        assert!(series.iter().all(|(_, total)| *total == 0));
    }

    #[test]
    fn malformed_date_key_is_an_error() {
        let log = log_with("2024-01-01", vec![entry("Study", 30)]);
        assert!(project(&log, day(2024, 1, 1)).is_err());
    }
}

//! Medication adherence calendar.
//!
//! Classifies each day of a trailing seven-day window as taken, missed or future
//! from the dose-log history and derives an overall adherence percentage.
//!
//! Missed and skipped doses both count against a day; only `Taken` logs count for it.
//! A dose that was not taken is attributed to a day in one of two ways:
//!
//! - it carries a `scheduled_date`, in which case it counts for that day even when
//!   nothing else was logged (a day with only missed doses is `Missed`, not `Future`);
//! - it carries no date at all, in which case it counts for every day that has at
//!   least one *other* log dated on it.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{LogStatus, MedicationLog};

/// Length of the calendar window.
pub const WINDOW_DAYS: usize = 7;

/// Classification of one calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Taken,
    Missed,
    /// After today, or nothing logged yet
    Future,
}

/// One cell of the adherence calendar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayMark {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Calendar plus summary counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdherenceReport {
    /// Oldest first
    pub days: Vec<DayMark>,
    /// Days that are not `Future`
    pub total_past: u32,
    /// Days classified `Taken`
    pub total_taken: u32,
    /// round(100 × taken / past); 100 when there are no past days
    pub percent: u8,
}

impl AdherenceReport {
    pub fn count(&self, status: DayStatus) -> usize {
        self.days.iter().filter(|d| d.status == status).count()
    }

    pub fn today(&self) -> Option<&DayMark> {
        self.days.last()
    }
}

/// Build the calendar for the seven days ending today.
pub fn calculate(logs: &[MedicationLog], today: NaiveDate) -> AdherenceReport {
    calculate_window(logs, today, today)
}

/// Build the calendar for the seven days ending `last_day`, relative to `today`.
///
/// Days after `today` are always `Future`.
pub fn calculate_window(
    logs: &[MedicationLog],
    last_day: NaiveDate,
    today: NaiveDate,
) -> AdherenceReport {
    let mut days = Vec::with_capacity(WINDOW_DAYS);
    let mut total_past = 0u32;
    let mut total_taken = 0u32;

    for offset in (0..WINDOW_DAYS as i64).rev() {
        let date = last_day - Duration::days(offset);
        let status = if date > today {
            DayStatus::Future
        } else {
            classify_day(logs, date)
        };

        match status {
            DayStatus::Taken => {
                total_past += 1;
                total_taken += 1;
            }
            DayStatus::Missed => total_past += 1,
            DayStatus::Future => {}
        }
        days.push(DayMark { date, status });
    }

    AdherenceReport {
        days,
        total_past,
        total_taken,
        percent: percent(total_taken, total_past),
    }
}

/// Classify a single past (or current) day.
pub fn classify_day(logs: &[MedicationLog], day: NaiveDate) -> DayStatus {
    let dated_count = logs
        .iter()
        .filter(|log| log.dated_on() == Some(day))
        .count();

    let has_missed = logs
        .iter()
        .enumerate()
        .any(|(idx, log)| log.status != LogStatus::Taken && missed_on(logs, idx, day));

    if has_missed {
        DayStatus::Missed
    } else if dated_count > 0 {
        DayStatus::Taken
    } else {
        DayStatus::Future
    }
}

/// Whether the untaken log at `idx` is attributed to `day`.
fn missed_on(logs: &[MedicationLog], idx: usize, day: NaiveDate) -> bool {
    match logs[idx].dated_on() {
        Some(date) => date == day,
        None => logs
            .iter()
            .enumerate()
            .any(|(other, log)| other != idx && log.dated_on() == Some(day)),
    }
}

fn percent(taken: u32, past: u32) -> u8 {
    if past == 0 {
        return 100;
    }
    (f64::from(taken) * 100.0 / f64::from(past)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DosePeriod;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn taken(med: &str, period: DosePeriod, ts: &str) -> MedicationLog {
        MedicationLog::taken(med.into(), period, ts.parse().unwrap())
    }

    fn undated_missed(med: &str, period: DosePeriod) -> MedicationLog {
        MedicationLog {
            id: format!("missed-{}", med),
            medication_id: med.into(),
            scheduled: period,
            taken_at: None,
            scheduled_date: None,
            status: LogStatus::Missed,
        }
    }

    #[test]
    fn test_empty_history_is_all_future() {
        let report = calculate(&[], day(18));
        assert_eq!(report.days.len(), WINDOW_DAYS);
        assert!(report.days.iter().all(|d| d.status == DayStatus::Future));
        assert_eq!(report.total_past, 0);
        assert_eq!(report.percent, 100);
    }

    #[test]
    fn test_window_is_oldest_first_ending_today() {
        let report = calculate(&[], day(18));
        assert_eq!(report.days[0].date, day(12));
        assert_eq!(report.today().unwrap().date, day(18));
    }

    #[test]
    fn test_all_taken() {
        let logs: Vec<_> = (12..=18)
            .map(|d| taken("1", DosePeriod::Morning, &format!("2026-02-{:02}T08:00:00", d)))
            .collect();
        let report = calculate(&logs, day(18));
        assert_eq!(report.total_past, 7);
        assert_eq!(report.total_taken, 7);
        assert_eq!(report.percent, 100);
    }

    #[test]
    fn test_missed_evening_marks_today_missed() {
        let logs = vec![
            taken("1", DosePeriod::Morning, "2026-02-18T08:15:00"),
            MedicationLog::missed("2".into(), DosePeriod::Evening, day(18)),
            taken("1", DosePeriod::Morning, "2026-02-17T08:30:00"),
        ];
        let report = calculate(&logs, day(18));

        assert_eq!(report.today().unwrap().status, DayStatus::Missed);
        assert_eq!(report.days[5].status, DayStatus::Taken);
        assert_eq!(report.total_past, 2);
        assert_eq!(report.total_taken, 1);
        assert_eq!(report.percent, 50);
    }

    #[test]
    fn test_dated_missed_without_companion_is_missed() {
        let logs = vec![MedicationLog::missed("2".into(), DosePeriod::Evening, day(16))];
        assert_eq!(classify_day(&logs, day(16)), DayStatus::Missed);
        assert_eq!(classify_day(&logs, day(17)), DayStatus::Future);
    }

    #[test]
    fn test_undated_missed_needs_companion() {
        let logs = vec![
            undated_missed("2", DosePeriod::Evening),
            taken("1", DosePeriod::Morning, "2026-02-17T08:30:00"),
        ];
        assert_eq!(classify_day(&logs, day(17)), DayStatus::Missed);
        assert_eq!(classify_day(&logs, day(16)), DayStatus::Future);

        let alone = vec![undated_missed("2", DosePeriod::Evening)];
        assert_eq!(classify_day(&alone, day(17)), DayStatus::Future);
    }

    #[test]
    fn test_skipped_dose_is_not_adherence() {
        let skipped = MedicationLog {
            id: "s1".into(),
            medication_id: "1".into(),
            scheduled: DosePeriod::Morning,
            taken_at: None,
            scheduled_date: Some(day(18)),
            status: LogStatus::Skipped,
        };
        let report = calculate(&[skipped.clone()], day(18));
        assert_eq!(report.today().unwrap().status, DayStatus::Missed);
        assert_eq!(report.total_taken, 0);
        assert_eq!(report.percent, 0);

        let with_taken = vec![taken("2", DosePeriod::Evening, "2026-02-18T19:00:00"), skipped];
        assert_eq!(classify_day(&with_taken, day(18)), DayStatus::Missed);
    }

    #[test]
    fn test_future_days_after_today() {
        let logs = vec![taken("1", DosePeriod::Morning, "2026-02-18T08:00:00")];
        let report = calculate_window(&logs, day(20), day(18));
        assert_eq!(report.days[5].status, DayStatus::Future);
        assert_eq!(report.days[6].status, DayStatus::Future);
        assert_eq!(report.days[4].status, DayStatus::Taken);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(0, 5), 0);
    }
}

//! Medication and dose-log models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{empty_as_none, ModelError};

/// Time-of-day slot a dose is scheduled for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DosePeriod {
    Morning,
    Afternoon,
    Evening,
    #[serde(rename = "Before Bed")]
    BeforeBed,
}

impl DosePeriod {
    /// Display order of the daily schedule.
    pub const ORDERED: [DosePeriod; 4] = [
        DosePeriod::Morning,
        DosePeriod::Afternoon,
        DosePeriod::Evening,
        DosePeriod::BeforeBed,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DosePeriod::Morning => "Morning",
            DosePeriod::Afternoon => "Afternoon",
            DosePeriod::Evening => "Evening",
            DosePeriod::BeforeBed => "Before Bed",
        }
    }

    /// Parse a period label, case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "morning" => Some(DosePeriod::Morning),
            "afternoon" => Some(DosePeriod::Afternoon),
            "evening" => Some(DosePeriod::Evening),
            "before bed" | "beforebed" | "bedtime" => Some(DosePeriod::BeforeBed),
            _ => None,
        }
    }
}

/// A medication in the patient's subscription pack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Local identifier
    pub id: String,
    /// Drug name (e.g., "Metformin")
    pub name: String,
    /// Strength as written on the prescription (e.g., "500mg")
    pub dosage: String,
    /// Scheduled period of the day
    pub timing: DosePeriod,
    /// Frequency as written (e.g., "Once daily")
    pub frequency: String,
    /// Plain-language instruction
    pub instruction: String,
    /// Whether a pharmacist has checked this entry
    #[serde(default)]
    pub pharmacist_verified: bool,
    /// Next refill date
    #[serde(default)]
    pub refill_date: Option<NaiveDate>,
    /// Days of supply left in the current pack
    #[serde(default)]
    pub remaining_days: Option<u32>,
}

impl Medication {
    /// Create a new, unverified medication entry.
    pub fn new(name: String, dosage: String, timing: DosePeriod) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            dosage,
            timing,
            frequency: "Once daily".into(),
            instruction: String::new(),
            pharmacist_verified: false,
            refill_date: None,
            remaining_days: None,
        }
    }

    /// Name and strength as shown on the pack label.
    pub fn display_name(&self) -> String {
        if self.dosage.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.dosage)
        }
    }
}

/// Outcome recorded for a scheduled dose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Taken,
    Missed,
    Skipped,
}

/// One scheduled-dose event. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationLog {
    pub id: String,
    /// Medication this dose belongs to
    pub medication_id: String,
    /// Period the dose was scheduled for
    pub scheduled: DosePeriod,
    /// When the dose was taken; absent for missed doses
    #[serde(default, deserialize_with = "empty_as_none")]
    pub taken_at: Option<NaiveDateTime>,
    /// Calendar day the dose was due, when known
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    pub status: LogStatus,
}

impl MedicationLog {
    /// Record a dose taken at the given time.
    pub fn taken(medication_id: String, scheduled: DosePeriod, at: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            medication_id,
            scheduled,
            taken_at: Some(at),
            scheduled_date: Some(at.date()),
            status: LogStatus::Taken,
        }
    }

    /// Record a dose missed on the given day.
    pub fn missed(medication_id: String, scheduled: DosePeriod, day: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            medication_id,
            scheduled,
            taken_at: None,
            scheduled_date: Some(day),
            status: LogStatus::Missed,
        }
    }

    /// Calendar day this log is dated on: the day it was taken, else the day it was due.
    pub fn dated_on(&self) -> Option<NaiveDate> {
        self.taken_at
            .map(|at| at.date())
            .or(self.scheduled_date)
    }

    /// Check the taken/missed timestamp invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        match (self.status, self.taken_at) {
            (LogStatus::Taken, None) => Err(ModelError::InvalidLog {
                id: self.id.clone(),
                reason: "taken dose has no taken_at".into(),
            }),
            (LogStatus::Missed, Some(_)) => Err(ModelError::InvalidLog {
                id: self.id.clone(),
                reason: "missed dose has a taken_at".into(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_period_serde_labels() {
        let json = serde_json::to_string(&DosePeriod::BeforeBed).unwrap();
        assert_eq!(json, "\"Before Bed\"");

        let period: DosePeriod = serde_json::from_str("\"Morning\"").unwrap();
        assert_eq!(period, DosePeriod::Morning);
    }

    #[test]
    fn test_period_from_label() {
        assert_eq!(DosePeriod::from_label("before bed"), Some(DosePeriod::BeforeBed));
        assert_eq!(DosePeriod::from_label(" Evening "), Some(DosePeriod::Evening));
        assert_eq!(DosePeriod::from_label("noon"), None);
    }

    #[test]
    fn test_log_empty_taken_at_is_none() {
        let json = r#"{"id":"log4","medication_id":"2","scheduled":"Evening","taken_at":"","status":"missed"}"#;
        let log: MedicationLog = serde_json::from_str(json).unwrap();
        assert!(log.taken_at.is_none());
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_log_invariants() {
        let mut log = MedicationLog::taken("1".into(), DosePeriod::Morning, at("2026-02-18T08:15:00"));
        assert!(log.validate().is_ok());

        log.taken_at = None;
        assert!(log.validate().is_err());

        let mut missed = MedicationLog::missed(
            "2".into(),
            DosePeriod::Evening,
            NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(),
        );
        assert!(missed.validate().is_ok());
        missed.taken_at = Some(at("2026-02-18T19:00:00"));
        assert!(missed.validate().is_err());
    }

    #[test]
    fn test_dated_on_prefers_taken_at() {
        let mut log = MedicationLog::taken("1".into(), DosePeriod::Morning, at("2026-02-18T08:15:00"));
        log.scheduled_date = NaiveDate::from_ymd_opt(2026, 2, 17);
        assert_eq!(log.dated_on(), NaiveDate::from_ymd_opt(2026, 2, 18));
    }

    #[test]
    fn test_display_name() {
        let med = Medication::new("Metformin".into(), "500mg".into(), DosePeriod::Evening);
        assert_eq!(med.display_name(), "Metformin 500mg");
        assert_eq!(med.id.len(), 36);
    }
}

//! Physician-side consultation models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Type of appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConsultKind {
    Teleconsult,
    FollowUp,
    LabReview,
}

impl ConsultKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConsultKind::Teleconsult => "Teleconsult",
            ConsultKind::FollowUp => "Follow-up",
            ConsultKind::LabReview => "Lab Review",
        }
    }
}

/// Consultation status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConsultStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ConsultStatus {
    /// Completed and cancelled consults never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConsultStatus::Completed | ConsultStatus::Cancelled)
    }
}

/// One scheduled or completed appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorConsult {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: NaiveDate,
    /// Slot label (e.g., "10:00 AM")
    pub time: String,
    pub kind: ConsultKind,
    pub status: ConsultStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DoctorConsult {
    /// Schedule a new consultation.
    pub fn schedule(
        patient_id: String,
        patient_name: String,
        date: NaiveDate,
        time: String,
        kind: ConsultKind,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            patient_name,
            date,
            time,
            kind,
            status: ConsultStatus::Scheduled,
            notes: None,
        }
    }
}

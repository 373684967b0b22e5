//! Patient-side models: profile, appointment history, notifications, uploads.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{ModelError, RefillCycle};

/// The subscribed patient's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub location: String,
    /// Primary chronic condition (e.g., "Hypertension")
    pub condition: String,
    /// Free-text next consultation slot
    #[serde(default)]
    pub next_consultation: Option<String>,
    /// Completed the registration flow
    #[serde(default)]
    pub is_registered: bool,
    /// Senior-citizen or PWD ID on file
    #[serde(default)]
    pub has_senior_pwd_id: bool,
    pub refill_cycle: RefillCycle,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

/// Registration form as submitted by the onboarding flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnboardingData {
    pub full_name: String,
    /// Raw age field
    pub age: String,
    pub contact_number: String,
    pub consultation_date: String,
    pub consultation_time: String,
    pub has_senior_pwd_id: bool,
    pub refill_cycle: RefillCycle,
}

impl UserProfile {
    /// Apply a completed registration to this profile.
    pub fn register(&self, data: &OnboardingData) -> Result<Self, ModelError> {
        let name = data.full_name.trim();
        if name.is_empty() {
            return Err(ModelError::InvalidOnboarding("full name is required".into()));
        }
        let age: u32 = data
            .age
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidOnboarding(format!("age '{}' is not a number", data.age)))?;

        Ok(Self {
            name: name.to_string(),
            age,
            next_consultation: Some(format!(
                "{} at {}",
                data.consultation_date, data.consultation_time
            )),
            is_registered: true,
            has_senior_pwd_id: data.has_senior_pwd_id,
            refill_cycle: data.refill_cycle,
            emergency_contact: Some(data.contact_number.clone()).filter(|c| !c.trim().is_empty()),
            ..self.clone()
        })
    }
}

/// Patient-side appointment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Completed,
    Upcoming,
    Cancelled,
    Missed,
}

/// An entry in the patient's appointment history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub kind: super::ConsultKind,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub prescription_updated: bool,
    #[serde(default)]
    pub labs_requested: Vec<String>,
}

/// Category of a dashboard notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Refill,
    Appointment,
    Lab,
    Medication,
    System,
}

/// A dashboard notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppNotification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub read: bool,
    #[serde(default)]
    pub action_label: Option<String>,
}

/// Review status of an uploaded prescription photo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    PendingReview,
    Verified,
    Rejected,
}

/// A prescription photo submitted for pharmacist review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionUpload {
    pub id: String,
    pub upload_date: NaiveDate,
    pub file_name: String,
    pub status: UploadStatus,
    #[serde(default)]
    pub pharmacist_notes: Option<String>,
    #[serde(default)]
    pub medications_extracted: Vec<String>,
}

impl PrescriptionUpload {
    /// Create an upload awaiting pharmacist review.
    pub fn new(file_name: String, upload_date: NaiveDate, medications: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            upload_date,
            file_name,
            status: UploadStatus::PendingReview,
            pharmacist_notes: None,
            medications_extracted: medications,
        }
    }
}

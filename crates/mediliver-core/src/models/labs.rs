//! Laboratory test and result models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Interpretation of a single result row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabFlag {
    Normal,
    High,
    Low,
    Critical,
}

/// One measured parameter of a lab test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResult {
    pub parameter: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
    pub flag: LabFlag,
}

/// Patient-side lab test status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabTestStatus {
    Pending,
    Scheduled,
    Completed,
}

/// A lab test requested for the patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabTest {
    pub id: String,
    pub name: String,
    pub category: String,
    pub status: LabTestStatus,
    pub requested_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub lab_facility: Option<String>,
    #[serde(default)]
    pub results: Vec<LabResult>,
    #[serde(default)]
    pub doctor_notes: Option<String>,
}

impl LabTest {
    /// Result rows outside the reference range.
    pub fn abnormal_results(&self) -> impl Iterator<Item = &LabResult> {
        self.results.iter().filter(|r| r.flag != LabFlag::Normal)
    }
}

/// A completed lab result awaiting physician acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorLabReview {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub test_name: String,
    pub completed_date: NaiveDate,
    /// Flips false → true once, on acknowledgement
    pub reviewed: bool,
    pub results: Vec<LabResult>,
}

impl DoctorLabReview {
    /// Any result row flagged other than normal.
    pub fn flagged(&self) -> bool {
        self.results.iter().any(|r| r.flag != LabFlag::Normal)
    }
}

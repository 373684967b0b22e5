//! Vital-sign trend evaluation and clinical flagging.
//!
//! Trends compare the two most recent readings of one kind. Lower is treated as
//! improving for every kind. Flags are display classifications, not alerts.

mod intake;

pub use intake::*;

use serde::{Deserialize, Serialize};

use crate::models::VitalReading;

/// Changes at or below this percentage are reported as stable.
pub const STABLE_THRESHOLD_PERCENT: f64 = 2.0;

/// Direction of the latest change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

/// Blood pressure classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PressureStatus {
    Normal,
    Elevated,
    High,
}

/// Fasting blood sugar classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SugarStatus {
    Normal,
    PreDiabetic,
    Diabetic,
}

/// Trend of a series of readings of one kind.
pub fn trend(readings: &[VitalReading]) -> Trend {
    if readings.len() < 2 {
        return Trend::Stable;
    }

    let mut sorted: Vec<&VitalReading> = readings.iter().collect();
    sorted.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

    compare(sorted[1].comparison_value(), sorted[0].comparison_value())
}

/// Trend between a previous and a current value.
pub fn compare(previous: f64, current: f64) -> Trend {
    if previous == 0.0 {
        return Trend::Stable;
    }
    let change = ((current - previous) / previous).abs() * 100.0;
    if change <= STABLE_THRESHOLD_PERCENT {
        Trend::Stable
    } else if current < previous {
        Trend::Improving
    } else {
        Trend::Worsening
    }
}

/// Classify a blood pressure reading.
pub fn pressure_status(systolic: u16, diastolic: u16) -> PressureStatus {
    if systolic >= 140 || diastolic >= 90 {
        PressureStatus::High
    } else if systolic >= 130 || diastolic >= 85 {
        PressureStatus::Elevated
    } else {
        PressureStatus::Normal
    }
}

/// Classify a blood sugar value in mg/dL.
pub fn sugar_status(value: f64) -> SugarStatus {
    if value >= 126.0 {
        SugarStatus::Diabetic
    } else if value >= 100.0 {
        SugarStatus::PreDiabetic
    } else {
        SugarStatus::Normal
    }
}

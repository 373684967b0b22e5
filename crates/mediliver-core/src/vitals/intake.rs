//! Reading intake from form input, and per-kind summaries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{pressure_status, sugar_status, trend, PressureStatus, SugarStatus, Trend};
use crate::models::{Measurement, VitalKind, VitalReading, VitalSource};

/// Raw form input for a new reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingInput<'a> {
    Pressure { systolic: &'a str, diastolic: &'a str },
    Scalar(&'a str),
}

/// Turn self-reported form input into a reading.
///
/// Returns `None` when the input is not numeric, not positive, or does not match the
/// kind; nothing is recorded in that case.
pub fn parse_reading(
    kind: VitalKind,
    input: ReadingInput<'_>,
    recorded_at: NaiveDateTime,
) -> Option<VitalReading> {
    match (kind, input) {
        (VitalKind::BloodPressure, ReadingInput::Pressure { systolic, diastolic }) => {
            let systolic = systolic.trim().parse::<u16>().ok().filter(|v| *v > 0)?;
            let diastolic = diastolic.trim().parse::<u16>().ok().filter(|v| *v > 0)?;
            Some(VitalReading::pressure(
                systolic,
                diastolic,
                recorded_at,
                VitalSource::SelfReported,
            ))
        }
        (VitalKind::BloodPressure, ReadingInput::Scalar(_)) => None,
        (_, ReadingInput::Pressure { .. }) => None,
        (kind, ReadingInput::Scalar(raw)) => {
            let raw = raw.trim();
            let value = raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)?;
            let mut reading =
                VitalReading::scalar(kind, value, recorded_at, VitalSource::SelfReported);
            reading.value = raw.to_string();
            Some(reading)
        }
    }
}

/// Readings of one kind, newest first.
pub fn series(readings: &[VitalReading], kind: VitalKind) -> Vec<VitalReading> {
    let mut out: Vec<VitalReading> = readings.iter().filter(|r| r.kind == kind).cloned().collect();
    out.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    out
}

/// Clinical flag of a single reading, for kinds that have one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingFlag {
    Pressure(PressureStatus),
    Sugar(SugarStatus),
}

/// Flag a reading against clinical thresholds.
pub fn flag(reading: &VitalReading) -> Option<ReadingFlag> {
    match (reading.kind, reading.measurement) {
        (VitalKind::BloodPressure, Measurement::Pressure { systolic, diastolic }) => {
            Some(ReadingFlag::Pressure(pressure_status(systolic, diastolic)))
        }
        (VitalKind::BloodSugar, Measurement::Scalar { value }) => {
            Some(ReadingFlag::Sugar(sugar_status(value)))
        }
        _ => None,
    }
}

/// Dashboard card for one vital kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalsSummary {
    pub kind: VitalKind,
    pub label: String,
    pub unit: String,
    pub latest: Option<VitalReading>,
    pub trend: Trend,
    pub flag: Option<ReadingFlag>,
    pub reading_count: usize,
}

/// Summaries for every vital kind, in display order.
pub fn summarize(readings: &[VitalReading]) -> Vec<VitalsSummary> {
    VitalKind::ALL
        .iter()
        .map(|&kind| {
            let of_kind = series(readings, kind);
            let latest = of_kind.first().cloned();
            VitalsSummary {
                kind,
                label: kind.label().to_string(),
                unit: kind.unit().to_string(),
                flag: latest.as_ref().and_then(flag),
                trend: trend(&of_kind),
                reading_count: of_kind.len(),
                latest,
            }
        })
        .collect()
}

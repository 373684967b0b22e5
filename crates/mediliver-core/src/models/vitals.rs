//! Vital-sign reading models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Kind of vital sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    BloodPressure,
    BloodSugar,
    Weight,
    HeartRate,
}

impl VitalKind {
    pub const ALL: [VitalKind; 4] = [
        VitalKind::BloodPressure,
        VitalKind::BloodSugar,
        VitalKind::Weight,
        VitalKind::HeartRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VitalKind::BloodPressure => "Blood Pressure",
            VitalKind::BloodSugar => "Blood Sugar",
            VitalKind::Weight => "Weight",
            VitalKind::HeartRate => "Heart Rate",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            VitalKind::BloodPressure => "mmHg",
            VitalKind::BloodSugar => "mg/dL",
            VitalKind::Weight => "kg",
            VitalKind::HeartRate => "bpm",
        }
    }

    /// Parse the wire name (e.g., "blood_pressure").
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "blood_pressure" => Some(VitalKind::BloodPressure),
            "blood_sugar" => Some(VitalKind::BloodSugar),
            "weight" => Some(VitalKind::Weight),
            "heart_rate" => Some(VitalKind::HeartRate),
            _ => None,
        }
    }
}

/// Where a reading came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VitalSource {
    #[serde(rename = "self")]
    SelfReported,
    Lab,
    Clinic,
}

/// Measured value. Pressure readings carry both numbers, everything else one scalar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Pressure { systolic: u16, diastolic: u16 },
    Scalar { value: f64 },
}

/// One measurement. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalReading {
    pub id: String,
    pub kind: VitalKind,
    /// Display string (e.g., "130/85", "118")
    pub value: String,
    pub measurement: Measurement,
    pub recorded_at: NaiveDateTime,
    pub source: VitalSource,
    #[serde(default)]
    pub notes: Option<String>,
}

impl VitalReading {
    /// Create a blood-pressure reading.
    pub fn pressure(
        systolic: u16,
        diastolic: u16,
        recorded_at: NaiveDateTime,
        source: VitalSource,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: VitalKind::BloodPressure,
            value: format!("{}/{}", systolic, diastolic),
            measurement: Measurement::Pressure { systolic, diastolic },
            recorded_at,
            source,
            notes: None,
        }
    }

    /// Create a scalar reading for a non-pressure kind.
    pub fn scalar(
        kind: VitalKind,
        value: f64,
        recorded_at: NaiveDateTime,
        source: VitalSource,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            value: value.to_string(),
            measurement: Measurement::Scalar { value },
            recorded_at,
            source,
            notes: None,
        }
    }

    /// Value used for trend comparison: systolic for pressure, the scalar otherwise.
    pub fn comparison_value(&self) -> f64 {
        match self.measurement {
            Measurement::Pressure { systolic, .. } => f64::from(systolic),
            Measurement::Scalar { value } => value,
        }
    }

    /// Check that the measurement shape matches the kind.
    pub fn validate(&self) -> Result<(), ModelError> {
        let is_pressure = matches!(self.measurement, Measurement::Pressure { .. });
        if is_pressure != (self.kind == VitalKind::BloodPressure) {
            return Err(ModelError::InvalidReading {
                id: self.id.clone(),
                reason: format!("{:?} reading carries {:?}", self.kind, self.measurement),
            });
        }
        if let Measurement::Scalar { value } = self.measurement {
            if !value.is_finite() {
                return Err(ModelError::InvalidReading {
                    id: self.id.clone(),
                    reason: "non-finite value".into(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_source_wire_name() {
        let json = serde_json::to_string(&VitalSource::SelfReported).unwrap();
        assert_eq!(json, "\"self\"");
    }

    #[test]
    fn test_comparison_value() {
        let bp = VitalReading::pressure(130, 85, at("2026-02-18T08:00:00"), VitalSource::SelfReported);
        assert_eq!(bp.comparison_value(), 130.0);
        assert_eq!(bp.value, "130/85");

        let sugar = VitalReading::scalar(VitalKind::BloodSugar, 118.0, at("2026-02-18T07:00:00"), VitalSource::Lab);
        assert_eq!(sugar.comparison_value(), 118.0);
    }

    #[test]
    fn test_validate_shape_matches_kind() {
        let mut reading = VitalReading::scalar(VitalKind::Weight, 65.0, at("2026-02-15T08:00:00"), VitalSource::Clinic);
        assert!(reading.validate().is_ok());

        reading.kind = VitalKind::BloodPressure;
        assert!(reading.validate().is_err());

        let mut bp = VitalReading::pressure(120, 80, at("2026-02-15T08:00:00"), VitalSource::Clinic);
        bp.kind = VitalKind::HeartRate;
        assert!(bp.validate().is_err());
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(VitalKind::BloodSugar.unit(), "mg/dL");
        assert_eq!(VitalKind::HeartRate.label(), "Heart Rate");
        assert_eq!(VitalKind::from_wire("weight"), Some(VitalKind::Weight));
        assert_eq!(VitalKind::from_wire("temperature"), None);
    }
}

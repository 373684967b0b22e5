//! Prescription analysis parsing and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::TIMING_VALUES;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Medication {index} is missing {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Medication {index} has unknown timing '{value}'")]
    InvalidTiming { index: usize, value: String },
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Period of the day a medication is taken.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Timing {
    Morning,
    Afternoon,
    Evening,
    #[serde(rename = "Before Bed")]
    BeforeBed,
}

impl Timing {
    pub fn label(&self) -> &'static str {
        match self {
            Timing::Morning => TIMING_VALUES[0],
            Timing::Afternoon => TIMING_VALUES[1],
            Timing::Evening => TIMING_VALUES[2],
            Timing::BeforeBed => TIMING_VALUES[3],
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Morning" => Some(Timing::Morning),
            "Afternoon" => Some(Timing::Afternoon),
            "Evening" => Some(Timing::Evening),
            "Before Bed" => Some(Timing::BeforeBed),
            _ => None,
        }
    }
}

/// A validated medication read from a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedMedication {
    pub name: String,
    pub dosage: String,
    pub timing: Timing,
    /// Empty when the model gave none
    pub frequency: String,
    pub instruction: String,
}

/// Validated prescription analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionAnalysis {
    pub medications: Vec<ExtractedMedication>,
    /// Plain-language summary of how to take the medications
    pub summary: String,
    pub warnings: Vec<String>,
}

/// Model output before validation. Every field may be missing.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    medications: Option<Vec<RawMedication>>,
    summary: Option<String>,
    warnings: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawMedication {
    name: Option<String>,
    dosage: Option<String>,
    timing: Option<String>,
    frequency: Option<String>,
    instruction: Option<String>,
}

/// Parse and validate the model's JSON answer.
///
/// Required fields must be present and non-blank and timing must be one of the four
/// periods. Anything else fails the whole analysis.
pub fn parse_prescription_analysis(text: &str) -> ExtractionResult<PrescriptionAnalysis> {
    let json_start = text.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = text.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat("Unbalanced braces in response".into()));
    }

    let raw: RawAnalysis = serde_json::from_str(&text[json_start..=json_end])?;

    let medications = raw
        .medications
        .ok_or_else(|| ExtractionError::InvalidFormat("missing medications".into()))?
        .into_iter()
        .enumerate()
        .map(|(index, med)| validate_medication(index, med))
        .collect::<ExtractionResult<Vec<_>>>()?;
    let summary = raw
        .summary
        .ok_or_else(|| ExtractionError::InvalidFormat("missing summary".into()))?;
    let warnings = raw
        .warnings
        .ok_or_else(|| ExtractionError::InvalidFormat("missing warnings".into()))?;

    Ok(PrescriptionAnalysis {
        medications,
        summary: summary.trim().to_string(),
        warnings,
    })
}

fn required(index: usize, field: &'static str, value: Option<String>) -> ExtractionResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ExtractionError::MissingField { index, field })
}

fn validate_medication(index: usize, raw: RawMedication) -> ExtractionResult<ExtractedMedication> {
    let name = required(index, "name", raw.name)?;
    let dosage = required(index, "dosage", raw.dosage)?;
    let timing_raw = required(index, "timing", raw.timing)?;
    let instruction = required(index, "instruction", raw.instruction)?;

    let timing = Timing::parse(&timing_raw).ok_or(ExtractionError::InvalidTiming {
        index,
        value: timing_raw,
    })?;

    Ok(ExtractedMedication {
        name,
        dosage,
        timing,
        frequency: raw.frequency.map(|f| f.trim().to_string()).unwrap_or_default(),
        instruction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "medications": [
            {"id": "a", "name": "Atorvastatin", "dosage": "20mg", "timing": "Before Bed",
             "frequency": "Once a day", "instruction": "Take at night"}
        ],
        "summary": "Take one tablet of Atorvastatin every night.",
        "warnings": ["Avoid grapefruit juice"]
    }"#;

    #[test]
    fn test_parse_valid() {
        let analysis = parse_prescription_analysis(VALID).unwrap();
        assert_eq!(analysis.medications.len(), 1);
        assert_eq!(analysis.medications[0].timing, Timing::BeforeBed);
        assert_eq!(analysis.medications[0].frequency, "Once a day");
        assert_eq!(analysis.warnings, vec!["Avoid grapefruit juice"]);
    }

    #[test]
    fn test_parse_with_surrounding_text() {
        let text = format!("Here is the analysis:\n```json\n{}\n```", VALID);
        assert!(parse_prescription_analysis(&text).is_ok());
    }

    #[test]
    fn test_frequency_optional() {
        let text = r#"{"medications":[{"name":"Metformin","dosage":"500mg","timing":"Evening","instruction":"With dinner"}],"summary":"ok","warnings":[]}"#;
        let analysis = parse_prescription_analysis(text).unwrap();
        assert_eq!(analysis.medications[0].frequency, "");
    }

    #[test]
    fn test_rejects_unknown_timing() {
        let text = r#"{"medications":[{"name":"Metformin","dosage":"500mg","timing":"Noon","instruction":"With lunch"}],"summary":"ok","warnings":[]}"#;
        let err = parse_prescription_analysis(text).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidTiming { index: 0, .. }));
    }

    #[test]
    fn test_rejects_blank_required_field() {
        let text = r#"{"medications":[{"name":"  ","dosage":"500mg","timing":"Evening","instruction":"With dinner"}],"summary":"ok","warnings":[]}"#;
        let err = parse_prescription_analysis(text).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_rejects_missing_top_level() {
        let err = parse_prescription_analysis(r#"{"medications":[],"summary":"ok"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(
            parse_prescription_analysis("I could not read the image."),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_prescription_analysis("{ not json }"),
            Err(ExtractionError::JsonParse(_))
        ));
    }
}

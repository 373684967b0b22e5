//! Daily medication schedule and pack reconciliation.

use serde::{Deserialize, Serialize};

use crate::models::{DosePeriod, Medication};

/// Jaro-Winkler similarity at or above which two names are the same medication.
pub const SAME_MEDICATION_SIMILARITY: f64 = 0.9;

/// Medications due in one period of the day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleSlot {
    pub period: DosePeriod,
    pub medications: Vec<Medication>,
}

/// Group medications by period in display order, skipping empty periods.
pub fn group_by_period(medications: &[Medication]) -> Vec<ScheduleSlot> {
    DosePeriod::ORDERED
        .iter()
        .filter_map(|&period| {
            let due: Vec<Medication> = medications
                .iter()
                .filter(|m| m.timing == period)
                .cloned()
                .collect();
            (!due.is_empty()).then_some(ScheduleSlot {
                period,
                medications: due,
            })
        })
        .collect()
}

/// Whether two medication names refer to the same drug.
pub fn is_same_medication(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    strsim::jaro_winkler(&a, &b) >= SAME_MEDICATION_SIMILARITY
}

/// Outcome of adding newly extracted medications to the pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MergeOutcome {
    /// New entries, awaiting pharmacist verification
    pub added: Vec<Medication>,
    /// Entries matching something already in the pack at the same period
    pub duplicates: Vec<Medication>,
}

/// Split incoming medications into new entries and duplicates of the current pack.
///
/// Added entries are always unverified; a pharmacist confirms them later.
pub fn merge_new_medications(current: &[Medication], incoming: Vec<Medication>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for mut med in incoming {
        let known = current
            .iter()
            .chain(outcome.added.iter())
            .any(|existing| existing.timing == med.timing && is_same_medication(&existing.name, &med.name));

        if known {
            outcome.duplicates.push(med);
        } else {
            med.pharmacist_verified = false;
            outcome.added.push(med);
        }
    }

    tracing::debug!(
        added = outcome.added.len(),
        duplicates = outcome.duplicates.len(),
        "merged extracted medications"
    );
    outcome
}

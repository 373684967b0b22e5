//! Domain models for the Mediliver system.

mod doctor;
mod labs;
mod medication;
mod patient;
mod pharmacy;
mod vitals;

pub use doctor::*;
pub use labs::*;
pub use medication::*;
pub use patient::*;
pub use pharmacy::*;
pub use vitals::*;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Invariant violations detected when records cross the system boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid medication log {id}: {reason}")]
    InvalidLog { id: String, reason: String },

    #[error("Invalid vital reading {id}: {reason}")]
    InvalidReading { id: String, reason: String },

    #[error("Invalid pharmacy order {id}: {reason}")]
    InvalidOrder { id: String, reason: String },

    #[error("Unsupported refill cycle: {0} days")]
    InvalidRefillCycle(u16),

    #[error("Invalid registration: {0}")]
    InvalidOnboarding(String),
}

/// Treat a missing, null or empty timestamp as absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<NaiveDateTime>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

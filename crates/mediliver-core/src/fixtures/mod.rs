//! Embedded demo data.
//!
//! Every data set is parsed into its typed schema and checked against the record
//! invariants before it is handed out.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    AppNotification, Appointment, DoctorConsult, DoctorLabReview, LabTest, Medication,
    MedicationLog, ModelError, PharmacyOrder, PrescriptionUpload, UserProfile, VitalReading,
};
use crate::session::AppState;

/// Fixture loading errors.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Fixture {name} is malformed: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Fixture {name} failed validation: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: ModelError,
    },
}

pub type FixtureResult<T> = Result<T, FixtureError>;

const PROFILE: &str = include_str!("data/profile.json");
const MEDICATIONS: &str = include_str!("data/medications.json");
const MEDICATION_LOGS: &str = include_str!("data/medication_logs.json");
const VITALS: &str = include_str!("data/vitals.json");
const LAB_TESTS: &str = include_str!("data/lab_tests.json");
const APPOINTMENTS: &str = include_str!("data/appointments.json");
const NOTIFICATIONS: &str = include_str!("data/notifications.json");
const UPLOADS: &str = include_str!("data/uploads.json");
const PHARMACY_ORDERS: &str = include_str!("data/pharmacy_orders.json");
const DOCTOR_CONSULTS: &str = include_str!("data/doctor_consults.json");
const DOCTOR_LAB_REVIEWS: &str = include_str!("data/doctor_lab_reviews.json");

fn parse<T: DeserializeOwned>(name: &'static str, raw: &str) -> FixtureResult<T> {
    serde_json::from_str(raw).map_err(|source| FixtureError::Parse { name, source })
}

fn check<T>(
    name: &'static str,
    records: &[T],
    validate: impl Fn(&T) -> Result<(), ModelError>,
) -> FixtureResult<()> {
    records
        .iter()
        .try_for_each(&validate)
        .map_err(|source| FixtureError::Invalid { name, source })
}

pub fn profile() -> FixtureResult<UserProfile> {
    parse("profile", PROFILE)
}

pub fn medications() -> FixtureResult<Vec<Medication>> {
    parse("medications", MEDICATIONS)
}

pub fn medication_logs() -> FixtureResult<Vec<MedicationLog>> {
    let logs: Vec<MedicationLog> = parse("medication_logs", MEDICATION_LOGS)?;
    check("medication_logs", &logs, MedicationLog::validate)?;
    Ok(logs)
}

pub fn vitals() -> FixtureResult<Vec<VitalReading>> {
    let readings: Vec<VitalReading> = parse("vitals", VITALS)?;
    check("vitals", &readings, VitalReading::validate)?;
    Ok(readings)
}

pub fn lab_tests() -> FixtureResult<Vec<LabTest>> {
    parse("lab_tests", LAB_TESTS)
}

pub fn appointments() -> FixtureResult<Vec<Appointment>> {
    parse("appointments", APPOINTMENTS)
}

pub fn notifications() -> FixtureResult<Vec<AppNotification>> {
    parse("notifications", NOTIFICATIONS)
}

pub fn uploads() -> FixtureResult<Vec<PrescriptionUpload>> {
    parse("uploads", UPLOADS)
}

pub fn pharmacy_orders() -> FixtureResult<Vec<PharmacyOrder>> {
    let orders: Vec<PharmacyOrder> = parse("pharmacy_orders", PHARMACY_ORDERS)?;
    check("pharmacy_orders", &orders, PharmacyOrder::validate)?;
    Ok(orders)
}

pub fn doctor_consults() -> FixtureResult<Vec<DoctorConsult>> {
    parse("doctor_consults", DOCTOR_CONSULTS)
}

pub fn doctor_lab_reviews() -> FixtureResult<Vec<DoctorLabReview>> {
    parse("doctor_lab_reviews", DOCTOR_LAB_REVIEWS)
}

impl AppState {
    /// Signed-out state populated with the demo data.
    pub fn demo() -> FixtureResult<Self> {
        let state = AppState {
            medications: medications()?,
            medication_logs: medication_logs()?,
            vitals: vitals()?,
            lab_tests: lab_tests()?,
            appointments: appointments()?,
            notifications: notifications()?,
            uploads: uploads()?,
            orders: pharmacy_orders()?,
            consults: doctor_consults()?,
            lab_reviews: doctor_lab_reviews()?,
            ..AppState::new(profile()?)
        };
        tracing::debug!(
            orders = state.orders.len(),
            consults = state.consults.len(),
            "demo state loaded"
        );
        Ok(state)
    }
}

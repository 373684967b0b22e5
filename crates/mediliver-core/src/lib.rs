//! Mediliver Core Library
//!
//! Chronic-care medicine subscription and telehealth core for Filipino seniors.
//!
//! # Architecture
//!
//! ```text
//!   Patient portal          Pharmacy portal            Doctor portal
//!        │                        │                          │
//!        └────────────── Action ──┴──────────────────────────┘
//!                                 │
//!                      session::reduce(&AppState, Action)
//!                                 │
//!        ┌───────────┬────────────┼─────────────┬──────────────┐
//!        ▼           ▼            ▼             ▼              ▼
//!    adherence     vitals   lifecycle::order  lifecycle::   pricing
//!    calendar      trends   (stage + Rx)      consult       (SC/PWD)
//! ```
//!
//! # Core Principle
//!
//! **Nothing advances on its own.** Orders, prescriptions and consults only move on an
//! explicit action, and a move the state machine does not allow is a no-op.
//!
//! # Modules
//!
//! - [`models`]: Domain types (MedicationLog, VitalReading, PharmacyOrder, etc.)
//! - [`adherence`]: Seven-day adherence calendar and percentage
//! - [`vitals`]: Trend evaluation, clinical flags, reading intake
//! - [`lifecycle`]: Order and consultation state machines
//! - [`pricing`]: Subscription price and the senior/PWD discount
//! - [`schedule`]: Daily schedule and medication reconciliation
//! - [`session`]: Demo sign-in, checkout, application state and reducer
//! - [`latency`]: Simulated network delay with timeout and cancellation
//! - [`assistant`]: Prescription scanning and health guidance
//! - [`config`]: Layered runtime settings
//! - [`fixtures`]: Embedded demo data

pub mod adherence;
pub mod assistant;
pub mod config;
pub mod fixtures;
pub mod latency;
pub mod lifecycle;
pub mod models;
pub mod pricing;
pub mod schedule;
pub mod session;
pub mod telemetry;
pub mod vitals;

// Re-export commonly used types
pub use adherence::{AdherenceReport, DayStatus};
pub use config::Settings;
pub use lifecycle::Transition;
pub use models::{
    DoctorConsult, DoctorLabReview, DosePeriod, Medication, MedicationLog, OrderStatus,
    PharmacyOrder, PrescriptionStatus, RefillCycle, VitalKind, VitalReading,
};
pub use pricing::{format_php, Invoice, PriceBook};
pub use session::{reduce, Action, AppState, AuthSession, UserRole};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use assistant::AssistantModel;
use latency::CancelToken;
use mediliver_llm::Assistant;
use session::{DoctorView, PatientView, PaymentMethod, PharmacyView};
use vitals::{ReadingFlag, ReadingInput};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MediliverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sign-in failed: {0}")]
    AuthError(String),

    #[error("Request interrupted: {0}")]
    Interrupted(String),

    #[error("Assistant error: {0}")]
    AssistantError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Fixture error: {0}")]
    FixtureError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State error: {0}")]
    StateError(String),
}

impl From<session::AuthError> for MediliverError {
    fn from(e: session::AuthError) -> Self {
        match e {
            session::AuthError::Latency(inner) => inner.into(),
            other => MediliverError::AuthError(other.to_string()),
        }
    }
}

impl From<latency::LatencyError> for MediliverError {
    fn from(e: latency::LatencyError) -> Self {
        MediliverError::Interrupted(e.to_string())
    }
}

impl From<mediliver_llm::AssistantError> for MediliverError {
    fn from(e: mediliver_llm::AssistantError) -> Self {
        MediliverError::AssistantError(e.to_string())
    }
}

impl From<config::ConfigError> for MediliverError {
    fn from(e: config::ConfigError) -> Self {
        MediliverError::ConfigError(e.to_string())
    }
}

impl From<fixtures::FixtureError> for MediliverError {
    fn from(e: fixtures::FixtureError) -> Self {
        MediliverError::FixtureError(e.to_string())
    }
}

impl From<models::ModelError> for MediliverError {
    fn from(e: models::ModelError) -> Self {
        MediliverError::InvalidInput(e.to_string())
    }
}

impl From<chrono::ParseError> for MediliverError {
    fn from(e: chrono::ParseError) -> Self {
        MediliverError::InvalidInput(format!("Bad date: {}", e))
    }
}

impl From<serde_json::Error> for MediliverError {
    fn from(e: serde_json::Error) -> Self {
        MediliverError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MediliverError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MediliverError::StateError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a session preloaded with the demo data.
#[uniffi::export]
pub fn open_demo() -> Result<Arc<MediliverCore>, MediliverError> {
    let settings = Settings::load()?;
    Ok(Arc::new(MediliverCore::new(AppState::demo()?, settings)))
}

/// Open a session with the default profile and no history.
#[uniffi::export]
pub fn open_empty() -> Result<Arc<MediliverCore>, MediliverError> {
    let settings = Settings::load()?;
    let state = AppState::new(fixtures::profile()?);
    Ok(Arc::new(MediliverCore::new(state, settings)))
}

/// Install the log subscriber. Safe to call repeatedly.
#[uniffi::export]
pub fn init_logging() -> Result<(), MediliverError> {
    telemetry::init().map_err(|e| MediliverError::ConfigError(e.to_string()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MediliverCore {
    state: Mutex<AppState>,
    settings: Settings,
    cancel: Mutex<CancelToken>,
    assistant: Option<Assistant<AssistantModel>>,
}

impl MediliverCore {
    pub fn new(state: AppState, settings: Settings) -> Self {
        let assistant = assistant::from_settings(&settings.assistant);
        Self {
            state: Mutex::new(state),
            settings,
            cancel: Mutex::new(CancelToken::new()),
            assistant,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Result<AppState, MediliverError> {
        Ok(self.state.lock()?.clone())
    }

    /// Apply an action. Returns whether anything changed.
    pub fn dispatch(&self, action: Action) -> Result<bool, MediliverError> {
        let mut state = self.state.lock()?;
        let next = reduce(&state, action);
        let changed = next != *state;
        *state = next;
        Ok(changed)
    }

    fn cancel_token(&self) -> Result<CancelToken, MediliverError> {
        Ok(self.cancel.lock()?.clone())
    }

    fn assistant(&self) -> Result<&Assistant<AssistantModel>, MediliverError> {
        self.assistant
            .as_ref()
            .ok_or_else(|| MediliverError::ConfigError("assistant.api_key is not set".into()))
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl MediliverCore {
    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Sign in with a demo account.
    pub async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<FfiAuthSession, MediliverError> {
        let cancel = self.cancel_token()?;
        let latency = &self.settings.latency;
        let session =
            session::login(&email, &password, latency.login(), latency.timeout(), &cancel).await?;
        self.dispatch(Action::SignedIn(session.clone()))?;
        Ok(session.into())
    }

    /// Sign out. Session data stays loaded.
    pub fn logout(&self) -> Result<(), MediliverError> {
        self.dispatch(Action::SignedOut)?;
        Ok(())
    }

    pub fn current_session(&self) -> Result<Option<FfiAuthSession>, MediliverError> {
        Ok(self.state.lock()?.session.clone().map(Into::into))
    }

    /// Abort an in-flight sign-in or payment.
    pub fn cancel_pending(&self) -> Result<(), MediliverError> {
        let mut token = self.cancel.lock()?;
        token.cancel();
        *token = CancelToken::new();
        Ok(())
    }

    /// Complete registration.
    pub fn register(&self, form: FfiOnboarding) -> Result<(), MediliverError> {
        let data = form.into_onboarding()?;
        let profile = self.state.lock()?.profile.register(&data)?;
        self.dispatch(Action::Registered(profile))?;
        Ok(())
    }

    // =========================================================================
    // Checkout Operations
    // =========================================================================

    /// Price of the current profile's refill cycle: charged now, and once verified.
    pub fn checkout_quote(&self) -> Result<FfiCheckoutQuote, MediliverError> {
        let state = self.state.lock()?;
        Ok(PatientView::new(&state)
            .checkout_quote(&self.settings.pricing)
            .into())
    }

    /// Pay for the subscription with the given method label.
    ///
    /// Charges the `due_now` amount of [`Self::checkout_quote`].
    pub async fn pay(&self, method: String) -> Result<FfiReceipt, MediliverError> {
        let method = parse_payment_method(&method)?;
        let invoice = {
            let state = self.state.lock()?;
            PatientView::new(&state)
                .checkout_quote(&self.settings.pricing)
                .due_now
        };
        let cancel = self.cancel_token()?;
        let latency = &self.settings.latency;
        let paid_at = chrono::Local::now().naive_local();
        let receipt = session::pay(
            method,
            invoice,
            paid_at,
            latency.payment(),
            latency.timeout(),
            &cancel,
        )
        .await?;
        self.dispatch(Action::PaymentSettled(receipt.clone()))?;
        Ok(receipt.into())
    }

    pub fn is_subscribed(&self) -> Result<bool, MediliverError> {
        Ok(self.state.lock()?.is_subscribed())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn medications(&self) -> Result<Vec<FfiMedication>, MediliverError> {
        let state = self.state.lock()?;
        let slots = PatientView::new(&state).schedule();
        Ok(slots
            .into_iter()
            .flat_map(|slot| slot.medications)
            .map(Into::into)
            .collect())
    }

    /// Record a dose taken at `at` (ISO-8601 local time).
    pub fn record_dose_taken(
        &self,
        medication_id: String,
        period: String,
        at: String,
    ) -> Result<(), MediliverError> {
        let period = parse_period(&period)?;
        let at: NaiveDateTime = at.parse()?;
        self.dispatch(Action::DoseTaken {
            medication_id,
            period,
            at,
        })?;
        Ok(())
    }

    /// Record a dose missed on `day` (YYYY-MM-DD).
    pub fn record_dose_missed(
        &self,
        medication_id: String,
        period: String,
        day: String,
    ) -> Result<(), MediliverError> {
        let period = parse_period(&period)?;
        let day: NaiveDate = day.parse()?;
        self.dispatch(Action::DoseMissed {
            medication_id,
            period,
            day,
        })?;
        Ok(())
    }

    /// Adherence calendar for the seven days ending `today` (YYYY-MM-DD).
    pub fn adherence(&self, today: String) -> Result<FfiAdherence, MediliverError> {
        let today: NaiveDate = today.parse()?;
        let state = self.state.lock()?;
        Ok(PatientView::new(&state).adherence(today).into())
    }

    pub fn vitals_summary(&self) -> Result<Vec<FfiVitalsSummary>, MediliverError> {
        let state = self.state.lock()?;
        Ok(PatientView::new(&state)
            .vitals()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Record a self-reported reading. Returns false when the input was declined.
    pub fn record_reading(
        &self,
        kind: String,
        systolic: Option<String>,
        diastolic: Option<String>,
        value: Option<String>,
        recorded_at: String,
    ) -> Result<bool, MediliverError> {
        let kind = VitalKind::from_wire(&kind)
            .ok_or_else(|| MediliverError::InvalidInput(format!("Unknown vital kind: {}", kind)))?;
        let recorded_at: NaiveDateTime = recorded_at.parse()?;

        let input = match (&systolic, &diastolic, &value) {
            (Some(s), Some(d), _) => ReadingInput::Pressure {
                systolic: s,
                diastolic: d,
            },
            (_, _, Some(v)) => ReadingInput::Scalar(v),
            _ => return Ok(false),
        };

        match vitals::parse_reading(kind, input, recorded_at) {
            Some(reading) => self.dispatch(Action::ReadingRecorded(reading)),
            None => Ok(false),
        }
    }

    pub fn notifications(&self) -> Result<Vec<FfiNotification>, MediliverError> {
        let state = self.state.lock()?;
        Ok(PatientView::new(&state)
            .notifications()
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn unread_count(&self) -> Result<u32, MediliverError> {
        let state = self.state.lock()?;
        Ok(PatientView::new(&state).unread_count() as u32)
    }

    pub fn mark_notification_read(&self, id: String) -> Result<bool, MediliverError> {
        self.dispatch(Action::NotificationRead(id))
    }

    pub fn mark_all_notifications_read(&self) -> Result<(), MediliverError> {
        self.dispatch(Action::AllNotificationsRead)?;
        Ok(())
    }

    /// Add medications read from a prescription photo. Returns how many were new.
    pub fn record_scanned_prescription(
        &self,
        file_name: String,
        upload_date: String,
        medications: Vec<FfiMedication>,
    ) -> Result<u32, MediliverError> {
        let upload_date: NaiveDate = upload_date.parse()?;
        let medications = medications
            .into_iter()
            .map(FfiMedication::into_medication)
            .collect::<Result<Vec<_>, _>>()?;
        let names = medications.iter().map(Medication::display_name).collect();
        let upload = models::PrescriptionUpload::new(file_name, upload_date, names);

        let mut state = self.state.lock()?;
        let merged = schedule::merge_new_medications(&state.medications, medications);
        let added = merged.added.len() as u32;
        *state = reduce(
            &state,
            Action::PrescriptionScanned {
                upload,
                medications: merged.added,
            },
        );
        Ok(added)
    }

    /// Read medications from a base64 JPEG prescription photo.
    ///
    /// Nothing is recorded; pass the medications to `record_scanned_prescription` once
    /// the patient confirms them.
    pub async fn analyze_prescription(
        &self,
        image_base64: String,
    ) -> Result<FfiPrescriptionAnalysis, MediliverError> {
        let analysis = self.assistant()?.analyze_prescription(&image_base64).await?;
        Ok(FfiPrescriptionAnalysis {
            medications: analysis
                .medications
                .into_iter()
                .map(|m| assistant::to_medication(m).into())
                .collect(),
            summary: analysis.summary,
            warnings: analysis.warnings,
        })
    }

    /// Answer a health question about the patient's current medications.
    pub async fn health_guidance(&self, question: String) -> Result<String, MediliverError> {
        let medications = {
            let state = self.state.lock()?;
            state.medications.clone()
        };
        Ok(self
            .assistant()?
            .health_guidance(&question, &medications)
            .await?)
    }

    // =========================================================================
    // Pharmacy Operations
    // =========================================================================

    /// All orders, newest first.
    pub fn order_queue(&self) -> Result<Vec<FfiOrder>, MediliverError> {
        let state = self.state.lock()?;
        Ok(to_ffi_orders(PharmacyView::new(&state).order_queue()))
    }

    pub fn verification_queue(&self) -> Result<Vec<FfiOrder>, MediliverError> {
        let state = self.state.lock()?;
        Ok(to_ffi_orders(PharmacyView::new(&state).verification_queue()))
    }

    pub fn dispatch_board(&self) -> Result<Vec<FfiOrder>, MediliverError> {
        let state = self.state.lock()?;
        Ok(to_ffi_orders(PharmacyView::new(&state).dispatch_board()))
    }

    pub fn pharmacy_stats(&self, now: String) -> Result<FfiPharmacyStats, MediliverError> {
        let now: NaiveDateTime = now.parse()?;
        let state = self.state.lock()?;
        let stats = PharmacyView::new(&state).stats(now);
        Ok(FfiPharmacyStats {
            orders_today: stats.orders_today as u32,
            pending_verification: stats.pending_verification as u32,
            awaiting_dispatch: stats.awaiting_dispatch as u32,
            delivered_this_month: stats.delivered_this_month as u32,
        })
    }

    /// Move an order to its next stage. Returns false if the move was not allowed.
    pub fn advance_order(&self, order_id: String) -> Result<bool, MediliverError> {
        self.require_order(&order_id)?;
        self.dispatch(Action::OrderAdvanced(order_id))
    }

    pub fn verify_prescription(&self, order_id: String) -> Result<bool, MediliverError> {
        self.require_order(&order_id)?;
        self.dispatch(Action::PrescriptionVerified(order_id))
    }

    pub fn flag_prescription(&self, order_id: String, note: String) -> Result<bool, MediliverError> {
        self.require_order(&order_id)?;
        self.dispatch(Action::PrescriptionFlagged { order_id, note })
    }

    pub fn record_senior_pwd_id(&self, order_id: String) -> Result<bool, MediliverError> {
        self.require_order(&order_id)?;
        self.dispatch(Action::SeniorPwdIdRecorded(order_id))
    }

    pub fn order_invoice(&self, order_id: String) -> Result<FfiInvoice, MediliverError> {
        let state = self.state.lock()?;
        let order = state
            .order(&order_id)
            .ok_or_else(|| MediliverError::NotFound(format!("Order {}", order_id)))?;
        Ok(self.settings.pricing.invoice_order(order).into())
    }

    // =========================================================================
    // Doctor Operations
    // =========================================================================

    pub fn consults_today(&self, today: String) -> Result<Vec<FfiConsult>, MediliverError> {
        let today: NaiveDate = today.parse()?;
        let state = self.state.lock()?;
        Ok(to_ffi_consults(DoctorView::new(&state).today(today)))
    }

    pub fn upcoming_consults(&self) -> Result<Vec<FfiConsult>, MediliverError> {
        let state = self.state.lock()?;
        Ok(to_ffi_consults(DoctorView::new(&state).upcoming()))
    }

    pub fn past_consults(&self) -> Result<Vec<FfiConsult>, MediliverError> {
        let state = self.state.lock()?;
        Ok(to_ffi_consults(DoctorView::new(&state).past()))
    }

    pub fn start_consult(&self, consult_id: String) -> Result<bool, MediliverError> {
        self.require_consult(&consult_id)?;
        self.dispatch(Action::ConsultStarted(consult_id))
    }

    pub fn complete_consult(
        &self,
        consult_id: String,
        notes: Option<String>,
    ) -> Result<bool, MediliverError> {
        self.require_consult(&consult_id)?;
        self.dispatch(Action::ConsultCompleted { consult_id, notes })
    }

    pub fn cancel_consult(&self, consult_id: String) -> Result<bool, MediliverError> {
        self.require_consult(&consult_id)?;
        self.dispatch(Action::ConsultCancelled(consult_id))
    }

    /// Unacknowledged lab reviews, flagged first.
    pub fn lab_reviews_pending(&self) -> Result<Vec<FfiLabReview>, MediliverError> {
        let state = self.state.lock()?;
        Ok(DoctorView::new(&state)
            .needs_review()
            .into_iter()
            .map(FfiLabReview::from)
            .collect())
    }

    pub fn acknowledge_lab_review(&self, review_id: String) -> Result<bool, MediliverError> {
        if self.state.lock()?.lab_review(&review_id).is_none() {
            return Err(MediliverError::NotFound(format!("Lab review {}", review_id)));
        }
        self.dispatch(Action::LabReviewAcknowledged(review_id))
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Full session state as JSON.
    pub fn export_state_json(&self) -> Result<String, MediliverError> {
        let state = self.state.lock()?;
        Ok(serde_json::to_string_pretty(&*state)?)
    }
}

impl MediliverCore {
    fn require_order(&self, id: &str) -> Result<(), MediliverError> {
        match self.state.lock()?.order(id) {
            Some(_) => Ok(()),
            None => Err(MediliverError::NotFound(format!("Order {}", id))),
        }
    }

    fn require_consult(&self, id: &str) -> Result<(), MediliverError> {
        match self.state.lock()?.consult(id) {
            Some(_) => Ok(()),
            None => Err(MediliverError::NotFound(format!("Consult {}", id))),
        }
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// Wire name of a serde enum (e.g., `pending_verification`).
fn wire_name<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => format!("{:?}", value),
    }
}

fn parse_period(label: &str) -> Result<DosePeriod, MediliverError> {
    DosePeriod::from_label(label)
        .ok_or_else(|| MediliverError::InvalidInput(format!("Unknown dose period: {}", label)))
}

fn parse_payment_method(label: &str) -> Result<PaymentMethod, MediliverError> {
    PaymentMethod::ALL
        .into_iter()
        .find(|m| m.label().eq_ignore_ascii_case(label) || wire_name(m) == label)
        .ok_or_else(|| MediliverError::InvalidInput(format!("Unknown payment method: {}", label)))
}

fn to_ffi_orders(orders: Vec<&PharmacyOrder>) -> Vec<FfiOrder> {
    orders.into_iter().map(FfiOrder::from).collect()
}

fn to_ffi_consults(consults: Vec<&DoctorConsult>) -> Vec<FfiConsult> {
    consults.into_iter().map(FfiConsult::from).collect()
}

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAuthSession {
    pub role: String,
    pub name: String,
    pub email: String,
}

impl From<AuthSession> for FfiAuthSession {
    fn from(session: AuthSession) -> Self {
        Self {
            role: wire_name(&session.role),
            name: session.name,
            email: session.email,
        }
    }
}

/// FFI-safe registration form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOnboarding {
    pub full_name: String,
    pub age: String,
    pub contact_number: String,
    pub consultation_date: String,
    pub consultation_time: String,
    pub has_senior_pwd_id: bool,
    pub refill_cycle_days: u16,
}

impl FfiOnboarding {
    fn into_onboarding(self) -> Result<models::OnboardingData, MediliverError> {
        Ok(models::OnboardingData {
            full_name: self.full_name,
            age: self.age,
            contact_number: self.contact_number,
            consultation_date: self.consultation_date,
            consultation_time: self.consultation_time,
            has_senior_pwd_id: self.has_senior_pwd_id,
            refill_cycle: RefillCycle::try_from(self.refill_cycle_days)?,
        })
    }
}

/// FFI-safe invoice.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInvoice {
    pub refill_cycle_days: u16,
    pub base_centavos: i64,
    pub discount_centavos: i64,
    pub total_centavos: i64,
    pub discounted: bool,
    pub total_display: String,
}

impl From<Invoice> for FfiInvoice {
    fn from(invoice: Invoice) -> Self {
        Self {
            refill_cycle_days: invoice.refill_cycle.days(),
            base_centavos: invoice.base_centavos,
            discount_centavos: invoice.discount_centavos,
            total_centavos: invoice.total_centavos,
            discounted: invoice.discounted,
            total_display: invoice.total_display(),
        }
    }
}

/// FFI-safe prescription analysis.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionAnalysis {
    pub medications: Vec<FfiMedication>,
    pub summary: String,
    pub warnings: Vec<String>,
}

/// FFI-safe checkout quote.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCheckoutQuote {
    pub due_now: FfiInvoice,
    pub once_verified: FfiInvoice,
}

impl From<pricing::CheckoutQuote> for FfiCheckoutQuote {
    fn from(quote: pricing::CheckoutQuote) -> Self {
        Self {
            due_now: quote.due_now.into(),
            once_verified: quote.once_verified.into(),
        }
    }
}

/// FFI-safe payment receipt.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReceipt {
    pub id: String,
    pub method: String,
    pub invoice: FfiInvoice,
    pub paid_at: String,
}

impl From<session::PaymentReceipt> for FfiReceipt {
    fn from(receipt: session::PaymentReceipt) -> Self {
        Self {
            id: receipt.id,
            method: receipt.method.label().to_string(),
            invoice: receipt.invoice.into(),
            paid_at: receipt.paid_at.to_string(),
        }
    }
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub timing: String,
    pub frequency: String,
    pub instruction: String,
    pub pharmacist_verified: bool,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            id: med.id,
            name: med.name,
            dosage: med.dosage,
            timing: med.timing.label().to_string(),
            frequency: med.frequency,
            instruction: med.instruction,
            pharmacist_verified: med.pharmacist_verified,
        }
    }
}

impl FfiMedication {
    fn into_medication(self) -> Result<Medication, MediliverError> {
        let timing = parse_period(&self.timing)?;
        let mut med = Medication::new(self.name, self.dosage, timing);
        if !self.id.is_empty() {
            med.id = self.id;
        }
        med.frequency = self.frequency;
        med.instruction = self.instruction;
        Ok(med)
    }
}

/// FFI-safe calendar day.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDayMark {
    pub date: String,
    pub status: String,
}

/// FFI-safe adherence report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdherence {
    pub days: Vec<FfiDayMark>,
    pub total_past: u32,
    pub total_taken: u32,
    pub percent: u8,
}

impl From<AdherenceReport> for FfiAdherence {
    fn from(report: AdherenceReport) -> Self {
        Self {
            days: report
                .days
                .iter()
                .map(|d| FfiDayMark {
                    date: d.date.to_string(),
                    status: wire_name(&d.status),
                })
                .collect(),
            total_past: report.total_past,
            total_taken: report.total_taken,
            percent: report.percent,
        }
    }
}

/// FFI-safe vitals card.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVitalsSummary {
    pub kind: String,
    pub label: String,
    pub unit: String,
    pub latest_value: Option<String>,
    pub latest_recorded_at: Option<String>,
    pub trend: String,
    pub flag: Option<String>,
    pub reading_count: u32,
}

impl From<vitals::VitalsSummary> for FfiVitalsSummary {
    fn from(summary: vitals::VitalsSummary) -> Self {
        Self {
            kind: wire_name(&summary.kind),
            label: summary.label,
            unit: summary.unit,
            latest_value: summary.latest.as_ref().map(|r| r.value.clone()),
            latest_recorded_at: summary.latest.as_ref().map(|r| r.recorded_at.to_string()),
            trend: wire_name(&summary.trend),
            flag: summary.flag.map(|flag| match flag {
                ReadingFlag::Pressure(status) => wire_name(&status),
                ReadingFlag::Sugar(status) => wire_name(&status),
            }),
            reading_count: summary.reading_count as u32,
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub timestamp: String,
    pub read: bool,
    pub action_label: Option<String>,
}

impl From<models::AppNotification> for FfiNotification {
    fn from(n: models::AppNotification) -> Self {
        Self {
            id: n.id,
            kind: wire_name(&n.kind),
            title: n.title,
            message: n.message,
            timestamp: n.timestamp.to_string(),
            read: n.read,
            action_label: n.action_label,
        }
    }
}

/// FFI-safe pharmacy order.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrder {
    pub id: String,
    pub patient_name: String,
    pub patient_age: u32,
    pub medications: Vec<String>,
    pub prescription_status: String,
    pub order_status: String,
    pub order_status_label: String,
    /// Label of the button that moves the order on, if any
    pub next_action: Option<String>,
    pub received_at: String,
    pub has_senior_pwd_id: bool,
    pub discount_applied: bool,
    pub refill_cycle_days: u16,
    pub flag_note: Option<String>,
}

impl From<&PharmacyOrder> for FfiOrder {
    fn from(order: &PharmacyOrder) -> Self {
        Self {
            id: order.id.clone(),
            patient_name: order.patient_name.clone(),
            patient_age: order.patient_age,
            medications: order.medications.clone(),
            prescription_status: wire_name(&order.prescription_status),
            order_status: wire_name(&order.order_status),
            order_status_label: order.order_status.label().to_string(),
            next_action: order.order_status.action_label().map(str::to_string),
            received_at: order.received_at.to_string(),
            has_senior_pwd_id: order.has_senior_pwd_id,
            discount_applied: order.discount_applied,
            refill_cycle_days: order.refill_cycle.days(),
            flag_note: order.flag_note.clone(),
        }
    }
}

/// FFI-safe pharmacy counters.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPharmacyStats {
    pub orders_today: u32,
    pub pending_verification: u32,
    pub awaiting_dispatch: u32,
    pub delivered_this_month: u32,
}

/// FFI-safe consultation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConsult {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub kind: String,
    pub kind_label: String,
    pub status: String,
    pub notes: Option<String>,
}

impl From<&DoctorConsult> for FfiConsult {
    fn from(c: &DoctorConsult) -> Self {
        Self {
            id: c.id.clone(),
            patient_id: c.patient_id.clone(),
            patient_name: c.patient_name.clone(),
            date: c.date.to_string(),
            time: c.time.clone(),
            kind: wire_name(&c.kind),
            kind_label: c.kind.label().to_string(),
            status: wire_name(&c.status),
            notes: c.notes.clone(),
        }
    }
}

/// FFI-safe lab review.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabReview {
    pub id: String,
    pub patient_name: String,
    pub test_name: String,
    pub completed_date: String,
    pub reviewed: bool,
    pub flagged: bool,
}

impl From<&DoctorLabReview> for FfiLabReview {
    fn from(r: &DoctorLabReview) -> Self {
        Self {
            id: r.id.clone(),
            patient_name: r.patient_name.clone(),
            test_name: r.test_name.clone(),
            completed_date: r.completed_date.to_string(),
            reviewed: r.reviewed,
            flagged: r.flagged(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> MediliverCore {
        let mut settings = Settings::default();
        settings.latency.login_ms = 0;
        settings.latency.payment_ms = 0;
        MediliverCore::new(AppState::demo().unwrap(), settings)
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let core = core();
        let session = core
            .login("patient@demo.ph".into(), "demo1234".into())
            .await
            .unwrap();
        assert_eq!(session.role, "patient");
        assert!(core.current_session().unwrap().is_some());

        core.logout().unwrap();
        assert!(core.current_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let err = core()
            .login("patient@demo.ph".into(), "nope".into())
            .await
            .unwrap_err();
        assert!(matches!(err, MediliverError::AuthError(_)));
    }

    #[tokio::test]
    async fn test_pay_activates_subscription() {
        let core = core();
        assert!(!core.is_subscribed().unwrap());
        let receipt = core.pay("GCash".into()).await.unwrap();
        assert_eq!(receipt.invoice.total_display, "₱1,250.00");
        assert!(core.is_subscribed().unwrap());
        assert!(core.pay("Bitcoin".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_checkout_charges_the_quoted_amount() {
        for has_id in [true, false] {
            let mut settings = Settings::default();
            settings.latency.payment_ms = 0;
            let mut state = AppState::demo().unwrap();
            state.profile.has_senior_pwd_id = has_id;
            let core = MediliverCore::new(state, settings);

            let quote = core.checkout_quote().unwrap();
            let receipt = core.pay("Maya".into()).await.unwrap();
            assert_eq!(
                receipt.invoice.total_centavos, quote.due_now.total_centavos,
                "has_id={}",
                has_id
            );
            assert_eq!(receipt.invoice.discounted, quote.due_now.discounted);
            assert_eq!(quote.once_verified.discounted, has_id);
        }
    }

    fn with_scripted_assistant(replies: &[&str]) -> MediliverCore {
        let mut core = core();
        let model = replies
            .iter()
            .fold(mediliver_llm::MockModel::new(), |m, r| m.reply(*r));
        core.assistant = Some(Assistant::new(AssistantModel::Scripted(model)));
        core
    }

    #[tokio::test]
    async fn test_assistant_requires_api_key() {
        let core = core();
        assert!(matches!(
            core.health_guidance("Hello".into()).await,
            Err(MediliverError::ConfigError(_))
        ));
        assert!(matches!(
            core.analyze_prescription("IMG".into()).await,
            Err(MediliverError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_scan_then_record() {
        let core = with_scripted_assistant(&[r#"{"medications":[
            {"name":"Amlodipine","dosage":"5mg","timing":"Morning","instruction":"After breakfast"},
            {"name":"Atorvastatin","dosage":"20mg","timing":"Before Bed","frequency":"Once a day","instruction":"At night"}
        ],"summary":"Two tablets a day.","warnings":[]}"#]);

        let analysis = core.analyze_prescription("IMG".into()).await.unwrap();
        assert_eq!(analysis.medications.len(), 2);
        assert_eq!(analysis.medications[1].timing, "Before Bed");
        assert!(analysis.medications.iter().all(|m| !m.pharmacist_verified));

        let before = core.medications().unwrap().len();
        let added = core
            .record_scanned_prescription("rx.jpg".into(), "2026-02-18".into(), analysis.medications)
            .unwrap();
        // Amlodipine is already in the pack
        assert_eq!(added, 1);
        assert_eq!(core.medications().unwrap().len(), before + 1);
    }

    #[tokio::test]
    async fn test_scan_failure_is_surfaced() {
        let core = with_scripted_assistant(&["The photo is too blurry."]);
        assert!(matches!(
            core.analyze_prescription("IMG".into()).await,
            Err(MediliverError::AssistantError(_))
        ));
    }

    #[tokio::test]
    async fn test_guidance_sends_current_medications() {
        let core = with_scripted_assistant(&["Take Metformin with dinner."]);
        let answer = core.health_guidance("When do I take Metformin?".into()).await.unwrap();
        assert_eq!(answer, "Take Metformin with dinner.");

        let sent = core.assistant.as_ref().unwrap().model();
        let AssistantModel::Scripted(mock) = sent else {
            panic!("scripted model expected");
        };
        let prompt = mock.requests()[0]["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(prompt.contains("Metformin"));
        assert!(prompt.contains("Amlodipine"));
    }

    #[test]
    fn test_adherence_snapshot() {
        let report = core().adherence("2026-02-18".into()).unwrap();
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[6].status, "taken");
        assert_eq!(report.days[5].status, "missed");
    }

    #[test]
    fn test_order_flow() {
        let core = core();
        assert!(core.advance_order("po1".into()).unwrap());
        let board = core.dispatch_board().unwrap();
        assert!(board.iter().any(|o| o.id == "po1" && o.order_status == "verified"));

        assert!(core.verify_prescription("po1".into()).unwrap());
        assert!(!core.verify_prescription("po1".into()).unwrap());
        let invoice = core.order_invoice("po1".into()).unwrap();
        assert!(invoice.discounted);
        assert!(matches!(
            core.advance_order("missing".into()),
            Err(MediliverError::NotFound(_))
        ));
    }

    #[test]
    fn test_record_reading_declines_bad_input() {
        let core = core();
        let before = core.vitals_summary().unwrap()[1].reading_count;
        assert!(!core
            .record_reading(
                "blood_sugar".into(),
                None,
                None,
                Some("abc".into()),
                "2026-02-18T09:00:00".into()
            )
            .unwrap());
        assert!(core
            .record_reading(
                "blood_sugar".into(),
                None,
                None,
                Some("101".into()),
                "2026-02-19T07:00:00".into()
            )
            .unwrap());
        let sugar = &core.vitals_summary().unwrap()[1];
        assert_eq!(sugar.reading_count, before + 1);
        assert_eq!(sugar.flag.as_deref(), Some("pre-diabetic"));
    }

    #[test]
    fn test_lab_review_acknowledged_once() {
        let core = core();
        let pending = core.lab_reviews_pending().unwrap();
        assert!(pending[0].flagged);
        let id = pending[0].id.clone();
        assert!(core.acknowledge_lab_review(id.clone()).unwrap());
        assert!(!core.acknowledge_lab_review(id).unwrap());
    }
}

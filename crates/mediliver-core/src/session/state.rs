//! Application state and its reducer.
//!
//! All mutation goes through [`reduce`], a pure function from the current state and an
//! [`Action`] to the next state. Actions naming a record that does not exist, or asking a
//! state machine for a move it does not allow, leave the state unchanged.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{AuthSession, PaymentReceipt};
use crate::lifecycle::{consult, order, Transition};
use crate::models::{
    AppNotification, Appointment, DoctorConsult, DoctorLabReview, DosePeriod, LabTest,
    Medication, MedicationLog, PharmacyOrder, PrescriptionUpload, UserProfile, VitalReading,
};
use crate::schedule;

/// Everything one session owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    #[serde(default)]
    pub session: Option<AuthSession>,
    /// Present once checkout has succeeded
    #[serde(default)]
    pub subscription: Option<PaymentReceipt>,
    pub profile: UserProfile,
    pub medications: Vec<Medication>,
    pub medication_logs: Vec<MedicationLog>,
    pub vitals: Vec<VitalReading>,
    pub lab_tests: Vec<LabTest>,
    pub appointments: Vec<Appointment>,
    pub notifications: Vec<AppNotification>,
    pub uploads: Vec<PrescriptionUpload>,
    pub orders: Vec<PharmacyOrder>,
    pub consults: Vec<DoctorConsult>,
    pub lab_reviews: Vec<DoctorLabReview>,
}

impl AppState {
    /// A signed-out session with no history.
    pub fn new(profile: UserProfile) -> Self {
        Self {
            session: None,
            subscription: None,
            profile,
            medications: Vec::new(),
            medication_logs: Vec::new(),
            vitals: Vec::new(),
            lab_tests: Vec::new(),
            appointments: Vec::new(),
            notifications: Vec::new(),
            uploads: Vec::new(),
            orders: Vec::new(),
            consults: Vec::new(),
            lab_reviews: Vec::new(),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn order(&self, id: &str) -> Option<&PharmacyOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn consult(&self, id: &str) -> Option<&DoctorConsult> {
        self.consults.iter().find(|c| c.id == id)
    }

    pub fn lab_review(&self, id: &str) -> Option<&DoctorLabReview> {
        self.lab_reviews.iter().find(|r| r.id == id)
    }
}

/// A user intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SignedIn(AuthSession),
    SignedOut,
    /// Registration accepted; carries the updated profile
    Registered(UserProfile),
    PaymentSettled(PaymentReceipt),
    DoseTaken {
        medication_id: String,
        period: DosePeriod,
        at: NaiveDateTime,
    },
    DoseMissed {
        medication_id: String,
        period: DosePeriod,
        day: NaiveDate,
    },
    ReadingRecorded(VitalReading),
    /// A prescription scan finished
    PrescriptionScanned {
        upload: PrescriptionUpload,
        medications: Vec<Medication>,
    },
    NotificationRead(String),
    AllNotificationsRead,
    OrderAdvanced(String),
    PrescriptionVerified(String),
    PrescriptionFlagged { order_id: String, note: String },
    SeniorPwdIdRecorded(String),
    ConsultStarted(String),
    ConsultCompleted {
        consult_id: String,
        notes: Option<String>,
    },
    ConsultCancelled(String),
    LabReviewAcknowledged(String),
}

/// Apply an action, returning the next state.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::SignedIn(session) => next.session = Some(session),
        Action::SignedOut => next.session = None,
        Action::Registered(profile) => next.profile = profile,
        Action::PaymentSettled(receipt) => next.subscription = Some(receipt),
        Action::DoseTaken {
            medication_id,
            period,
            at,
        } => next
            .medication_logs
            .push(MedicationLog::taken(medication_id, period, at)),
        Action::DoseMissed {
            medication_id,
            period,
            day,
        } => next
            .medication_logs
            .push(MedicationLog::missed(medication_id, period, day)),
        Action::ReadingRecorded(reading) => match reading.validate() {
            Ok(()) => next.vitals.push(reading),
            Err(e) => tracing::debug!(error = %e, "reading declined"),
        },
        Action::PrescriptionScanned {
            upload,
            medications,
        } => {
            let merged = schedule::merge_new_medications(&next.medications, medications);
            next.medications.extend(merged.added);
            next.uploads.push(upload);
        }
        Action::NotificationRead(id) => {
            match next.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) => n.read = true,
                None => tracing::debug!(notification_id = %id, "unknown notification"),
            }
        }
        Action::AllNotificationsRead => {
            for n in &mut next.notifications {
                n.read = true;
            }
        }
        Action::OrderAdvanced(id) => update_order(&mut next, &id, order::advance),
        Action::PrescriptionVerified(id) => {
            update_order(&mut next, &id, order::verify_prescription)
        }
        Action::PrescriptionFlagged { order_id, note } => {
            update_order(&mut next, &order_id, |o| order::flag_prescription(o, &note))
        }
        Action::SeniorPwdIdRecorded(id) => {
            update_order(&mut next, &id, order::record_senior_pwd_id)
        }
        Action::ConsultStarted(id) => update_consult(&mut next, &id, consult::start),
        Action::ConsultCompleted { consult_id, notes } => {
            update_consult(&mut next, &consult_id, |c| {
                consult::complete(c, notes.as_deref())
            })
        }
        Action::ConsultCancelled(id) => update_consult(&mut next, &id, consult::cancel),
        Action::LabReviewAcknowledged(id) => {
            match next.lab_reviews.iter_mut().find(|r| r.id == id) {
                Some(review) => {
                    if let Transition::Applied(acked) = consult::acknowledge(review) {
                        *review = acked;
                    }
                }
                None => tracing::debug!(review_id = %id, "unknown lab review"),
            }
        }
    }

    next
}

fn update_order<F>(state: &mut AppState, id: &str, step: F)
where
    F: FnOnce(&PharmacyOrder) -> Transition<PharmacyOrder>,
{
    match state.orders.iter_mut().find(|o| o.id == id) {
        Some(slot) => {
            if let Transition::Applied(updated) = step(slot) {
                *slot = updated;
            }
        }
        None => tracing::debug!(order_id = %id, "unknown order"),
    }
}

fn update_consult<F>(state: &mut AppState, id: &str, step: F)
where
    F: FnOnce(&DoctorConsult) -> Transition<DoctorConsult>,
{
    match state.consults.iter_mut().find(|c| c.id == id) {
        Some(slot) => {
            if let Transition::Applied(updated) = step(slot) {
                *slot = updated;
            }
        }
        None => tracing::debug!(consult_id = %id, "unknown consult"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ConsultKind, ConsultStatus, NotificationKind, OrderStatus, PrescriptionStatus,
        RefillCycle,
    };
    use crate::session::{authenticate, UserRole};

    fn profile() -> UserProfile {
        UserProfile {
            name: "Lola Rosa".into(),
            age: 68,
            location: "Quezon City, PH".into(),
            condition: "Hypertension".into(),
            next_consultation: None,
            is_registered: false,
            has_senior_pwd_id: false,
            refill_cycle: RefillCycle::Days30,
            emergency_contact: None,
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_sign_in_and_out() {
        let state = AppState::new(profile());
        let session = authenticate("pharmacy@demo.ph", "pharma123").unwrap();
        let signed_in = reduce(&state, Action::SignedIn(session));
        assert_eq!(signed_in.session.as_ref().map(|s| s.role), Some(UserRole::Pharmacy));
        // Input untouched
        assert!(state.session.is_none());

        let signed_out = reduce(&signed_in, Action::SignedOut);
        assert!(signed_out.session.is_none());
    }

    #[test]
    fn test_dose_actions_append_logs() {
        let state = AppState::new(profile());
        let state = reduce(
            &state,
            Action::DoseTaken {
                medication_id: "1".into(),
                period: DosePeriod::Morning,
                at: at("2026-02-18T08:00:00"),
            },
        );
        let state = reduce(
            &state,
            Action::DoseMissed {
                medication_id: "2".into(),
                period: DosePeriod::Evening,
                day: at("2026-02-18T00:00:00").date(),
            },
        );
        assert_eq!(state.medication_logs.len(), 2);
        assert!(state.medication_logs.iter().all(|l| l.validate().is_ok()));
    }

    #[test]
    fn test_order_actions_route_through_machine() {
        let mut state = AppState::new(profile());
        let mut o = PharmacyOrder::new(
            "Rosa Santos".into(),
            72,
            vec!["Amlodipine 5mg".into()],
            true,
            RefillCycle::Days30,
            at("2026-02-18T09:00:00"),
        );
        o.id = "po1".into();
        state.orders.push(o);

        let state = reduce(&state, Action::PrescriptionVerified("po1".into()));
        let order = state.order("po1").unwrap();
        assert_eq!(order.prescription_status, PrescriptionStatus::Verified);
        assert!(order.discount_applied);

        let state = reduce(&state, Action::OrderAdvanced("po1".into()));
        assert_eq!(state.order("po1").unwrap().order_status, OrderStatus::Verified);

        // Unknown id and disallowed moves are no-ops
        let same = reduce(&state, Action::OrderAdvanced("missing".into()));
        assert_eq!(same, state);
        let same = reduce(
            &state,
            Action::PrescriptionFlagged {
                order_id: "po1".into(),
                note: "late".into(),
            },
        );
        assert_eq!(same, state);
    }

    #[test]
    fn test_consult_actions() {
        let mut state = AppState::new(profile());
        let mut c = DoctorConsult::schedule(
            "p1".into(),
            "Rosa Santos".into(),
            at("2026-02-19T00:00:00").date(),
            "10:00 AM".into(),
            ConsultKind::Teleconsult,
        );
        c.id = "dc1".into();
        state.consults.push(c);

        let cancelled = reduce(&state, Action::ConsultCancelled("dc1".into()));
        assert_eq!(cancelled.consult("dc1").unwrap().status, ConsultStatus::Cancelled);
        let still = reduce(&cancelled, Action::ConsultStarted("dc1".into()));
        assert_eq!(still, cancelled);

        let started = reduce(&state, Action::ConsultStarted("dc1".into()));
        let done = reduce(
            &started,
            Action::ConsultCompleted {
                consult_id: "dc1".into(),
                notes: Some("BP controlled".into()),
            },
        );
        let done = done.consult("dc1").unwrap();
        assert_eq!(done.status, ConsultStatus::Completed);
        assert_eq!(done.notes.as_deref(), Some("BP controlled"));
    }

    #[test]
    fn test_notifications_read() {
        let mut state = AppState::new(profile());
        for id in ["n1", "n2"] {
            state.notifications.push(AppNotification {
                id: id.into(),
                kind: NotificationKind::System,
                title: "Hello".into(),
                message: "Welcome".into(),
                timestamp: at("2026-02-18T09:00:00"),
                read: false,
                action_label: None,
            });
        }
        let state = reduce(&state, Action::NotificationRead("n1".into()));
        assert_eq!(state.unread_notifications(), 1);
        let state = reduce(&state, Action::AllNotificationsRead);
        assert_eq!(state.unread_notifications(), 0);
    }

    #[test]
    fn test_scan_adds_unverified_and_skips_duplicates() {
        let mut state = AppState::new(profile());
        let mut known = Medication::new("Amlodipine".into(), "5mg".into(), DosePeriod::Morning);
        known.pharmacist_verified = true;
        state.medications.push(known);

        let upload = PrescriptionUpload::new(
            "rx.jpg".into(),
            at("2026-02-18T00:00:00").date(),
            vec!["Atorvastatin 20mg".into()],
        );
        let state = reduce(
            &state,
            Action::PrescriptionScanned {
                upload,
                medications: vec![
                    Medication::new("Amlodipine".into(), "5mg".into(), DosePeriod::Morning),
                    Medication::new("Atorvastatin".into(), "20mg".into(), DosePeriod::BeforeBed),
                ],
            },
        );
        assert_eq!(state.medications.len(), 2);
        assert!(!state.medications[1].pharmacist_verified);
        assert_eq!(state.uploads.len(), 1);
    }
}

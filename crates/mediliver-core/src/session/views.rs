//! Read-only dashboard projections of [`AppState`], one per portal.

use chrono::{NaiveDate, NaiveDateTime};

use super::AppState;
use crate::adherence::{self, AdherenceReport};
use crate::lifecycle::consult;
use crate::lifecycle::order::{self, DiscountRoster, PharmacyStats};
use crate::models::{
    AppNotification, AppointmentStatus, DoctorConsult, DoctorLabReview, LabTest,
    LabTestStatus, PharmacyOrder,
};
use crate::pricing::{CheckoutQuote, PriceBook};
use crate::schedule::{self, ScheduleSlot};
use crate::vitals::{self, VitalsSummary};

/// Patient dashboard.
pub struct PatientView<'a> {
    state: &'a AppState,
}

impl<'a> PatientView<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn adherence(&self, today: NaiveDate) -> AdherenceReport {
        adherence::calculate(&self.state.medication_logs, today)
    }

    pub fn vitals(&self) -> Vec<VitalsSummary> {
        vitals::summarize(&self.state.vitals)
    }

    pub fn schedule(&self) -> Vec<ScheduleSlot> {
        schedule::group_by_period(&self.state.medications)
    }

    /// Newest first.
    pub fn notifications(&self) -> Vec<&'a AppNotification> {
        let mut out: Vec<&AppNotification> = self.state.notifications.iter().collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }

    pub fn unread_count(&self) -> usize {
        self.state.unread_notifications()
    }

    pub fn pending_labs(&self) -> Vec<&'a LabTest> {
        self.state
            .lab_tests
            .iter()
            .filter(|t| t.status != LabTestStatus::Completed)
            .collect()
    }

    pub fn completed_labs(&self) -> Vec<&'a LabTest> {
        self.state
            .lab_tests
            .iter()
            .filter(|t| t.status == LabTestStatus::Completed)
            .collect()
    }

    pub fn upcoming_appointments(&self) -> usize {
        self.state
            .appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Upcoming)
            .count()
    }

    /// Checkout price for the current profile's refill cycle.
    pub fn checkout_quote(&self, prices: &PriceBook) -> CheckoutQuote {
        let profile = &self.state.profile;
        prices.checkout_quote(profile.refill_cycle, profile.has_senior_pwd_id)
    }
}

/// Pharmacy dashboard.
pub struct PharmacyView<'a> {
    state: &'a AppState,
}

impl<'a> PharmacyView<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn stats(&self, now: NaiveDateTime) -> PharmacyStats {
        PharmacyStats::compute(&self.state.orders, now)
    }

    pub fn order_queue(&self) -> Vec<&'a PharmacyOrder> {
        order::order_queue(&self.state.orders)
    }

    pub fn verification_queue(&self) -> Vec<&'a PharmacyOrder> {
        order::verification_queue(&self.state.orders)
    }

    pub fn dispatch_board(&self) -> Vec<&'a PharmacyOrder> {
        order::dispatch_board(&self.state.orders)
    }

    pub fn discounts(&self) -> DiscountRoster {
        DiscountRoster::compute(&self.state.orders)
    }
}

/// Doctor dashboard.
pub struct DoctorView<'a> {
    state: &'a AppState,
}

impl<'a> DoctorView<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn today(&self, day: NaiveDate) -> Vec<&'a DoctorConsult> {
        consult::on_day(&self.state.consults, day)
    }

    pub fn upcoming(&self) -> Vec<&'a DoctorConsult> {
        consult::upcoming(&self.state.consults)
    }

    pub fn past(&self) -> Vec<&'a DoctorConsult> {
        consult::past(&self.state.consults)
    }

    pub fn needs_review(&self) -> Vec<&'a DoctorLabReview> {
        consult::review_queue(&self.state.lab_reviews)
    }

    pub fn reviewed(&self) -> Vec<&'a DoctorLabReview> {
        consult::reviewed(&self.state.lab_reviews)
    }
}

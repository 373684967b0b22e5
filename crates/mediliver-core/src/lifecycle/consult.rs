//! Consultation lifecycle and lab-review acknowledgement.
//!
//! `scheduled → in_progress → completed`, or `scheduled → cancelled`.
//! Completed and cancelled consults are final. Lab reviews are acknowledged once.

use chrono::NaiveDate;

use super::Transition;
use crate::models::{ConsultStatus, DoctorConsult, DoctorLabReview};

/// Whether the machine allows `from → to`.
pub fn is_allowed(from: ConsultStatus, to: ConsultStatus) -> bool {
    matches!(
        (from, to),
        (ConsultStatus::Scheduled, ConsultStatus::InProgress)
            | (ConsultStatus::Scheduled, ConsultStatus::Cancelled)
            | (ConsultStatus::InProgress, ConsultStatus::Completed)
    )
}

/// Move a consult to `target`.
pub fn transition(consult: &DoctorConsult, target: ConsultStatus) -> Transition<DoctorConsult> {
    if !is_allowed(consult.status, target) {
        return Transition::ignored(format!(
            "consult {} cannot move from {:?} to {:?}",
            consult.id, consult.status, target
        ));
    }

    tracing::info!(consult_id = %consult.id, from = ?consult.status, to = ?target, "consult moved");
    Transition::Applied(DoctorConsult {
        status: target,
        ..consult.clone()
    })
}

/// Begin a scheduled consult.
pub fn start(consult: &DoctorConsult) -> Transition<DoctorConsult> {
    transition(consult, ConsultStatus::InProgress)
}

/// Finish an in-progress consult, optionally recording notes.
pub fn complete(consult: &DoctorConsult, notes: Option<&str>) -> Transition<DoctorConsult> {
    match transition(consult, ConsultStatus::Completed) {
        Transition::Applied(mut done) => {
            if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
                done.notes = Some(notes.to_string());
            }
            Transition::Applied(done)
        }
        ignored => ignored,
    }
}

/// Cancel a scheduled consult.
pub fn cancel(consult: &DoctorConsult) -> Transition<DoctorConsult> {
    transition(consult, ConsultStatus::Cancelled)
}

/// Acknowledge a lab review. Irreversible.
pub fn acknowledge(review: &DoctorLabReview) -> Transition<DoctorLabReview> {
    if review.reviewed {
        return Transition::ignored(format!("lab review {} already acknowledged", review.id));
    }
    tracing::info!(review_id = %review.id, flagged = review.flagged(), "lab review acknowledged");
    Transition::Applied(DoctorLabReview {
        reviewed: true,
        ..review.clone()
    })
}

/// Scheduled consults, soonest first.
pub fn upcoming(consults: &[DoctorConsult]) -> Vec<&DoctorConsult> {
    let mut out: Vec<&DoctorConsult> = consults
        .iter()
        .filter(|c| c.status == ConsultStatus::Scheduled)
        .collect();
    out.sort_by_key(|c| c.date);
    out
}

/// Completed and cancelled consults, most recent first.
pub fn past(consults: &[DoctorConsult]) -> Vec<&DoctorConsult> {
    let mut out: Vec<&DoctorConsult> = consults.iter().filter(|c| c.status.is_terminal()).collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

/// Consults on a given day that are not cancelled.
pub fn on_day(consults: &[DoctorConsult], day: NaiveDate) -> Vec<&DoctorConsult> {
    consults
        .iter()
        .filter(|c| c.date == day && c.status != ConsultStatus::Cancelled)
        .collect()
}

/// Unacknowledged reviews: flagged first, then oldest first.
pub fn review_queue(reviews: &[DoctorLabReview]) -> Vec<&DoctorLabReview> {
    let mut out: Vec<&DoctorLabReview> = reviews.iter().filter(|r| !r.reviewed).collect();
    out.sort_by(|a, b| {
        b.flagged()
            .cmp(&a.flagged())
            .then(a.completed_date.cmp(&b.completed_date))
    });
    out
}

/// Acknowledged reviews.
pub fn reviewed(reviews: &[DoctorLabReview]) -> Vec<&DoctorLabReview> {
    reviews.iter().filter(|r| r.reviewed).collect()
}

//! Pharmacy order lifecycle.
//!
//! Stage: `pending_verification → verified → packing → dispatched → delivered`,
//! one step at a time, forward only.
//!
//! Prescription: `pending → verified` or `pending → flagged`. Verifying evaluates
//! the senior/PWD discount; flagging needs a note.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Transition;
use crate::models::{OrderStatus, PharmacyOrder, PrescriptionStatus};

/// Move the order to `target`, which must be the immediate next stage.
pub fn advance_to(order: &PharmacyOrder, target: OrderStatus) -> Transition<PharmacyOrder> {
    match order.order_status.next() {
        None => Transition::ignored(format!("order {} already delivered", order.id)),
        Some(next) if next != target => Transition::ignored(format!(
            "order {} cannot move from {:?} to {:?}",
            order.id, order.order_status, target
        )),
        Some(next) => {
            tracing::info!(order_id = %order.id, from = ?order.order_status, to = ?next, "order advanced");
            Transition::Applied(PharmacyOrder {
                order_status: next,
                ..order.clone()
            })
        }
    }
}

/// Move the order to its next stage.
pub fn advance(order: &PharmacyOrder) -> Transition<PharmacyOrder> {
    match order.order_status.next() {
        Some(next) => advance_to(order, next),
        None => Transition::ignored(format!("order {} already delivered", order.id)),
    }
}

/// Mark a pending prescription verified and settle the discount.
pub fn verify_prescription(order: &PharmacyOrder) -> Transition<PharmacyOrder> {
    if order.prescription_status != PrescriptionStatus::Pending {
        return Transition::ignored(format!(
            "prescription for order {} is {:?}, not pending",
            order.id, order.prescription_status
        ));
    }

    tracing::info!(
        order_id = %order.id,
        discount = order.has_senior_pwd_id,
        "prescription verified"
    );
    Transition::Applied(PharmacyOrder {
        prescription_status: PrescriptionStatus::Verified,
        discount_applied: order.has_senior_pwd_id,
        ..order.clone()
    })
}

/// Flag a pending prescription for clarification. The note must not be blank.
pub fn flag_prescription(order: &PharmacyOrder, note: &str) -> Transition<PharmacyOrder> {
    if order.prescription_status != PrescriptionStatus::Pending {
        return Transition::ignored(format!(
            "prescription for order {} is {:?}, not pending",
            order.id, order.prescription_status
        ));
    }
    let note = note.trim();
    if note.is_empty() {
        return Transition::ignored(format!("flagging order {} needs a note", order.id));
    }

    tracing::info!(order_id = %order.id, "prescription flagged");
    Transition::Applied(PharmacyOrder {
        prescription_status: PrescriptionStatus::Flagged,
        flag_note: Some(note.to_string()),
        ..order.clone()
    })
}

/// Record a senior/PWD ID presented after intake.
///
/// The discount follows on verification; an already-verified order keeps its price.
pub fn record_senior_pwd_id(order: &PharmacyOrder) -> Transition<PharmacyOrder> {
    if order.has_senior_pwd_id {
        return Transition::ignored(format!("order {} already has an ID on file", order.id));
    }
    Transition::Applied(PharmacyOrder {
        has_senior_pwd_id: true,
        ..order.clone()
    })
}

/// Prescriptions awaiting a pharmacist: flagged first, then oldest first.
pub fn verification_queue(orders: &[PharmacyOrder]) -> Vec<&PharmacyOrder> {
    let mut queue: Vec<&PharmacyOrder> = orders
        .iter()
        .filter(|o| {
            matches!(
                o.prescription_status,
                PrescriptionStatus::Pending | PrescriptionStatus::Flagged
            )
        })
        .collect();
    queue.sort_by(|a, b| {
        b.is_flagged()
            .cmp(&a.is_flagged())
            .then(a.received_at.cmp(&b.received_at))
    });
    queue
}

/// Orders past verification, ordered by stage.
pub fn dispatch_board(orders: &[PharmacyOrder]) -> Vec<&PharmacyOrder> {
    let mut board: Vec<&PharmacyOrder> = orders
        .iter()
        .filter(|o| o.order_status >= OrderStatus::Verified)
        .collect();
    board.sort_by_key(|o| o.order_status);
    board
}

/// Intake queue, newest first.
pub fn order_queue(orders: &[PharmacyOrder]) -> Vec<&PharmacyOrder> {
    let mut queue: Vec<&PharmacyOrder> = orders.iter().collect();
    queue.sort_by(|a, b| b.received_at.cmp(&a.received_at));
    queue
}

/// Pharmacy overview counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PharmacyStats {
    pub orders_today: usize,
    pub pending_verification: usize,
    pub awaiting_dispatch: usize,
    pub delivered_this_month: usize,
}

impl PharmacyStats {
    /// Counters as of `now`. Delivery month is approximated by intake month.
    pub fn compute(orders: &[PharmacyOrder], now: NaiveDateTime) -> Self {
        let today = now.date();
        Self {
            orders_today: orders.iter().filter(|o| o.received_at.date() == today).count(),
            pending_verification: orders
                .iter()
                .filter(|o| o.order_status == OrderStatus::PendingVerification)
                .count(),
            awaiting_dispatch: orders
                .iter()
                .filter(|o| matches!(o.order_status, OrderStatus::Verified | OrderStatus::Packing))
                .count(),
            delivered_this_month: orders
                .iter()
                .filter(|o| {
                    o.order_status == OrderStatus::Delivered
                        && o.received_at.year() == today.year()
                        && o.received_at.month() == today.month()
                })
                .count(),
        }
    }
}

/// Senior/PWD orders split by discount state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountRoster {
    pub applied: Vec<PharmacyOrder>,
    pub pending: Vec<PharmacyOrder>,
}

impl DiscountRoster {
    pub fn compute(orders: &[PharmacyOrder]) -> Self {
        let (applied, pending): (Vec<_>, Vec<_>) = orders
            .iter()
            .filter(|o| o.has_senior_pwd_id)
            .cloned()
            .partition(|o| o.discount_applied);
        Self { applied, pending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RefillCycle;

    fn order(senior: bool) -> PharmacyOrder {
        PharmacyOrder::new(
            "Rosa Santos".into(),
            72,
            vec!["Amlodipine 5mg".into(), "Metformin 500mg".into()],
            senior,
            RefillCycle::Days30,
            "2026-02-18T09:00:00".parse().unwrap(),
        )
    }

    #[test]
    fn test_only_next_stage_accepted() {
        let o = order(false);
        assert!(!advance_to(&o, OrderStatus::Delivered).is_applied());
        assert!(!advance_to(&o, OrderStatus::Packing).is_applied());
        assert!(!advance_to(&o, OrderStatus::PendingVerification).is_applied());

        let verified = advance_to(&o, OrderStatus::Verified).applied().unwrap();
        assert_eq!(verified.order_status, OrderStatus::Verified);
        // Input is untouched
        assert_eq!(o.order_status, OrderStatus::PendingVerification);
    }

    #[test]
    fn test_full_progression_then_terminal() {
        let mut o = order(false);
        for expected in &OrderStatus::SEQUENCE[1..] {
            o = advance(&o).applied().unwrap();
            assert_eq!(o.order_status, *expected);
        }
        let after = advance(&o);
        assert!(!after.is_applied());
        assert_eq!(after.or_keep(o.clone()).order_status, OrderStatus::Delivered);
    }

    #[test]
    fn test_no_backwards_move() {
        let o = PharmacyOrder {
            order_status: OrderStatus::Dispatched,
            ..order(false)
        };
        assert!(!advance_to(&o, OrderStatus::Packing).is_applied());
    }

    #[test]
    fn test_discount_waits_for_verification() {
        let o = order(true);
        assert!(!o.discount_applied);

        let packed = advance(&o).applied().unwrap();
        assert!(!packed.discount_applied);

        let verified = verify_prescription(&packed).applied().unwrap();
        assert!(verified.discount_applied);
        assert!(verified.validate().is_ok());
    }

    #[test]
    fn test_no_discount_without_id() {
        let verified = verify_prescription(&order(false)).applied().unwrap();
        assert!(!verified.discount_applied);
    }

    #[test]
    fn test_id_added_after_verification_not_retroactive() {
        let verified = verify_prescription(&order(false)).applied().unwrap();
        let with_id = record_senior_pwd_id(&verified).applied().unwrap();
        assert!(with_id.has_senior_pwd_id);
        assert!(!with_id.discount_applied);
        // Cannot verify twice to pick the discount up
        assert!(!verify_prescription(&with_id).is_applied());
    }

    #[test]
    fn test_id_added_before_verification_applies() {
        let with_id = record_senior_pwd_id(&order(false)).applied().unwrap();
        let verified = verify_prescription(&with_id).applied().unwrap();
        assert!(verified.discount_applied);
    }

    #[test]
    fn test_flag_requires_note() {
        let o = order(true);
        assert!(!flag_prescription(&o, "   ").is_applied());

        let flagged = flag_prescription(&o, "Dosage unclear for Metformin").applied().unwrap();
        assert_eq!(flagged.prescription_status, PrescriptionStatus::Flagged);
        assert_eq!(flagged.flag_note.as_deref(), Some("Dosage unclear for Metformin"));

        // No automatic way out of flagged
        assert!(!verify_prescription(&flagged).is_applied());
        assert!(!flag_prescription(&flagged, "again").is_applied());
        // Flag blocks nothing else
        assert!(advance(&flagged).is_applied());
    }

    #[test]
    fn test_verification_queue_flagged_first() {
        let mut a = order(false);
        a.id = "a".into();
        let mut b = order(false);
        b.id = "b".into();
        b.received_at = "2026-02-18T11:00:00".parse().unwrap();
        b = flag_prescription(&b, "Illegible signature").applied().unwrap();
        let mut c = order(false);
        c.id = "c".into();
        c = verify_prescription(&c).applied().unwrap();

        let orders = vec![a, b, c];
        let queue: Vec<&str> = verification_queue(&orders).iter().map(|o| o.id.as_str()).collect();
        assert_eq!(queue, vec!["b", "a"]);
    }

    #[test]
    fn test_stats_and_board() {
        let now: NaiveDateTime = "2026-02-18T15:00:00".parse().unwrap();
        let mut orders = vec![order(false), order(true), order(true)];
        orders[1].order_status = OrderStatus::Packing;
        orders[2].order_status = OrderStatus::Delivered;
        orders[2].received_at = "2026-02-02T10:00:00".parse().unwrap();

        let stats = PharmacyStats::compute(&orders, now);
        assert_eq!(stats.orders_today, 2);
        assert_eq!(stats.pending_verification, 1);
        assert_eq!(stats.awaiting_dispatch, 1);
        assert_eq!(stats.delivered_this_month, 1);

        let board = dispatch_board(&orders);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].order_status, OrderStatus::Packing);
    }

    #[test]
    fn test_discount_roster() {
        let applied = verify_prescription(&order(true)).applied().unwrap();
        let orders = vec![applied, order(true), order(false)];
        let roster = DiscountRoster::compute(&orders);
        assert_eq!(roster.applied.len(), 1);
        assert_eq!(roster.pending.len(), 1);
    }
}

//! Pharmacy order models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Prescription verification status, independent of the order stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    Pending,
    Verified,
    Flagged,
}

/// Fulfillment stage of an order. Advances strictly forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingVerification,
    Verified,
    Packing,
    Dispatched,
    Delivered,
}

impl OrderStatus {
    /// The fixed stage sequence.
    pub const SEQUENCE: [OrderStatus; 5] = [
        OrderStatus::PendingVerification,
        OrderStatus::Verified,
        OrderStatus::Packing,
        OrderStatus::Dispatched,
        OrderStatus::Delivered,
    ];

    /// Position in the stage sequence.
    pub fn index(&self) -> usize {
        match self {
            OrderStatus::PendingVerification => 0,
            OrderStatus::Verified => 1,
            OrderStatus::Packing => 2,
            OrderStatus::Dispatched => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// The only stage this one may advance to.
    pub fn next(&self) -> Option<OrderStatus> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::PendingVerification => "Pending Verification",
            OrderStatus::Verified => "Verified",
            OrderStatus::Packing => "Packing",
            OrderStatus::Dispatched => "Dispatched",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Label of the pharmacist action that moves the order on, if any.
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            OrderStatus::PendingVerification => Some("Verify"),
            OrderStatus::Verified => Some("Pack"),
            OrderStatus::Packing => Some("Dispatch"),
            OrderStatus::Dispatched => Some("Delivered"),
            OrderStatus::Delivered => None,
        }
    }
}

/// Refill interval of a subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u16", into = "u16")]
pub enum RefillCycle {
    Days30,
    Days60,
    Days90,
}

impl RefillCycle {
    pub fn days(&self) -> u16 {
        match self {
            RefillCycle::Days30 => 30,
            RefillCycle::Days60 => 60,
            RefillCycle::Days90 => 90,
        }
    }

    /// Number of monthly billing periods covered by one cycle.
    pub fn months(&self) -> i64 {
        i64::from(self.days() / 30)
    }
}

impl TryFrom<u16> for RefillCycle {
    type Error = ModelError;

    fn try_from(days: u16) -> Result<Self, Self::Error> {
        match days {
            30 => Ok(RefillCycle::Days30),
            60 => Ok(RefillCycle::Days60),
            90 => Ok(RefillCycle::Days90),
            other => Err(ModelError::InvalidRefillCycle(other)),
        }
    }
}

impl From<RefillCycle> for u16 {
    fn from(cycle: RefillCycle) -> Self {
        cycle.days()
    }
}

/// One subscription fulfillment cycle for one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PharmacyOrder {
    pub id: String,
    pub patient_name: String,
    pub patient_age: u32,
    /// Medication names, in pack order
    pub medications: Vec<String>,
    pub prescription_status: PrescriptionStatus,
    pub order_status: OrderStatus,
    pub received_at: NaiveDateTime,
    #[serde(default)]
    pub estimated_dispatch: Option<NaiveDateTime>,
    /// Senior-citizen or PWD ID on file
    pub has_senior_pwd_id: bool,
    /// 20% discount applied to this order
    pub discount_applied: bool,
    pub refill_cycle: RefillCycle,
    /// Pharmacist note explaining a flagged prescription
    #[serde(default)]
    pub flag_note: Option<String>,
}

impl PharmacyOrder {
    /// Create an order at intake: pending verification, no discount yet.
    pub fn new(
        patient_name: String,
        patient_age: u32,
        medications: Vec<String>,
        has_senior_pwd_id: bool,
        refill_cycle: RefillCycle,
        received_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_name,
            patient_age,
            medications,
            prescription_status: PrescriptionStatus::Pending,
            order_status: OrderStatus::PendingVerification,
            received_at,
            estimated_dispatch: None,
            has_senior_pwd_id,
            discount_applied: false,
            refill_cycle,
            flag_note: None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.prescription_status == PrescriptionStatus::Flagged
    }

    /// Check the discount invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.discount_applied
            && !(self.has_senior_pwd_id
                && self.prescription_status == PrescriptionStatus::Verified)
        {
            return Err(ModelError::InvalidOrder {
                id: self.id.clone(),
                reason: "discount applied without a verified SC/PWD prescription".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_sequence() {
        assert_eq!(OrderStatus::PendingVerification.next(), Some(OrderStatus::Verified));
        assert_eq!(OrderStatus::Dispatched.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
        assert!(OrderStatus::Delivered.is_terminal());
        assert_eq!(OrderStatus::Delivered.action_label(), None);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&OrderStatus::PendingVerification).unwrap();
        assert_eq!(json, "\"pending_verification\"");
    }

    #[test]
    fn test_refill_cycle_serde() {
        let cycle: RefillCycle = serde_json::from_str("60").unwrap();
        assert_eq!(cycle, RefillCycle::Days60);
        assert_eq!(serde_json::to_string(&RefillCycle::Days90).unwrap(), "90");
        assert!(serde_json::from_str::<RefillCycle>("45").is_err());
        assert_eq!(RefillCycle::Days90.months(), 3);
    }

    #[test]
    fn test_discount_invariant() {
        let received = "2026-02-18T09:00:00".parse().unwrap();
        let mut order = PharmacyOrder::new(
            "Rosa Santos".into(),
            72,
            vec!["Amlodipine 5mg".into()],
            true,
            RefillCycle::Days30,
            received,
        );
        assert!(order.validate().is_ok());

        order.discount_applied = true;
        assert!(order.validate().is_err());

        order.prescription_status = PrescriptionStatus::Verified;
        assert!(order.validate().is_ok());

        order.has_senior_pwd_id = false;
        assert!(order.validate().is_err());
    }
}

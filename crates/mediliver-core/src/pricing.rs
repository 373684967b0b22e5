//! Subscription pricing and the senior/PWD discount.
//!
//! Amounts are integer centavos. The discount is all-or-nothing and is only earned by
//! an order whose prescription is verified while an ID is on file.

use serde::{Deserialize, Serialize};

use crate::models::{PharmacyOrder, PrescriptionStatus, RefillCycle};

/// ₱1,250.00 per month.
pub const DEFAULT_MONTHLY_CENTAVOS: i64 = 125_000;

/// Statutory senior-citizen / PWD discount.
pub const DEFAULT_DISCOUNT_PERCENT: u8 = 20;

/// Base price and discount rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PriceBook {
    pub monthly_centavos: i64,
    pub discount_percent: u8,
}

impl Default for PriceBook {
    fn default() -> Self {
        Self {
            monthly_centavos: DEFAULT_MONTHLY_CENTAVOS,
            discount_percent: DEFAULT_DISCOUNT_PERCENT,
        }
    }
}

/// Amount due for one refill cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invoice {
    pub refill_cycle: RefillCycle,
    pub base_centavos: i64,
    pub discount_centavos: i64,
    pub total_centavos: i64,
    pub discounted: bool,
}

impl Invoice {
    pub fn total_display(&self) -> String {
        format_php(self.total_centavos)
    }
}

/// The discount rule.
pub fn is_eligible(has_senior_pwd_id: bool, prescription: PrescriptionStatus) -> bool {
    has_senior_pwd_id && prescription == PrescriptionStatus::Verified
}

impl PriceBook {
    /// Undiscounted price of a cycle.
    pub fn base_price(&self, cycle: RefillCycle) -> i64 {
        self.monthly_centavos * cycle.months()
    }

    fn build(&self, cycle: RefillCycle, discounted: bool) -> Invoice {
        let base = self.base_price(cycle);
        let discount = if discounted {
            base * i64::from(self.discount_percent) / 100
        } else {
            0
        };
        Invoice {
            refill_cycle: cycle,
            base_centavos: base,
            discount_centavos: discount,
            total_centavos: base - discount,
            discounted,
        }
    }

    /// Invoice from the patient's ID state and the prescription status.
    pub fn invoice(
        &self,
        cycle: RefillCycle,
        has_senior_pwd_id: bool,
        prescription: PrescriptionStatus,
    ) -> Invoice {
        self.build(cycle, is_eligible(has_senior_pwd_id, prescription))
    }

    /// Invoice for an order, using the discount settled when it was verified.
    ///
    /// An ID recorded after verification does not reprice the order.
    pub fn invoice_order(&self, order: &PharmacyOrder) -> Invoice {
        let discounted = order.discount_applied
            && is_eligible(order.has_senior_pwd_id, order.prescription_status);
        self.build(order.refill_cycle, discounted)
    }

    /// What checkout charges for a cycle, and what the same cycle costs once the
    /// prescription is verified.
    ///
    /// Nothing is verified at checkout, so `due_now` is never discounted.
    pub fn checkout_quote(&self, cycle: RefillCycle, has_senior_pwd_id: bool) -> CheckoutQuote {
        CheckoutQuote {
            due_now: self.invoice(cycle, has_senior_pwd_id, PrescriptionStatus::Pending),
            once_verified: self.invoice(cycle, has_senior_pwd_id, PrescriptionStatus::Verified),
        }
    }
}

/// Checkout price pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutQuote {
    /// Charged by the subscription payment
    pub due_now: Invoice,
    /// Price of later cycles after pharmacist verification
    pub once_verified: Invoice,
}

/// Render centavos as pesos, e.g. `₱1,250.00`.
pub fn format_php(centavos: i64) -> String {
    let sign = if centavos < 0 { "-" } else { "" };
    let abs = centavos.unsigned_abs();
    let pesos = (abs / 100).to_string();
    let cents = abs % 100;

    let mut grouped = String::with_capacity(pesos.len() + pesos.len() / 3);
    for (i, ch) in pesos.chars().enumerate() {
        if i > 0 && (pesos.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}₱{}.{:02}", sign, grouped, cents)
}

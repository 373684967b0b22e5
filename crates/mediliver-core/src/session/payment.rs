//! Simulated subscription checkout.

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::latency::{self, CancelToken, LatencyResult, SimulatedLatency};
use crate::pricing::{format_php, Invoice};

/// Checkout payment option.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[serde(rename = "gcash")]
    GCash,
    Maya,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::GCash,
        PaymentMethod::Maya,
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::GCash => "GCash",
            PaymentMethod::Maya => "Maya",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

/// Proof of an activated subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceipt {
    pub id: String,
    pub method: PaymentMethod,
    pub invoice: Invoice,
    pub paid_at: NaiveDateTime,
}

impl PaymentReceipt {
    pub fn amount_display(&self) -> String {
        format_php(self.invoice.total_centavos)
    }
}

/// Settle an invoice after the simulated processing delay. Never declines.
pub async fn pay(
    method: PaymentMethod,
    invoice: Invoice,
    paid_at: NaiveDateTime,
    latency: SimulatedLatency,
    deadline: Duration,
    cancel: &CancelToken,
) -> LatencyResult<PaymentReceipt> {
    let receipt = PaymentReceipt {
        id: uuid::Uuid::new_v4().to_string(),
        method,
        invoice,
        paid_at,
    };
    let receipt = latency::simulate(latency, deadline, cancel, receipt).await?;
    tracing::info!(
        method = method.label(),
        amount = %receipt.amount_display(),
        "subscription payment settled"
    );
    Ok(receipt)
}

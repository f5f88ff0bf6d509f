use crate::core::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Provider-specific extras (tokens, redirect URLs, VA numbers)
pub type Metadata = BTreeMap<String, Value>;

/// Unified payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Expired,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 6] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Failed,
        PaymentStatus::Expired,
        PaymentStatus::Refunded,
        PaymentStatus::Cancelled,
    ];

    /// Classify a raw vendor status, ignoring case.
    /// Absent or unrecognized values are treated as still pending.
    pub fn from_vendor(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return PaymentStatus::Pending;
        };

        match raw.to_lowercase().as_str() {
            "settlement" | "capture" | "success" | "paid" => PaymentStatus::Paid,
            "pending" | "authorize" => PaymentStatus::Pending,
            "deny" | "failed" | "error" => PaymentStatus::Failed,
            "expire" | "expired" => PaymentStatus::Expired,
            "refund" | "partial_refund" => PaymentStatus::Refunded,
            "cancel" | "cancelled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment channel used by the customer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    Ewallet,
    Qris,
    Retail,
    Va,
    DirectDebit,
    #[default]
    Other,
}

impl PaymentMethod {
    /// Classify a vendor channel tag (Midtrans `payment_type`, Xendit
    /// payment method type) into the canonical method
    pub fn from_vendor(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "credit_card" | "card" | "credit" => PaymentMethod::CreditCard,
            "debit_card" | "debit" => PaymentMethod::DebitCard,
            "bank_transfer" | "echannel" | "permata" => PaymentMethod::BankTransfer,
            "va" | "virtual_account" => PaymentMethod::Va,
            "ewallet" | "e_wallet" | "gopay" | "shopeepay" | "ovo" | "dana" | "linkaja" => {
                PaymentMethod::Ewallet
            }
            "qris" | "qr_code" => PaymentMethod::Qris,
            "retail" | "cstore" | "retail_outlet" | "over_the_counter" => PaymentMethod::Retail,
            "direct_debit" => PaymentMethod::DirectDebit,
            _ => PaymentMethod::Other,
        }
    }
}

/// Canonical payment record every provider normalizes into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePayment {
    /// Provider tag, e.g. "midtrans"
    pub provider: String,

    /// Identifier assigned by the provider (transaction or invoice id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,

    /// Caller-supplied order reference
    pub order_id: String,

    pub amount: Decimal,

    #[serde(default)]
    pub currency: Currency,

    pub status: PaymentStatus,

    #[serde(default)]
    pub method: PaymentMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub metadata: Metadata,
}

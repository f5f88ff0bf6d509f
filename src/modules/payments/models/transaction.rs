use super::payment::{Metadata, PaymentStatus};
use crate::core::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of state-changing operation a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Charge,
    Refund,
    Disbursement,
    Settlement,
    Reversal,
}

/// Canonical ledger entry for a gateway operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Provider transaction identifier
    pub id: String,

    pub provider: String,

    /// Links back to the payment / order this transaction belongs to
    pub payment_id: String,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub status: PaymentStatus,

    pub amount: Decimal,

    #[serde(default)]
    pub currency: Currency,

    pub created_at: DateTime<Utc>,

    /// Unmodified vendor payload, kept for audit and debugging
    pub raw_response: Value,

    #[serde(default)]
    pub metadata: Metadata,
}

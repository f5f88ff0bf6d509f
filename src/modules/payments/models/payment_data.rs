use super::payment::Metadata;
use crate::core::{AppError, Currency, Result};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input for creating a checkout / invoice payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    /// Caller-supplied order reference (idempotency key at the gateway)
    pub order_id: String,

    /// Payment amount
    pub amount: Decimal,

    /// Currency (IDR when absent)
    #[serde(default)]
    pub currency: Option<Currency>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub customer_name: Option<String>,

    /// Lifetime of the checkout page / invoice in seconds
    #[serde(default)]
    pub expiry_seconds: Option<u64>,

    /// Success redirect URL
    #[serde(default)]
    pub success_redirect_url: Option<String>,

    /// Failure redirect URL
    #[serde(default)]
    pub failure_redirect_url: Option<String>,

    /// Provider-specific request extensions
    #[serde(flatten)]
    pub extra: Metadata,
}

impl PaymentData {
    pub fn new(order_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency: None,
            description: None,
            customer_email: None,
            customer_name: None,
            expiry_seconds: None,
            success_redirect_url: None,
            failure_redirect_url: None,
            extra: Metadata::new(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_customer(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_expiry_seconds(mut self, seconds: u64) -> Self {
        self.expiry_seconds = Some(seconds);
        self
    }

    pub fn with_redirects(
        mut self,
        success_url: impl Into<String>,
        failure_url: impl Into<String>,
    ) -> Self {
        self.success_redirect_url = Some(success_url.into());
        self.failure_redirect_url = Some(failure_url.into());
        self
    }

    /// Effective currency
    pub fn currency(&self) -> Currency {
        self.currency.unwrap_or_default()
    }

    /// Absolute expiry `expiry_seconds` after `now`
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let Some(seconds) = self.expiry_seconds else {
            return Ok(None);
        };

        i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .map(Some)
            .ok_or_else(|| AppError::validation("expiry_seconds out of range"))
    }

    /// Reject inputs no gateway would accept
    pub fn validate(&self) -> Result<()> {
        validate_order(&self.order_id, self.amount, self.currency())?;
        self.expires_at(Utc::now())?;
        Ok(())
    }
}

/// Input for creating a bank virtual account payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAccountData {
    pub order_id: String,

    pub amount: Decimal,

    #[serde(default)]
    pub currency: Option<Currency>,

    /// Bank / channel code, e.g. "bca", "BNI", "mandiri"
    pub bank_code: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub customer_name: Option<String>,

    /// VA number can receive more than one payment
    #[serde(default)]
    pub is_reusable: bool,

    /// VA only accepts exactly `amount`
    #[serde(default = "default_fixed_amount")]
    pub is_fixed_amount: bool,

    #[serde(flatten)]
    pub extra: Metadata,
}

fn default_fixed_amount() -> bool {
    true
}

impl VirtualAccountData {
    pub fn new(order_id: impl Into<String>, amount: Decimal, bank_code: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency: None,
            bank_code: bank_code.into(),
            description: None,
            customer_email: None,
            customer_name: None,
            is_reusable: false,
            is_fixed_amount: true,
            extra: Metadata::new(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_customer(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self.customer_name = Some(name.into());
        self
    }

    pub fn reusable(mut self, is_reusable: bool) -> Self {
        self.is_reusable = is_reusable;
        self
    }

    pub fn fixed_amount(mut self, is_fixed_amount: bool) -> Self {
        self.is_fixed_amount = is_fixed_amount;
        self
    }

    pub fn currency(&self) -> Currency {
        self.currency.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        validate_order(&self.order_id, self.amount, self.currency())?;
        if self.bank_code.trim().is_empty() {
            return Err(AppError::validation("bank_code must not be empty"));
        }
        Ok(())
    }
}

fn validate_order(order_id: &str, amount: Decimal, currency: Currency) -> Result<()> {
    if order_id.trim().is_empty() {
        return Err(AppError::validation("order_id must not be empty"));
    }
    currency.validate_amount(amount).map_err(AppError::Validation)
}

//! Response normalization shared by all adapters
//!
//! Vendors name the same facts differently (`gross_amount` vs `amount`,
//! `transaction_status` vs `status`). The functions here read the canonical
//! name first and then fall back to the known vendor aliases, always routing
//! the status through [`map_status`].

use crate::core::{timezone, AppError, Currency, Result};
use crate::modules::payments::{
    BasePayment, Metadata, PaymentMethod, PaymentStatus, Transaction, TransactionType,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

const ORDER_ID_KEYS: &[&str] = &["orderId", "order_id", "external_id", "reference_id", "id"];
const REFERENCE_ID_KEYS: &[&str] = &["referenceId", "transaction_id", "id"];
const AMOUNT_KEYS: &[&str] = &["amount", "gross_amount"];
const STATUS_KEYS: &[&str] = &["status", "transaction_status"];
const METHOD_KEYS: &[&str] = &["method", "payment_type", "payment_method.type", "payment_method"];
const EMAIL_KEYS: &[&str] = &[
    "customerEmail",
    "customer_details.email",
    "customer.email",
    "payer_email",
];
const NAME_KEYS: &[&str] = &["customerName", "customer_details.first_name", "customer.name"];
const CREATED_KEYS: &[&str] = &["createdAt", "transaction_time", "created"];
const UPDATED_KEYS: &[&str] = &["updatedAt", "updated_at", "updated"];
const EXPIRES_KEYS: &[&str] = &["expiresAt", "expiry_time", "expiry_date"];
const TRANSACTION_ID_KEYS: &[&str] = &["id", "transaction_id"];
const PAYMENT_ID_KEYS: &[&str] = &["paymentId", "order_id", "reference_id"];

/// Canonical status for a raw vendor status string
pub fn map_status(raw: Option<&str>) -> PaymentStatus {
    PaymentStatus::from_vendor(raw)
}

/// Build a canonical payment from a vendor (or adapter-assembled) payload
pub fn standardize_payment_response(
    provider: &str,
    raw: &Value,
    metadata: Metadata,
) -> Result<BasePayment> {
    let order_id = string_field(raw, ORDER_ID_KEYS).ok_or_else(|| {
        AppError::validation(format!("{} response is missing an order id", provider))
    })?;

    Ok(BasePayment {
        provider: provider.to_string(),
        reference_id: string_field(raw, REFERENCE_ID_KEYS),
        order_id,
        amount: amount_field(raw, provider)?,
        currency: currency_field(raw)?,
        status: map_status(str_field(raw, STATUS_KEYS)),
        method: str_field(raw, METHOD_KEYS)
            .map(PaymentMethod::from_vendor)
            .unwrap_or_default(),
        description: string_field(raw, &["description"]),
        customer_email: string_field(raw, EMAIL_KEYS),
        customer_name: string_field(raw, NAME_KEYS),
        created_at: timestamp_field(raw, CREATED_KEYS, provider)?.unwrap_or_else(Utc::now),
        updated_at: timestamp_field(raw, UPDATED_KEYS, provider)?,
        expires_at: timestamp_field(raw, EXPIRES_KEYS, provider)?,
        metadata,
    })
}

/// Build a canonical transaction, keeping the untouched vendor payload
pub fn standardize_transaction_response(
    provider: &str,
    raw: &Value,
    transaction_type: TransactionType,
    metadata: Metadata,
) -> Result<Transaction> {
    let id = string_field(raw, TRANSACTION_ID_KEYS).ok_or_else(|| {
        AppError::validation(format!("{} response is missing a transaction id", provider))
    })?;
    let payment_id = string_field(raw, PAYMENT_ID_KEYS).unwrap_or_else(|| id.clone());

    Ok(Transaction {
        id,
        provider: provider.to_string(),
        payment_id,
        transaction_type,
        status: map_status(str_field(raw, STATUS_KEYS)),
        amount: amount_field(raw, provider)?,
        currency: currency_field(raw)?,
        created_at: timestamp_field(raw, CREATED_KEYS, provider)?.unwrap_or_else(Utc::now),
        raw_response: raw.clone(),
        metadata,
    })
}

/// Copy the listed vendor fields into a metadata map, skipping absent ones
pub fn extract_metadata(raw: &Value, keys: &[&str]) -> Metadata {
    keys.iter()
        .filter_map(|key| lookup(raw, key).map(|value| (key.to_string(), value.clone())))
        .collect()
}

/// Value at a dotted path. `null` and empty strings count as absent.
pub(crate) fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let value = path
        .split('.')
        .try_fold(raw, |current, segment| current.get(segment))?;

    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

pub(crate) fn str_field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| lookup(raw, key).and_then(Value::as_str))
}

fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match lookup(raw, key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn has_amount(raw: &Value) -> bool {
    AMOUNT_KEYS.iter().any(|key| lookup(raw, key).is_some())
}

fn amount_field(raw: &Value, provider: &str) -> Result<Decimal> {
    let value = AMOUNT_KEYS
        .iter()
        .find_map(|key| lookup(raw, key))
        .ok_or_else(|| {
            AppError::validation(format!("{} response is missing an amount", provider))
        })?;

    let amount = parse_decimal(value).ok_or_else(|| {
        AppError::validation(format!("{} response has an invalid amount: {}", provider, value))
    })?;

    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} response has a negative amount: {}",
            provider, amount
        )));
    }

    Ok(amount)
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn currency_field(raw: &Value) -> Result<Currency> {
    match str_field(raw, &["currency"]) {
        Some(code) => code.parse().map_err(AppError::Validation),
        None => Ok(Currency::default()),
    }
}

fn timestamp_field(raw: &Value, keys: &[&str], provider: &str) -> Result<Option<DateTime<Utc>>> {
    str_field(raw, keys)
        .map(|text| timezone::parse_gateway_timestamp(text, provider).map_err(AppError::Validation))
        .transpose()
}

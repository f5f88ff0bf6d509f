// Test data factory
//
// Provider configs and vendor payloads shaped like the real Midtrans and
// Xendit responses.

use serde_json::{json, Value};
use unipay::ProviderConfig;

pub fn midtrans_config() -> ProviderConfig {
    ProviderConfig::new()
        .with_client_id("test_client_id")
        .with_secret_key("test_server_key")
        .with_production(false)
}

pub fn xendit_config() -> ProviderConfig {
    ProviderConfig::new()
        .with_secret_key("xnd_development_test_key")
        .with_production(false)
}

/// Midtrans Snap `/transactions` response
pub fn snap_response() -> Value {
    json!({
        "token": "snap-token-123",
        "redirect_url": "https://app.sandbox.midtrans.com/snap/v2/vtweb/snap-token-123"
    })
}

/// Midtrans Core API charge response for a BCA virtual account
pub fn midtrans_charge_response() -> Value {
    json!({
        "status_code": "201",
        "status_message": "Success, Bank Transfer transaction is created",
        "transaction_id": "txn-123",
        "order_id": "order-123",
        "gross_amount": "10000.00",
        "currency": "IDR",
        "payment_type": "bank_transfer",
        "transaction_time": "2023-01-01 07:00:00",
        "transaction_status": "pending",
        "fraud_status": "accept",
        "va_numbers": [{ "bank": "bca", "va_number": "12345678901" }]
    })
}

/// Midtrans Core API status response
pub fn midtrans_status_response(transaction_status: &str) -> Value {
    json!({
        "status_code": "200",
        "status_message": "Success, transaction is found",
        "transaction_id": "txn-123",
        "order_id": "order-123",
        "gross_amount": "10000.00",
        "currency": "IDR",
        "payment_type": "bank_transfer",
        "transaction_time": "2023-01-01 07:00:00",
        "expiry_time": "2023-01-02 07:00:00",
        "transaction_status": transaction_status,
        "fraud_status": "accept",
        "va_numbers": [{ "bank": "bca", "va_number": "12345678901" }]
    })
}

/// Midtrans Core API cancel response
pub fn midtrans_cancel_response() -> Value {
    json!({
        "status_code": "200",
        "status_message": "Success, transaction is canceled",
        "transaction_id": "txn-123",
        "order_id": "order-123",
        "gross_amount": "10000.00",
        "payment_type": "bank_transfer",
        "transaction_time": "2023-01-01 07:00:00",
        "transaction_status": "cancel"
    })
}

/// Xendit `/v2/invoices` response
pub fn xendit_invoice_response() -> Value {
    json!({
        "id": "invoice-123",
        "external_id": "order-123",
        "status": "PENDING",
        "amount": 10000,
        "currency": "IDR",
        "description": "Xendit Snap Payment",
        "invoice_url": "https://checkout-staging.xendit.co/web/invoice-123",
        "expiry_date": "2023-01-02T00:00:00.000Z",
        "created": "2023-01-01T00:00:00.000Z",
        "updated": "2023-01-01T00:00:00.000Z"
    })
}

/// Xendit `/payment_requests` response for a virtual account
pub fn xendit_payment_request_response(status: &str) -> Value {
    json!({
        "id": "pr-123",
        "reference_id": "order-123",
        "status": status,
        "amount": 10000,
        "currency": "IDR",
        "country": "ID",
        "description": "Test payment",
        "created": "2023-01-01T00:00:00.000Z",
        "updated": "2023-01-01T01:00:00.000Z",
        "payment_method": {
            "id": "pm-123",
            "type": "VIRTUAL_ACCOUNT",
            "reusability": "ONE_TIME_USE",
            "status": "ACTIVE",
            "virtual_account": {
                "channel_code": "BCA",
                "channel_properties": {
                    "customer_name": "Test User",
                    "virtual_account_number": "1234567890"
                }
            }
        },
        "customer": {
            "email": "test@example.com",
            "name": "Test User"
        }
    })
}

/// Payment request for an open-amount VA; Xendit omits the amount
pub fn xendit_open_amount_response(status: &str) -> Value {
    let mut response = xendit_payment_request_response(status);
    if let Some(fields) = response.as_object_mut() {
        fields.remove("amount");
    }
    response["payment_method"]["reusability"] = json!("MULTIPLE_USE");
    response
}

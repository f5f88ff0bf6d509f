// Midtrans adapter flows against an in-memory Snap/Core API

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{TimeZone, Utc};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::json;
use unipay::{
    AppError, Currency, PaymentData, PaymentMethod, PaymentProvider, PaymentStatus,
    TransactionType, VendorError, VirtualAccountData,
};

#[tokio::test]
async fn test_create_payment_minimal() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let payment = provider
        .create_payment(PaymentData::new("order-123", dec!(10000)))
        .await
        .unwrap();

    assert_eq!(payment.provider, "midtrans");
    assert_eq!(payment.order_id, "order-123");
    assert_eq!(payment.amount, dec!(10000));
    assert_eq!(payment.currency, Currency::IDR);
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.method, PaymentMethod::Other);
    assert_eq!(payment.description.as_deref(), Some("Midtrans Snap Payment"));
    assert!(payment.customer_email.is_none());
    assert_eq!(payment.metadata["token"], "snap-token-123");
    assert_eq!(
        payment.metadata["redirect_url"],
        "https://app.sandbox.midtrans.com/snap/v2/vtweb/snap-token-123"
    );

    assert_eq!(
        fake.calls(),
        vec![VendorCall::SnapCreate(json!({
            "transaction_details": { "order_id": "order-123", "gross_amount": "10000" }
        }))]
    );
}

#[tokio::test]
async fn test_create_payment_full() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let before = Utc::now();
    let payment = provider
        .create_payment(
            PaymentData::new("order-123", dec!(10000))
                .with_description("Test payment")
                .with_customer("test@example.com", "Test User")
                .with_expiry_seconds(3600),
        )
        .await
        .unwrap();

    assert_eq!(payment.description.as_deref(), Some("Test payment"));
    assert_eq!(payment.customer_email.as_deref(), Some("test@example.com"));
    assert_eq!(payment.customer_name.as_deref(), Some("Test User"));
    let expires_at = payment.expires_at.unwrap();
    assert!(expires_at >= before + chrono::Duration::seconds(3599));

    let calls = fake.calls();
    let VendorCall::SnapCreate(request) = &calls[0] else {
        panic!("expected a snap call");
    };
    assert_eq!(request["customer_details"]["email"], "test@example.com");
    assert_eq!(request["item_details"][0]["name"], "Test payment");
    assert_eq!(request["expiry"], json!({ "duration": 60, "unit": "minutes" }));
}

#[tokio::test]
async fn test_invalid_payment_data_never_reaches_vendor() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let err = provider
        .create_payment(PaymentData::new("order-123", dec!(-1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = provider
        .create_payment(PaymentData::new("order-123", dec!(100.5)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_out_of_range_expiry_never_reaches_vendor() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    for seconds in [u64::MAX / 2, u64::MAX] {
        let err = provider
            .create_payment(PaymentData::new("order-1", dec!(10000)).with_expiry_seconds(seconds))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref msg) if msg == "expiry_seconds out of range"));
    }
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_create_virtual_account() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let transaction = provider
        .create_virtual_account(
            VirtualAccountData::new("order-123", dec!(10000), "BCA")
                .with_customer("test@example.com", "Test User"),
        )
        .await
        .unwrap();

    assert_eq!(transaction.id, "txn-123");
    assert_eq!(transaction.provider, "midtrans");
    assert_eq!(transaction.payment_id, "order-123");
    assert_eq!(transaction.transaction_type, TransactionType::Charge);
    assert_eq!(transaction.status, PaymentStatus::Pending);
    assert_eq!(transaction.amount, dec!(10000));
    assert_eq!(
        transaction.created_at,
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(transaction.raw_response, midtrans_charge_response());
    assert_eq!(
        transaction.metadata["va_numbers"],
        json!([{ "bank": "bca", "va_number": "12345678901" }])
    );
    assert_eq!(transaction.metadata["payment_type"], "bank_transfer");
    assert!(!transaction.metadata.contains_key("bill_key"));

    let calls = fake.calls();
    let VendorCall::Charge(request) = &calls[0] else {
        panic!("expected a charge call");
    };
    assert_eq!(request["payment_type"], "bank_transfer");
    assert_eq!(request["bank_transfer"]["bank"], "bca");
    assert_eq!(request["customer_details"]["first_name"], "Test User");
}

#[tokio::test]
async fn test_get_payment_status() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let payment = provider.get_payment_status("order-123").await.unwrap();

    assert_eq!(payment.order_id, "order-123");
    assert_eq!(payment.reference_id.as_deref(), Some("txn-123"));
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.method, PaymentMethod::BankTransfer);
    assert_eq!(payment.amount, dec!(10000));
    assert_eq!(
        payment.expires_at,
        Some(Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap())
    );
    assert_eq!(payment.metadata["fraud_status"], "accept");
    assert_eq!(payment.metadata["transaction_status"], "settlement");
    assert!(!payment.metadata.contains_key("approval_code"));

    assert_eq!(fake.calls(), vec![VendorCall::Status("order-123".to_string())]);
}

#[tokio::test]
async fn test_status_variants_map_to_canonical_values() {
    for (raw, expected) in [
        ("capture", PaymentStatus::Paid),
        ("deny", PaymentStatus::Failed),
        ("expire", PaymentStatus::Expired),
        ("refund", PaymentStatus::Refunded),
        ("cancel", PaymentStatus::Cancelled),
        ("authorize", PaymentStatus::Pending),
    ] {
        let fake = FakeMidtrans::new();
        *fake.status_response.lock().unwrap() = midtrans_status_response(raw);
        let provider = midtrans_with_fake(&fake);

        let payment = provider.get_payment_status("order-123").await.unwrap();
        assert_eq!(payment.status, expected, "{}", raw);
    }
}

#[tokio::test]
async fn test_get_payment_status_rejects_empty_reference() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let err = provider.get_payment_status("").await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_not_found_is_a_provider_error() {
    let fake = FakeMidtrans::new();
    fake.fail_with(VendorError::new("midtrans", "Transaction doesn't exist.").with_status(404));
    let provider = midtrans_with_fake(&fake);

    let err = provider.get_payment_status("missing").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Provider error in get_payment_status: Transaction doesn't exist."
    );
    assert!(err.is_vendor_specific());
}

#[tokio::test]
async fn test_transport_errors_are_not_wrapped() {
    struct Unreachable;

    #[async_trait::async_trait]
    impl unipay::modules::providers::CoreApi for Unreachable {
        async fn charge(&self, _request: &serde_json::Value) -> unipay::Result<serde_json::Value> {
            Err(AppError::gateway("Midtrans gateway unavailable: timeout"))
        }

        async fn status(&self, _id: &str) -> unipay::Result<serde_json::Value> {
            Err(AppError::gateway("Midtrans gateway unavailable: timeout"))
        }

        async fn cancel(&self, _id: &str) -> unipay::Result<serde_json::Value> {
            Err(AppError::gateway("Midtrans gateway unavailable: timeout"))
        }
    }

    let fake = FakeMidtrans::new();
    let clients = unipay::modules::providers::MidtransClients::new(
        fake.clone(),
        std::sync::Arc::new(Unreachable),
        unipay::GatewayEnvironment::Sandbox,
    );
    let provider =
        unipay::modules::providers::MidtransProvider::with_clients(midtrans_config(), clients)
            .unwrap();

    let err = provider.cancel_payment("order-123").await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));
}

#[tokio::test]
async fn test_cancel_payment() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let payment = provider.cancel_payment("order-123").await.unwrap();

    assert_eq!(payment.status, PaymentStatus::Cancelled);
    assert_eq!(payment.description.as_deref(), Some("Payment cancelled"));
    assert_eq!(
        payment.metadata["status_message"],
        "Success, transaction is canceled"
    );
    assert_eq!(fake.calls(), vec![VendorCall::Cancel("order-123".to_string())]);
}

#[tokio::test]
async fn test_cancel_defaults_status_when_vendor_omits_it() {
    let fake = FakeMidtrans::new();
    *fake.cancel_response.lock().unwrap() = json!({
        "status_code": "200",
        "order_id": "order-123",
        "gross_amount": "10000.00"
    });
    let provider = midtrans_with_fake(&fake);

    let payment = provider.cancel_payment("order-123").await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Cancelled);
}

#[tokio::test]
async fn test_malformed_vendor_payload_fails_loudly() {
    let fake = FakeMidtrans::new();
    *fake.status_response.lock().unwrap() = json!({
        "order_id": "order-123",
        "transaction_status": "settlement"
    });
    let provider = midtrans_with_fake(&fake);

    let err = provider.get_payment_status("order-123").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_seeded_clients_are_reused() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);

    let first = provider.client().await.unwrap();
    let second = provider.client().await.unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.vendor(), "midtrans");
}

#[test]
fn test_notification_signature_round_trip() {
    let fake = FakeMidtrans::new();
    let provider = midtrans_with_fake(&fake);
    let notification = json!({
        "order_id": "order-123",
        "status_code": "200",
        "gross_amount": "10000.00",
        "transaction_status": "settlement"
    });

    let signature = provider.generate_signature(&notification).unwrap();

    assert_eq!(signature.len(), 128);
    assert!(provider.verify_signature(&notification, &signature).unwrap());

    let tampered = json!({
        "order_id": "order-123",
        "status_code": "200",
        "gross_amount": "99999.00"
    });
    assert!(!provider.verify_signature(&tampered, &signature).unwrap());
}

// Facade behavior: provider gating, forwarding, optional capabilities

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use helpers::*;
use rust_decimal_macros::dec;
use serde_json::json;
use unipay::{
    AppError, Capability, Metadata, PaymentData, PaymentStatus, ProviderConfig,
    ProviderRegistry, Unipay, VendorError, VirtualAccountData,
};

#[tokio::test]
async fn test_every_operation_fails_without_provider() {
    let unipay = Unipay::default();

    assert!(matches!(
        unipay
            .create_payment(PaymentData::new("order-1", dec!(10000)))
            .await,
        Err(AppError::NoProviderConfigured)
    ));
    assert!(matches!(
        unipay
            .create_virtual_account(VirtualAccountData::new("order-1", dec!(10000), "bca"))
            .await,
        Err(AppError::NoProviderConfigured)
    ));
    assert!(matches!(
        unipay.get_payment_status("ref-1").await,
        Err(AppError::NoProviderConfigured)
    ));
    assert!(matches!(
        unipay.cancel_payment("ref-1").await,
        Err(AppError::NoProviderConfigured)
    ));
    assert!(matches!(
        unipay.get_client().await,
        Err(AppError::NoProviderConfigured)
    ));
}

#[tokio::test]
async fn test_create_payment_is_forwarded() {
    let mut unipay = Unipay::default();
    unipay.set_provider(Arc::new(StubProvider::new(ProviderConfig::default())));

    let payment = unipay
        .create_payment(
            PaymentData::new("order-1", dec!(25000)).with_description("Monthly plan"),
        )
        .await
        .unwrap();

    assert_eq!(payment.provider, "stub");
    assert_eq!(payment.order_id, "order-1");
    assert_eq!(payment.amount, dec!(25000));
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.description.as_deref(), Some("Monthly plan"));
}

#[tokio::test]
async fn test_create_virtual_account_is_forwarded() {
    let mut unipay = Unipay::default();
    unipay.set_provider(Arc::new(StubProvider::new(ProviderConfig::default())));

    let transaction = unipay
        .create_virtual_account(VirtualAccountData::new("order-9", dec!(50000), "bni"))
        .await
        .unwrap();

    assert_eq!(transaction.id, "txn-order-9");
    assert_eq!(transaction.payment_id, "order-9");
}

#[tokio::test]
async fn test_provider_errors_propagate_unchanged() {
    let mut unipay = Unipay::default();
    unipay.set_provider(Arc::new(StubProvider::failing()));

    let err = unipay
        .create_payment(PaymentData::new("order-1", dec!(10000)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Gateway(ref msg) if msg == "stub gateway unavailable"));
}

#[tokio::test]
async fn test_missing_optional_capabilities_are_unsupported() {
    let mut unipay = Unipay::default();
    unipay.set_provider(Arc::new(StubProvider::new(ProviderConfig::default())));

    assert!(!unipay.supports(Capability::PaymentStatus));
    assert!(!unipay.supports(Capability::Cancellation));

    let err = unipay.get_payment_status("ref-1").await.unwrap_err();
    assert!(matches!(err, AppError::UnsupportedOperation(_)));
    assert_eq!(
        err.to_string(),
        "get_payment_status is not supported by provider 'stub'"
    );

    let err = unipay.cancel_payment("ref-1").await.unwrap_err();
    assert!(matches!(err, AppError::UnsupportedOperation(_)));
}

#[tokio::test]
#[allow(deprecated)]
async fn test_snap_delegates_to_provider_snap() {
    let provider = Arc::new(StubProvider::new(ProviderConfig::default()));
    let mut unipay = Unipay::default();
    unipay.set_provider(provider.clone());

    let client = unipay.snap().await.unwrap();

    assert_eq!(client.vendor(), "stub");
    assert_eq!(provider.snap_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_client_returns_provider_client() {
    let provider = Arc::new(StubProvider::new(ProviderConfig::default()));
    let mut unipay = Unipay::default();
    unipay.set_provider(provider.clone());

    let client = unipay.get_client().await.unwrap();

    assert!(client.as_any().downcast_ref::<StubClient>().is_some());
    assert_eq!(provider.client_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.snap_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_set_provider_replaces_active_provider() {
    let fake = FakeXendit::new();
    let mut unipay = Unipay::new(Metadata::from([("log".to_string(), json!("none"))]));

    unipay.set_provider(Arc::new(StubProvider::new(ProviderConfig::default())));
    unipay.set_provider(Arc::new(xendit_with_fake(&fake)));

    assert_eq!(unipay.provider().map(|p| p.name()), Some("xendit"));
    assert_eq!(unipay.options().get("log"), Some(&json!("none")));
    assert!(unipay.supports(Capability::PaymentStatus));
}

#[tokio::test]
async fn test_xendit_cancellation_message_reaches_caller() {
    let fake = FakeXendit::new();
    let mut unipay = Unipay::default();
    unipay.set_provider(Arc::new(xendit_with_fake(&fake)));

    let err = unipay.cancel_payment("pr-123").await.unwrap_err();

    assert!(matches!(err, AppError::UnsupportedOperation(_)));
    assert_eq!(
        err.to_string(),
        "Xendit does not support payment cancellation; recreate a new payment for this order"
    );
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_vendor_failure_is_attributed_to_operation() {
    let fake = FakeMidtrans::new();
    fake.fail_with(VendorError::new("midtrans", "Transaction doesn't exist.").with_status(404));

    let mut unipay = Unipay::default();
    unipay.set_provider(Arc::new(midtrans_with_fake(&fake)));

    let err = unipay.get_payment_status("missing-order").await.unwrap_err();

    match err {
        AppError::Provider { operation, source } => {
            assert_eq!(operation, "get_payment_status");
            assert!(source.is_not_found());
        }
        other => panic!("expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_end_to_end_with_registry() {
    let registry = ProviderRegistry::new();
    let provider = registry.create("midtrans", midtrans_config()).unwrap();

    let mut unipay = Unipay::default();
    unipay.set_provider(provider);

    assert!(unipay.supports(Capability::Cancellation));
    let client = unipay.get_client().await.unwrap();
    assert_eq!(client.vendor(), "midtrans");
}

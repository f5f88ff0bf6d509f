use crate::config::{GatewayEnvironment, ProviderConfig};
use crate::core::{AppError, Result};
use crate::modules::payments::{BasePayment, PaymentData, Transaction, VirtualAccountData};
use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Optional capabilities a provider may or may not offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `get_payment_status`
    PaymentStatus,
    /// `cancel_payment`
    Cancellation,
    /// Deprecated snap-style client accessor
    LegacySnap,
}

/// Vendor client bundle cached by a provider
///
/// Returned type-erased through the facade; downcast with `as_any` to reach
/// the concrete bundle (e.g. `MidtransClients`).
pub trait VendorClient: Send + Sync + fmt::Debug {
    /// Vendor tag
    fn vendor(&self) -> &str;

    fn environment(&self) -> GatewayEnvironment;

    fn as_any(&self) -> &dyn Any;
}

/// Payment provider trait every gateway adapter implements
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider type identifier, e.g. "midtrans"
    fn name(&self) -> &str;

    /// Configuration the provider was built with
    fn config(&self) -> &ProviderConfig;

    /// Whether an optional capability is backed by the vendor
    fn supports(&self, _capability: Capability) -> bool {
        false
    }

    /// Vendor client, created on first use and cached afterwards
    async fn client(&self) -> Result<Arc<dyn VendorClient>>;

    /// Legacy snap accessor kept for older callers
    async fn snap(&self) -> Result<Arc<dyn VendorClient>> {
        self.client().await
    }

    /// Create a unified payment (checkout page or invoice)
    async fn create_payment(&self, data: PaymentData) -> Result<BasePayment>;

    /// Create a virtual-account payment
    async fn create_virtual_account(&self, data: VirtualAccountData) -> Result<Transaction>;

    /// Query the current state of a payment by its provider reference
    async fn get_payment_status(&self, _reference_id: &str) -> Result<BasePayment> {
        Err(AppError::unsupported(format!(
            "get_payment_status is not supported by provider '{}'",
            self.name()
        )))
    }

    /// Cancel a payment by its provider reference
    async fn cancel_payment(&self, _reference_id: &str) -> Result<BasePayment> {
        Err(AppError::unsupported(format!(
            "cancel_payment is not supported by provider '{}'",
            self.name()
        )))
    }

    /// Signature hook for request validation / notification verification.
    /// Defaults to the compact JSON encoding of the payload.
    fn generate_signature(&self, payload: &Value) -> Result<String> {
        Ok(serde_json::to_string(payload)?)
    }

    /// Check a signature received alongside `payload`
    fn verify_signature(&self, payload: &Value, signature: &str) -> Result<bool> {
        Ok(self.generate_signature(payload)? == signature)
    }
}

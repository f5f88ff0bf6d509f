use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::core::{AppError, Result};
use crate::modules::payments::{
    BasePayment, Metadata, PaymentData, Transaction, VirtualAccountData,
};
use crate::modules::providers::{Capability, PaymentProvider, VendorClient};

/// Single entry point for callers; forwards every payment operation to the
/// active provider
#[derive(Clone, Default)]
pub struct Unipay {
    options: Metadata,
    provider: Option<Arc<dyn PaymentProvider>>,
}

impl Unipay {
    pub fn new(options: Metadata) -> Self {
        Self {
            options,
            provider: None,
        }
    }

    /// Free-form options held for the caller; not interpreted yet
    pub fn options(&self) -> &Metadata {
        &self.options
    }

    /// Replace the active provider
    pub fn set_provider(&mut self, provider: Arc<dyn PaymentProvider>) {
        info!(provider = %provider.name(), "Active payment provider set");
        self.provider = Some(provider);
    }

    pub fn provider(&self) -> Option<&Arc<dyn PaymentProvider>> {
        self.provider.as_ref()
    }

    /// Whether the active provider backs an optional capability.
    /// False when no provider is set.
    pub fn supports(&self, capability: Capability) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|provider| provider.supports(capability))
    }

    fn active_provider(&self) -> Result<&Arc<dyn PaymentProvider>> {
        self.provider.as_ref().ok_or(AppError::NoProviderConfigured)
    }

    pub async fn get_client(&self) -> Result<Arc<dyn VendorClient>> {
        self.active_provider()?.client().await
    }

    /// Legacy snap-style client accessor
    #[deprecated(note = "use `get_client` instead")]
    pub async fn snap(&self) -> Result<Arc<dyn VendorClient>> {
        self.active_provider()?.snap().await
    }

    /// Create a payment with the active provider
    pub async fn create_payment(&self, data: PaymentData) -> Result<BasePayment> {
        let provider = self.active_provider()?;

        info!(
            provider = %provider.name(),
            order_id = %data.order_id,
            amount = %data.amount,
            "Creating payment"
        );

        match provider.create_payment(data).await {
            Ok(payment) => {
                info!(
                    provider = %provider.name(),
                    order_id = %payment.order_id,
                    status = %payment.status,
                    "Payment created successfully"
                );
                Ok(payment)
            }
            Err(e) => {
                error!(provider = %provider.name(), error = %e, "Failed to create payment");
                Err(e)
            }
        }
    }

    /// Create a virtual-account payment with the active provider
    pub async fn create_virtual_account(&self, data: VirtualAccountData) -> Result<Transaction> {
        let provider = self.active_provider()?;

        info!(
            provider = %provider.name(),
            order_id = %data.order_id,
            bank_code = %data.bank_code,
            "Creating virtual account"
        );

        match provider.create_virtual_account(data).await {
            Ok(transaction) => {
                info!(
                    provider = %provider.name(),
                    transaction_id = %transaction.id,
                    status = %transaction.status,
                    "Virtual account created successfully"
                );
                Ok(transaction)
            }
            Err(e) => {
                error!(
                    provider = %provider.name(),
                    error = %e,
                    "Failed to create virtual account"
                );
                Err(e)
            }
        }
    }

    /// Query a payment; fails with `UnsupportedOperation` if the provider has no status lookup
    pub async fn get_payment_status(&self, reference_id: &str) -> Result<BasePayment> {
        let provider = self.active_provider()?;
        info!(provider = %provider.name(), reference_id = %reference_id, "Fetching payment status");

        provider
            .get_payment_status(reference_id)
            .await
            .inspect_err(|e| {
                error!(
                    provider = %provider.name(),
                    reference_id = %reference_id,
                    error = %e,
                    "Failed to fetch payment status"
                )
            })
    }

    /// Cancel a payment; fails with `UnsupportedOperation` if the provider cannot cancel
    pub async fn cancel_payment(&self, reference_id: &str) -> Result<BasePayment> {
        let provider = self.active_provider()?;
        info!(provider = %provider.name(), reference_id = %reference_id, "Cancelling payment");

        match provider.cancel_payment(reference_id).await {
            Ok(payment) => {
                info!(
                    provider = %provider.name(),
                    reference_id = %reference_id,
                    status = %payment.status,
                    "Payment cancelled"
                );
                Ok(payment)
            }
            Err(e) => {
                error!(
                    provider = %provider.name(),
                    reference_id = %reference_id,
                    error = %e,
                    "Failed to cancel payment"
                );
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Unipay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unipay")
            .field("options", &self.options)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .finish()
    }
}

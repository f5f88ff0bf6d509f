//! Unipay payment gateway unification library
//!
//! One API (`create_payment`, `create_virtual_account`, `get_payment_status`,
//! `cancel_payment`) over several Indonesian payment gateways. Vendor
//! responses are normalized into [`BasePayment`] and [`Transaction`].
//!
//! ```no_run
//! use rust_decimal_macros::dec;
//! use unipay::{PaymentData, ProviderConfig, ProviderRegistry, Unipay};
//!
//! # async fn run() -> unipay::Result<()> {
//! let registry = ProviderRegistry::new();
//! let provider = registry.create(
//!     "midtrans",
//!     ProviderConfig::new()
//!         .with_client_id("client-id")
//!         .with_secret_key("server-key")
//!         .with_production(false),
//! )?;
//!
//! let mut unipay = Unipay::default();
//! unipay.set_provider(provider);
//! let payment = unipay
//!     .create_payment(PaymentData::new("order-123", dec!(10000)))
//!     .await?;
//! println!("{}", payment.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use config::{GatewayEnvironment, ProviderConfig};
pub use core::{AppError, Currency, Result, VendorError};
pub use modules::payments::{
    BasePayment, Metadata, PaymentData, PaymentMethod, PaymentStatus, Transaction,
    TransactionType, VirtualAccountData,
};
pub use modules::providers::{
    BaseProvider, Capability, PaymentProvider, ProviderCore, ProviderRegistry, VendorClient,
};
pub use modules::unipay::Unipay;

use std::env;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unipay::{Currency, PaymentData, ProviderConfig, ProviderRegistry, Unipay, VirtualAccountData};

/// Create one payment (or virtual account, when `UNIPAY_VA_BANK` is set)
/// with the provider named by `UNIPAY_PROVIDER` and print it as JSON.
///
/// Credentials come from the provider-prefixed variables, e.g.
/// `MIDTRANS_CLIENT_ID`, `MIDTRANS_SECRET_KEY`, `XENDIT_IS_PRODUCTION`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unipay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let provider_type = env::var("UNIPAY_PROVIDER").unwrap_or_else(|_| "midtrans".to_string());
    let order_id = env::var("UNIPAY_ORDER_ID").context("UNIPAY_ORDER_ID is not set")?;
    let amount: Decimal = env::var("UNIPAY_AMOUNT")
        .context("UNIPAY_AMOUNT is not set")?
        .trim()
        .parse()
        .context("UNIPAY_AMOUNT is not a valid amount")?;
    let currency = match env::var("UNIPAY_CURRENCY") {
        Ok(raw) => raw.parse::<Currency>().map_err(anyhow::Error::msg)?,
        Err(_) => Currency::default(),
    };

    let config = ProviderConfig::from_env(&provider_type)?;
    let registry = ProviderRegistry::new();
    let provider = registry.create(&provider_type, config)?;

    let mut unipay = Unipay::default();
    unipay.set_provider(provider);

    tracing::info!(provider = %provider_type, order_id = %order_id, "Starting unipay");

    let output = match env::var("UNIPAY_VA_BANK") {
        Ok(bank_code) => {
            let data = VirtualAccountData::new(order_id, amount, bank_code).with_currency(currency);
            serde_json::to_string_pretty(&unipay.create_virtual_account(data).await?)?
        }
        Err(_) => {
            let data = PaymentData::new(order_id, amount).with_currency(currency);
            serde_json::to_string_pretty(&unipay.create_payment(data).await?)?
        }
    };

    println!("{}", output);
    Ok(())
}

use super::base_provider::{BaseProvider, ProviderCore};
use super::normalize::{self, extract_metadata};
use super::provider_trait::{Capability, PaymentProvider, VendorClient};
use crate::config::{GatewayEnvironment, ProviderConfig};
use crate::core::{AppError, Result, VendorError};
use crate::modules::payments::{
    BasePayment, Metadata, PaymentData, Transaction, TransactionType, VirtualAccountData,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha512};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub const PROVIDER_NAME: &str = "midtrans";

const REQUIRED_CONFIG: &[&str] = &["client_id", "secret_key"];
const DEFAULT_DESCRIPTION: &str = "Midtrans Snap Payment";

const SANDBOX_API_URL: &str = "https://api.sandbox.midtrans.com";
const PRODUCTION_API_URL: &str = "https://api.midtrans.com";
const SANDBOX_SNAP_URL: &str = "https://app.sandbox.midtrans.com/snap/v1";
const PRODUCTION_SNAP_URL: &str = "https://app.midtrans.com/snap/v1";

const VA_METADATA_KEYS: &[&str] = &[
    "va_numbers",
    "payment_type",
    "permata_va_number",
    "bill_key",
    "biller_code",
];
const STATUS_METADATA_KEYS: &[&str] = &[
    "transaction_status",
    "fraud_status",
    "approval_code",
    "payment_type",
    "transaction_time",
    "gross_amount",
    "va_numbers",
    "permata_va_number",
    "bill_key",
    "biller_code",
];

/// Midtrans Snap (hosted checkout) API
#[async_trait]
pub trait SnapApi: Send + Sync {
    async fn create_transaction(&self, request: &Value) -> Result<SnapTransaction>;
}

/// Midtrans Core API (direct charges and transaction management)
#[async_trait]
pub trait CoreApi: Send + Sync {
    async fn charge(&self, request: &Value) -> Result<Value>;

    async fn status(&self, transaction_id: &str) -> Result<Value>;

    async fn cancel(&self, transaction_id: &str) -> Result<Value>;
}

/// Snap checkout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

/// Snap + Core client pair cached by `MidtransProvider`
#[derive(Clone)]
pub struct MidtransClients {
    pub snap: Arc<dyn SnapApi>,
    pub core: Arc<dyn CoreApi>,
    environment: GatewayEnvironment,
}

impl MidtransClients {
    pub fn new(
        snap: Arc<dyn SnapApi>,
        core: Arc<dyn CoreApi>,
        environment: GatewayEnvironment,
    ) -> Self {
        Self {
            snap,
            core,
            environment,
        }
    }
}

impl fmt::Debug for MidtransClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidtransClients")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl VendorClient for MidtransClients {
    fn vendor(&self) -> &str {
        PROVIDER_NAME
    }

    fn environment(&self) -> GatewayEnvironment {
        self.environment
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// HTTP client for the Midtrans Snap and Core APIs
///
/// API Documentation: https://docs.midtrans.com/reference/api-reference
pub struct MidtransHttpClient {
    client: Client,
    server_key: String,
    api_url: String,
    snap_url: String,
}

impl MidtransHttpClient {
    /// Create a client from a validated provider config
    ///
    /// `base_url` / `snap_base_url` override the Core and Snap hosts,
    /// `timeout_secs` bounds every request.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let server_key = config
            .secret_key
            .clone()
            .ok_or_else(|| AppError::MissingConfig(vec!["secret_key".to_string()]))?;

        let (default_api, default_snap) = match config.environment() {
            GatewayEnvironment::Production => (PRODUCTION_API_URL, PRODUCTION_SNAP_URL),
            GatewayEnvironment::Sandbox => (SANDBOX_API_URL, SANDBOX_SNAP_URL),
        };

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            server_key,
            api_url: config
                .extra_str("base_url")
                .unwrap_or(default_api)
                .trim_end_matches('/')
                .to_string(),
            snap_url: config
                .extra_str("snap_base_url")
                .unwrap_or(default_snap)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Send with server-key Basic auth and classify the outcome
    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .basic_auth(&self.server_key, Some(""))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AppError::gateway(format!(
                        "Midtrans gateway unavailable: {} ({})",
                        if e.is_timeout() {
                            "timeout"
                        } else {
                            "connection failed"
                        },
                        e
                    ))
                } else {
                    AppError::gateway(format!("Midtrans API request failed: {}", e))
                }
            })?;

        let http_status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::gateway(format!("Failed to read Midtrans response: {}", e)))?;

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if http_status >= 400 => {
                return Err(VendorError::new(PROVIDER_NAME, body)
                    .with_status(http_status)
                    .into())
            }
            Err(e) => {
                return Err(AppError::gateway(format!(
                    "Failed to parse Midtrans response: {}",
                    e
                )))
            }
        };

        match midtrans_error(http_status, &payload) {
            Some(err) => Err(err.into()),
            None => Ok(payload),
        }
    }
}

#[async_trait]
impl SnapApi for MidtransHttpClient {
    async fn create_transaction(&self, request: &Value) -> Result<SnapTransaction> {
        let url = format!("{}/transactions", self.snap_url);
        let payload = self.execute(self.client.post(&url).json(request)).await?;

        serde_json::from_value(payload)
            .map_err(|e| AppError::gateway(format!("Failed to parse Midtrans response: {}", e)))
    }
}

#[async_trait]
impl CoreApi for MidtransHttpClient {
    async fn charge(&self, request: &Value) -> Result<Value> {
        let url = format!("{}/v2/charge", self.api_url);
        self.execute(self.client.post(&url).json(request)).await
    }

    async fn status(&self, transaction_id: &str) -> Result<Value> {
        let url = format!("{}/v2/{}/status", self.api_url, transaction_id);
        self.execute(self.client.get(&url)).await
    }

    async fn cancel(&self, transaction_id: &str) -> Result<Value> {
        let url = format!("{}/v2/{}/cancel", self.api_url, transaction_id);
        self.execute(self.client.post(&url)).await
    }
}

/// Midtrans reports failures either through the HTTP status or through a
/// `status_code` in an otherwise 200 response body.
fn midtrans_error(http_status: u16, payload: &Value) -> Option<VendorError> {
    let body_status = payload.get("status_code").and_then(|code| match code {
        Value::String(s) => s.parse::<u16>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    });

    let status = match body_status {
        Some(code) if code >= 400 => code,
        _ if http_status >= 400 => http_status,
        _ => return None,
    };

    let message = payload
        .get("status_message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            payload
                .get("error_messages")
                .and_then(Value::as_array)
                .map(|messages| {
                    messages
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
        })
        .unwrap_or_else(|| format!("Midtrans API error - HTTP {}", status));

    Some(VendorError::new(PROVIDER_NAME, message).with_status(status))
}

/// Midtrans payment provider
pub struct MidtransProvider {
    core: ProviderCore<MidtransClients>,
}

impl MidtransProvider {
    /// Create a provider; fails fast when `client_id` or `secret_key` is missing
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            core: ProviderCore::with_required(PROVIDER_NAME, config, REQUIRED_CONFIG)?,
        })
    }

    /// Create a provider around already-built vendor clients
    pub fn with_clients(config: ProviderConfig, clients: MidtransClients) -> Result<Self> {
        Ok(Self {
            core: ProviderCore::with_required(PROVIDER_NAME, config, REQUIRED_CONFIG)?
                .with_client(clients),
        })
    }

    pub async fn snap_client(&self) -> Result<Arc<dyn SnapApi>> {
        Ok(self.get_client().await?.snap.clone())
    }

    pub async fn core_client(&self) -> Result<Arc<dyn CoreApi>> {
        Ok(self.get_client().await?.core.clone())
    }
}

#[async_trait]
impl BaseProvider for MidtransProvider {
    type Client = MidtransClients;

    fn core(&self) -> &ProviderCore<MidtransClients> {
        &self.core
    }

    async fn initialize_client(&self) -> Result<MidtransClients> {
        let config = self.core.config();
        let http = Arc::new(MidtransHttpClient::new(config)?);
        Ok(MidtransClients::new(
            http.clone(),
            http,
            config.environment(),
        ))
    }
}

#[async_trait]
impl PaymentProvider for MidtransProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn config(&self) -> &ProviderConfig {
        self.core.config()
    }

    fn supports(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::PaymentStatus | Capability::Cancellation | Capability::LegacySnap
        )
    }

    async fn client(&self) -> Result<Arc<dyn VendorClient>> {
        let clients: Arc<dyn VendorClient> = self.get_client().await?;
        Ok(clients)
    }

    async fn snap(&self) -> Result<Arc<dyn VendorClient>> {
        self.core
            .log("snap() is deprecated, use client() instead", None);
        self.client().await
    }

    async fn create_payment(&self, data: PaymentData) -> Result<BasePayment> {
        data.validate()?;
        self.core.log(
            "creating snap transaction",
            Some(&json!({ "order_id": data.order_id })),
        );

        let expires_at = data.expires_at(Utc::now())?;

        let snap = self.snap_client().await?;
        let transaction = snap
            .create_transaction(&build_snap_request(&data))
            .await
            .map_err(|e| self.core.handle_error(e, "create_payment"))?;

        let currency = data.currency();
        let mut canonical = json!({
            "orderId": data.order_id,
            "amount": data.amount.to_string(),
            "currency": currency.to_string(),
            "status": "pending",
            "method": "other",
            "description": data
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            "customerEmail": data.customer_email,
            "customerName": data.customer_name,
        });
        if let Some(expires_at) = expires_at {
            canonical["expiresAt"] = json!(expires_at.to_rfc3339());
        }

        let mut metadata = Metadata::new();
        metadata.insert("token".to_string(), json!(transaction.token));
        metadata.insert("redirect_url".to_string(), json!(transaction.redirect_url));

        normalize::standardize_payment_response(PROVIDER_NAME, &canonical, metadata)
    }

    async fn create_virtual_account(&self, data: VirtualAccountData) -> Result<Transaction> {
        data.validate()?;
        self.core.log(
            "creating bank transfer charge",
            Some(&json!({ "order_id": data.order_id, "bank": data.bank_code })),
        );

        let core = self.core_client().await?;
        let result = core
            .charge(&build_charge_request(&data))
            .await
            .map_err(|e| self.core.handle_error(e, "create_virtual_account"))?;

        let metadata = extract_metadata(&result, VA_METADATA_KEYS);
        normalize::standardize_transaction_response(
            PROVIDER_NAME,
            &result,
            TransactionType::Charge,
            metadata,
        )
    }

    async fn get_payment_status(&self, reference_id: &str) -> Result<BasePayment> {
        let reference_id = require_reference(reference_id)?;

        let core = self.core_client().await?;
        let status = core
            .status(reference_id)
            .await
            .map_err(|e| self.core.handle_error(e, "get_payment_status"))?;

        let metadata = extract_metadata(&status, STATUS_METADATA_KEYS);
        normalize::standardize_payment_response(PROVIDER_NAME, &status, metadata)
    }

    async fn cancel_payment(&self, reference_id: &str) -> Result<BasePayment> {
        let reference_id = require_reference(reference_id)?;

        let core = self.core_client().await?;
        let mut result = core
            .cancel(reference_id)
            .await
            .map_err(|e| self.core.handle_error(e, "cancel_payment"))?;

        let metadata = extract_metadata(&result, &["status_message", "cancellation_reason"]);
        let missing_status = normalize::str_field(&result, &["transaction_status"]).is_none();
        if let Some(fields) = result.as_object_mut() {
            if missing_status {
                fields.insert("transaction_status".to_string(), json!("cancel"));
            }
            fields.insert("description".to_string(), json!("Payment cancelled"));
        }

        normalize::standardize_payment_response(PROVIDER_NAME, &result, metadata)
    }

    /// Midtrans notification signature:
    /// SHA512(order_id + status_code + gross_amount + server_key)
    fn generate_signature(&self, payload: &Value) -> Result<String> {
        let field = |key: &str| -> Result<String> {
            match normalize::lookup(payload, key) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Ok(other.to_string()),
                None => Err(AppError::validation(format!(
                    "Midtrans signature requires {}",
                    key
                ))),
            }
        };

        let signature_string = format!(
            "{}{}{}{}",
            field("order_id")?,
            field("status_code")?,
            field("gross_amount")?,
            self.core.config().secret_key.as_deref().unwrap_or_default()
        );

        let mut hasher = Sha512::new();
        hasher.update(signature_string.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

fn require_reference(reference_id: &str) -> Result<&str> {
    let reference_id = reference_id.trim();
    if reference_id.is_empty() {
        return Err(AppError::validation("reference id must not be empty"));
    }
    Ok(reference_id)
}

fn customer_details(email: Option<&str>, name: Option<&str>) -> Option<Value> {
    if email.is_none() && name.is_none() {
        return None;
    }

    let mut details = Map::new();
    if let Some(email) = email {
        details.insert("email".to_string(), json!(email));
    }
    if let Some(name) = name {
        details.insert("first_name".to_string(), json!(name));
    }
    Some(Value::Object(details))
}

/// Snap expiry in whole minutes, rounded up; None when chrono cannot represent it
fn expiry_minutes(seconds: u64) -> Option<u64> {
    Duration::try_seconds(i64::try_from(seconds).ok()?)?;
    Some(seconds.div_ceil(60).max(1))
}

/// Snap `/transactions` request body for a checkout payment
pub fn build_snap_request(data: &PaymentData) -> Value {
    let gross_amount = data.currency().wire_amount(data.amount);

    let mut request = json!({
        "transaction_details": {
            "order_id": data.order_id,
            "gross_amount": gross_amount
        }
    });

    if let Some(customer) =
        customer_details(data.customer_email.as_deref(), data.customer_name.as_deref())
    {
        request["customer_details"] = customer;
    }

    if let Some(description) = &data.description {
        request["item_details"] = json!([{
            "id": data.order_id,
            "price": gross_amount,
            "quantity": 1,
            "name": description
        }]);
    }

    if let Some(minutes) = data.expiry_seconds.and_then(expiry_minutes) {
        request["expiry"] = json!({
            "duration": minutes,
            "unit": "minutes"
        });
    }

    if let Some(url) = &data.success_redirect_url {
        request["callbacks"] = json!({ "finish": url });
    }

    request
}

/// Core API `/v2/charge` request body for a bank virtual account.
/// Mandiri bills go through the `echannel` payment type.
pub fn build_charge_request(data: &VirtualAccountData) -> Value {
    let bank = data.bank_code.trim().to_lowercase();
    let transaction_details = json!({
        "order_id": data.order_id,
        "gross_amount": data.currency().wire_amount(data.amount)
    });

    let mut request = if bank == "mandiri" {
        json!({
            "payment_type": "echannel",
            "transaction_details": transaction_details,
            "echannel": {
                "bill_info1": "Payment for",
                "bill_info2": data.description.as_deref().unwrap_or(&data.order_id)
            }
        })
    } else {
        json!({
            "payment_type": "bank_transfer",
            "transaction_details": transaction_details,
            "bank_transfer": { "bank": bank }
        })
    };

    if let Some(customer) =
        customer_details(data.customer_email.as_deref(), data.customer_name.as_deref())
    {
        request["customer_details"] = customer;
    }

    request
}

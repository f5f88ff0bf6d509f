use super::base_provider::{BaseProvider, ProviderCore};
use super::normalize;
use super::provider_trait::{Capability, PaymentProvider, VendorClient};
use crate::config::{GatewayEnvironment, ProviderConfig};
use crate::core::{AppError, Currency, Result, VendorError};
use crate::modules::payments::{
    BasePayment, Metadata, PaymentData, Transaction, TransactionType, VirtualAccountData,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub const PROVIDER_NAME: &str = "xendit";

const REQUIRED_CONFIG: &[&str] = &["secret_key", "is_production"];
const DEFAULT_DESCRIPTION: &str = "Xendit Snap Payment";
const CANCEL_UNSUPPORTED: &str =
    "Xendit does not support payment cancellation; recreate a new payment for this order";

const API_URL: &str = "https://api.xendit.co";

/// Xendit Invoice API (hosted checkout)
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    async fn create_invoice(&self, request: &Value) -> Result<Value>;
}

/// Xendit Payment Requests API
#[async_trait]
pub trait PaymentRequestApi: Send + Sync {
    async fn create_payment_request(&self, request: &Value) -> Result<Value>;

    async fn get_payment_request(&self, payment_request_id: &str) -> Result<Value>;
}

/// Invoice + Payment Request client pair cached by `XenditProvider`
#[derive(Clone)]
pub struct XenditClients {
    pub invoice: Arc<dyn InvoiceApi>,
    pub payment_request: Arc<dyn PaymentRequestApi>,
    environment: GatewayEnvironment,
}

impl XenditClients {
    pub fn new(
        invoice: Arc<dyn InvoiceApi>,
        payment_request: Arc<dyn PaymentRequestApi>,
        environment: GatewayEnvironment,
    ) -> Self {
        Self {
            invoice,
            payment_request,
            environment,
        }
    }
}

impl fmt::Debug for XenditClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XenditClients")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl VendorClient for XenditClients {
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

/// HTTP client for the Xendit REST API
///
/// Sandbox and production share one host; the secret key decides the mode.
/// API Documentation: https://developers.xendit.co/api-reference/
pub struct XenditHttpClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl XenditHttpClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let secret_key = config
            .secret_key
            .clone()
            .ok_or_else(|| AppError::MissingConfig(vec!["secret_key".to_string()]))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            secret_key,
            base_url: config
                .extra_str("base_url")
                .unwrap_or(API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .basic_auth(&self.secret_key, Some(""))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AppError::gateway(format!(
                        "Xendit gateway unavailable: {} ({})",
                        if e.is_timeout() {
                            "timeout"
                        } else {
                            "connection failed"
                        },
                        e
                    ))
                } else {
                    AppError::gateway(format!("Xendit API request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::gateway(format!("Failed to read Xendit response: {}", e)))?;

        if !status.is_success() {
            return Err(xendit_error(status.as_u16(), &body).into());
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::gateway(format!("Failed to parse Xendit response: {}", e)))
    }
}

#[async_trait]
impl InvoiceApi for XenditHttpClient {
    async fn create_invoice(&self, request: &Value) -> Result<Value> {
        let url = format!("{}/v2/invoices", self.base_url);
        self.execute(self.client.post(&url).json(request)).await
    }
}

#[async_trait]
impl PaymentRequestApi for XenditHttpClient {
    async fn create_payment_request(&self, request: &Value) -> Result<Value> {
        let url = format!("{}/payment_requests", self.base_url);
        self.execute(self.client.post(&url).json(request)).await
    }

    async fn get_payment_request(&self, payment_request_id: &str) -> Result<Value> {
        let url = format!("{}/payment_requests/{}", self.base_url, payment_request_id);
        self.execute(self.client.get(&url)).await
    }
}

/// Xendit error bodies look like `{"error_code": "DATA_NOT_FOUND", "message": "..."}`
fn xendit_error(status: u16, body: &str) -> VendorError {
    let payload: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Xendit API error - HTTP {}: {}", status, body));

    let error = VendorError::new(PROVIDER_NAME, message).with_status(status);
    match payload.get("error_code").and_then(Value::as_str) {
        Some(code) => error.with_code(code),
        None => error,
    }
}

/// Map Xendit's status vocabulary onto the shared status table
fn translate_status(status: &str) -> &str {
    match status.to_uppercase().as_str() {
        "SUCCEEDED" | "SETTLED" | "PAID" => "paid",
        "CANCELED" | "VOIDED" => "cancelled",
        "REQUIRES_ACTION" | "ACCEPTING_PAYMENTS" | "AWAITING_CAPTURE" | "PENDING" => "pending",
        "EXPIRED" => "expired",
        "FAILED" => "failed",
        _ => status,
    }
}

/// Copy of `raw` with its status translated, ready for standardization
fn normalized_view(raw: &Value) -> Value {
    let mut view = raw.clone();
    if let Some(status) = normalize::str_field(raw, &["status"]) {
        let translated = translate_status(status).to_string();
        view["status"] = Value::String(translated);
    }
    view
}

/// Open-amount payment requests come back without an amount
fn fill_missing_amount(view: &mut Value, fallback: Value) {
    if normalize::has_amount(view) {
        return;
    }
    if let Some(fields) = view.as_object_mut() {
        fields.insert("amount".to_string(), fallback);
    }
}

/// Xendit expects amounts as JSON numbers
fn amount_number(currency: Currency, amount: Decimal) -> Value {
    let wire = currency.wire_amount(amount);
    match wire.parse::<serde_json::Number>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::String(wire),
    }
}

/// VA number and payment type reported for a payment request
fn virtual_account_metadata(raw: &Value) -> Metadata {
    let mut metadata = Metadata::new();

    if let Some(number) = normalize::str_field(
        raw,
        &["payment_method.virtual_account.channel_properties.virtual_account_number"],
    ) {
        metadata.insert("va_numbers".to_string(), json!([number]));
    }
    if let Some(payment_type) = normalize::str_field(raw, &["payment_method.type"]) {
        metadata.insert("payment_type".to_string(), json!(payment_type));
    }
    if let Some(channel) = normalize::str_field(raw, &["payment_method.virtual_account.channel_code"])
    {
        metadata.insert("channel_code".to_string(), json!(channel));
    }

    metadata
}

/// Xendit payment provider
pub struct XenditProvider {
    core: ProviderCore<XenditClients>,
}

impl XenditProvider {
    /// Create a provider; fails fast when `secret_key` or `is_production` is missing
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            core: ProviderCore::with_required(PROVIDER_NAME, config, REQUIRED_CONFIG)?,
        })
    }

    pub fn with_clients(config: ProviderConfig, clients: XenditClients) -> Result<Self> {
        Ok(Self {
            core: ProviderCore::with_required(PROVIDER_NAME, config, REQUIRED_CONFIG)?
                .with_client(clients),
        })
    }

    pub async fn invoice_client(&self) -> Result<Arc<dyn InvoiceApi>> {
        Ok(self.get_client().await?.invoice.clone())
    }

    pub async fn payment_request_client(&self) -> Result<Arc<dyn PaymentRequestApi>> {
        Ok(self.get_client().await?.payment_request.clone())
    }
}

#[async_trait]
impl BaseProvider for XenditProvider {
    type Client = XenditClients;

    fn core(&self) -> &ProviderCore<XenditClients> {
        &self.core
    }

    async fn initialize_client(&self) -> Result<XenditClients> {
        let config = self.core.config();
        let http = Arc::new(XenditHttpClient::new(config)?);
        Ok(XenditClients::new(http.clone(), http, config.environment()))
    }
}

#[async_trait]
impl PaymentProvider for XenditProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn config(&self) -> &ProviderConfig {
        self.core.config()
    }

    fn supports(&self, capability: Capability) -> bool {
        matches!(capability, Capability::PaymentStatus)
    }

    async fn client(&self) -> Result<Arc<dyn VendorClient>> {
        let clients: Arc<dyn VendorClient> = self.get_client().await?;
        Ok(clients)
    }

    async fn create_payment(&self, data: PaymentData) -> Result<BasePayment> {
        data.validate()?;
        self.core.log(
            "creating invoice",
            Some(&json!({ "order_id": data.order_id })),
        );

        let invoice_api = self.invoice_client().await?;
        let invoice = invoice_api
            .create_invoice(&build_invoice_request(&data))
            .await
            .map_err(|e| self.core.handle_error(e, "create_payment"))?;

        let description = data
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let canonical = json!({
            "orderId": normalize::str_field(&invoice, &["external_id"]).unwrap_or(&data.order_id),
            "referenceId": normalize::str_field(&invoice, &["id"]),
            "amount": data.amount.to_string(),
            "currency": normalize::str_field(&invoice, &["currency"])
                .map(str::to_string)
                .unwrap_or_else(|| data.currency().to_string()),
            "status": translate_status(normalize::str_field(&invoice, &["status"]).unwrap_or("PENDING")),
            "method": normalize::str_field(&invoice, &["payment_method"]).unwrap_or("other"),
            "description": description,
            "customerEmail": data.customer_email,
            "customerName": data.customer_name,
            "createdAt": normalize::str_field(&invoice, &["created"]),
            "updatedAt": normalize::str_field(&invoice, &["updated"]),
            "expiresAt": normalize::str_field(&invoice, &["expiry_date"]),
        });

        let mut metadata = Metadata::new();
        if let Some(id) = normalize::lookup(&invoice, "id") {
            metadata.insert("token".to_string(), id.clone());
        }
        if let Some(url) = normalize::lookup(&invoice, "invoice_url") {
            metadata.insert("redirect_url".to_string(), url.clone());
        }

        normalize::standardize_payment_response(PROVIDER_NAME, &canonical, metadata)
    }

    async fn create_virtual_account(&self, data: VirtualAccountData) -> Result<Transaction> {
        data.validate()?;
        self.core.log(
            "creating virtual account payment request",
            Some(&json!({ "order_id": data.order_id, "bank": data.bank_code })),
        );

        let api = self.payment_request_client().await?;
        let result = api
            .create_payment_request(&build_payment_request(&data))
            .await
            .map_err(|e| self.core.handle_error(e, "create_virtual_account"))?;

        let mut view = normalized_view(&result);
        fill_missing_amount(&mut view, amount_number(data.currency(), data.amount));

        let mut transaction = normalize::standardize_transaction_response(
            PROVIDER_NAME,
            &view,
            TransactionType::Charge,
            virtual_account_metadata(&result),
        )?;
        transaction.raw_response = result;
        Ok(transaction)
    }

    async fn get_payment_status(&self, reference_id: &str) -> Result<BasePayment> {
        let reference_id = reference_id.trim();
        if reference_id.is_empty() {
            return Err(AppError::validation("reference id must not be empty"));
        }

        let api = self.payment_request_client().await?;
        let result = api
            .get_payment_request(reference_id)
            .await
            .map_err(|e| self.core.handle_error(e, "get_payment_status"))?;

        let mut metadata = virtual_account_metadata(&result);
        if let Some(status) = normalize::lookup(&result, "status") {
            metadata.insert("vendor_status".to_string(), status.clone());
        }

        let mut view = normalized_view(&result);
        fill_missing_amount(&mut view, json!(0));

        normalize::standardize_payment_response(PROVIDER_NAME, &view, metadata)
    }

    async fn cancel_payment(&self, _reference_id: &str) -> Result<BasePayment> {
        Err(AppError::unsupported(CANCEL_UNSUPPORTED))
    }
}

/// `POST /v2/invoices` request body
pub fn build_invoice_request(data: &PaymentData) -> Value {
    let currency = data.currency();

    let mut request = json!({
        "external_id": data.order_id,
        "amount": amount_number(currency, data.amount),
        "description": data.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION),
        "currency": currency.to_string(),
    });

    if let Some(email) = &data.customer_email {
        request["payer_email"] = json!(email);
    }

    if data.customer_email.is_some() || data.customer_name.is_some() {
        let mut customer = Map::new();
        if let Some(name) = &data.customer_name {
            customer.insert("given_names".to_string(), json!(name));
        }
        if let Some(email) = &data.customer_email {
            customer.insert("email".to_string(), json!(email));
        }
        request["customer"] = Value::Object(customer);
    }

    if let Some(seconds) = data.expiry_seconds {
        request["invoice_duration"] = json!(seconds);
    }
    if let Some(url) = &data.success_redirect_url {
        request["success_redirect_url"] = json!(url);
    }
    if let Some(url) = &data.failure_redirect_url {
        request["failure_redirect_url"] = json!(url);
    }

    request
}

/// `POST /payment_requests` body for a virtual account.
/// The amount is only pinned for fixed-amount accounts.
pub fn build_payment_request(data: &VirtualAccountData) -> Value {
    let currency = data.currency();
    let reusability = if data.is_reusable {
        "MULTIPLE_USE"
    } else {
        "ONE_TIME_USE"
    };

    let mut request = json!({
        "reference_id": data.order_id,
        "currency": currency.to_string(),
        "payment_method": {
            "type": "VIRTUAL_ACCOUNT",
            "reusability": reusability,
            "reference_id": data.order_id,
            "virtual_account": {
                "channel_code": data.bank_code.trim().to_uppercase(),
                "channel_properties": {
                    "customer_name": data.customer_name.as_deref().unwrap_or(&data.order_id)
                }
            }
        }
    });

    if data.is_fixed_amount {
        request["amount"] = amount_number(currency, data.amount);
    }
    if let Some(description) = &data.description {
        request["description"] = json!(description);
    }
    if let Some(email) = &data.customer_email {
        request["metadata"] = json!({ "customer_email": email });
    }

    request
}

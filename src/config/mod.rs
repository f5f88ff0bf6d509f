use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

pub mod environment;

pub use environment::GatewayEnvironment;

/// Credentials and flags for one payment provider instance
///
/// Well-known keys are typed; anything provider-specific (`base_url`,
/// `timeout_secs`, ...) lives in `extra`. Deserializes from a flat JSON
/// object, so `{"secret_key": "...", "base_url": "..."}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_production: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_logging: Option<bool>,

    /// Provider-specific extension keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    pub fn with_production(mut self, is_production: bool) -> Self {
        self.is_production = Some(is_production);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Presence check used by required-field validation.
    /// `None` and JSON `null` are absent; empty strings are present.
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            "client_id" => self.client_id.is_some(),
            "secret_key" => self.secret_key.is_some(),
            "public_key" => self.public_key.is_some(),
            "is_production" => self.is_production.is_some(),
            "debug" => self.debug.is_some(),
            "enable_logging" => self.enable_logging.is_some(),
            other => self.extra.get(other).is_some_and(|v| !v.is_null()),
        }
    }

    /// Every field from `required` that is absent, in the order given
    pub fn missing_fields(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|field| !self.has_field(field))
            .map(|field| field.to_string())
            .collect()
    }

    /// Fail with `MissingConfig` listing all absent required fields
    pub fn require(&self, required: &[&str]) -> Result<()> {
        let missing = self.missing_fields(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingConfig(missing))
        }
    }

    /// Layer this config over `defaults`; values set here win on collision
    pub fn merged_over(self, defaults: &ProviderConfig) -> ProviderConfig {
        let mut extra = defaults.extra.clone();
        extra.extend(self.extra);

        ProviderConfig {
            client_id: self.client_id.or_else(|| defaults.client_id.clone()),
            secret_key: self.secret_key.or_else(|| defaults.secret_key.clone()),
            public_key: self.public_key.or_else(|| defaults.public_key.clone()),
            is_production: self.is_production.or(defaults.is_production),
            debug: self.debug.or(defaults.debug),
            enable_logging: self.enable_logging.or(defaults.enable_logging),
            extra,
        }
    }

    pub fn environment(&self) -> GatewayEnvironment {
        GatewayEnvironment::from_flag(self.is_production.unwrap_or(false))
    }

    pub fn logging_enabled(&self) -> bool {
        self.debug == Some(true) || self.enable_logging == Some(true)
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Request timeout handed to the vendor HTTP client (`timeout_secs`)
    pub fn timeout(&self) -> Option<Duration> {
        self.extra
            .get("timeout_secs")
            .and_then(Value::as_u64)
            .map(Duration::from_secs)
    }

    /// Load a provider config from `{PREFIX}_*` environment variables
    ///
    /// Reads `.env` if present. Only variables that are set end up in the
    /// config; required-field validation happens when the provider is built.
    pub fn from_env(prefix: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let prefix = prefix.to_uppercase();
        let var = |key: &str| env::var(format!("{}_{}", prefix, key)).ok();
        let flag = |key: &str| -> Result<Option<bool>> {
            var(key)
                .map(|raw| {
                    raw.trim().to_lowercase().parse::<bool>().map_err(|_| {
                        AppError::configuration(format!("Invalid {}_{}: {}", prefix, key, raw))
                    })
                })
                .transpose()
        };

        let mut config = ProviderConfig {
            client_id: var("CLIENT_ID"),
            secret_key: var("SECRET_KEY"),
            public_key: var("PUBLIC_KEY"),
            is_production: flag("IS_PRODUCTION")?,
            debug: flag("DEBUG")?,
            enable_logging: flag("ENABLE_LOGGING")?,
            extra: BTreeMap::new(),
        };

        if let Some(base_url) = var("BASE_URL") {
            config.extra.insert("base_url".to_string(), Value::String(base_url));
        }

        if let Some(raw) = var("TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::configuration(format!("Invalid {}_TIMEOUT_SECS: {}", prefix, raw))
            })?;
            config.extra.insert("timeout_secs".to_string(), Value::from(secs));
        }

        Ok(config)
    }
}

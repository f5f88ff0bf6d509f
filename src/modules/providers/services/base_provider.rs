use crate::config::ProviderConfig;
use crate::core::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// State shared by every provider: its config and the lazily created vendor client
///
/// The client cell is single-flight: concurrent first callers wait on one
/// `initialize_client` call instead of racing to build two clients. A failed
/// initialization leaves the cell empty so the next call tries again.
pub struct ProviderCore<C> {
    name: &'static str,
    config: ProviderConfig,
    client: OnceCell<Arc<C>>,
}

impl<C> ProviderCore<C> {
    pub fn new(name: &'static str, config: ProviderConfig) -> Self {
        Self {
            name,
            config,
            client: OnceCell::new(),
        }
    }

    /// Build the core after checking that every `required` config field is present
    pub fn with_required(
        name: &'static str,
        config: ProviderConfig,
        required: &[&str],
    ) -> Result<Self> {
        config.require(required)?;
        Ok(Self::new(name, config))
    }

    /// Seed the client cell, skipping `initialize_client` entirely
    pub fn with_client(mut self, client: C) -> Self {
        self.client = OnceCell::new_with(Some(Arc::new(client)));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn validate_config(&self, required: &[&str]) -> Result<()> {
        self.config.require(required)
    }

    pub fn is_client_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Debug log tagged with the provider name.
    /// Silent unless the config sets `debug` or `enable_logging`.
    pub fn log(&self, message: &str, context: Option<&Value>) {
        if !self.config.logging_enabled() {
            return;
        }

        match context {
            Some(context) => debug!(provider = self.name, context = %context, "{}", message),
            None => debug!(provider = self.name, "{}", message),
        }
    }

    /// Attribute a failed vendor call to `operation`.
    ///
    /// Vendor response errors become `AppError::Provider`; transport and
    /// validation errors are handed back unchanged. The caller propagates
    /// the returned error.
    #[must_use]
    pub fn handle_error(&self, error: AppError, operation: &str) -> AppError {
        self.log(
            &format!("{} failed", operation),
            Some(&json!({ "operation": operation, "error": error.to_string() })),
        );

        match error {
            AppError::Vendor(source) => AppError::Provider {
                operation: operation.to_string(),
                source,
            },
            other => other,
        }
    }
}

/// Base behavior for adapters: lazy vendor client acquisition
#[async_trait]
pub trait BaseProvider: Send + Sync {
    /// Vendor client bundle built by `initialize_client`
    type Client: Send + Sync + 'static;

    fn core(&self) -> &ProviderCore<Self::Client>;

    /// Build the vendor client bundle. Adapters must override this.
    async fn initialize_client(&self) -> Result<Self::Client> {
        Err(AppError::NotImplemented(
            "initialize_client() must be implemented by provider".to_string(),
        ))
    }

    /// Cached client, initialized on first use
    async fn get_client(&self) -> Result<Arc<Self::Client>> {
        let core = self.core();
        core.client
            .get_or_try_init(|| async move {
                core.log("initializing vendor client", None);
                self.initialize_client().await.map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }
}

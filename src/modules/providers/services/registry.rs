use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::midtrans::{self, MidtransProvider};
use super::provider_trait::PaymentProvider;
use super::xendit::{self, XenditProvider};
use crate::config::ProviderConfig;
use crate::core::{AppError, Result};

/// Builds a provider from its final (defaults-merged) config
pub type ProviderConstructor =
    Arc<dyn Fn(ProviderConfig) -> Result<Arc<dyn PaymentProvider>> + Send + Sync>;

#[derive(Clone)]
struct Registration {
    constructor: ProviderConstructor,
    default_config: ProviderConfig,
}

/// Maps provider type identifiers ("midtrans", "xendit", ...) to constructors
///
/// Owned by the caller; wrap it in a lock if it must be shared and mutated.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Registration>,
}

impl ProviderRegistry {
    /// Registry with the built-in Midtrans and Xendit providers
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(
            midtrans::PROVIDER_NAME,
            |config| Ok(Arc::new(MidtransProvider::new(config)?) as Arc<dyn PaymentProvider>),
            ProviderConfig::default(),
        );
        registry.register(
            xendit::PROVIDER_NAME,
            |config| Ok(Arc::new(XenditProvider::new(config)?) as Arc<dyn PaymentProvider>),
            ProviderConfig::default(),
        );

        registry
    }

    /// Registry with nothing registered
    pub fn empty() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    /// Register (or replace) a provider type
    pub fn register<F>(
        &mut self,
        provider_type: impl Into<String>,
        constructor: F,
        default_config: ProviderConfig,
    ) where
        F: Fn(ProviderConfig) -> Result<Arc<dyn PaymentProvider>> + Send + Sync + 'static,
    {
        let provider_type = provider_type.into();
        debug!(provider = %provider_type, "Registering provider type");

        self.providers.insert(
            provider_type,
            Registration {
                constructor: Arc::new(constructor),
                default_config,
            },
        );
    }

    /// Build a provider; `config` wins over the registered defaults on collision
    pub fn create(
        &self,
        provider_type: &str,
        config: ProviderConfig,
    ) -> Result<Arc<dyn PaymentProvider>> {
        let registration =
            self.providers
                .get(provider_type)
                .ok_or_else(|| AppError::UnknownProvider {
                    requested: provider_type.to_string(),
                    available: self.registered_providers(),
                })?;

        let config = config.merged_over(&registration.default_config);
        let provider = (registration.constructor)(config)?;

        info!(
            provider = %provider_type,
            environment = %provider.config().environment(),
            "Provider created"
        );

        Ok(provider)
    }

    /// Registered provider types, sorted
    pub fn registered_providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn is_registered(&self, provider_type: &str) -> bool {
        self.providers.contains_key(provider_type)
    }

    /// Remove a provider type; true if it was registered
    pub fn unregister(&mut self, provider_type: &str) -> bool {
        self.providers.remove(provider_type).is_some()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.registered_providers())
            .finish()
    }
}

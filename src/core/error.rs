/// Library-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reported by a vendor API in its own response body
///
/// Produced by the vendor HTTP clients when the gateway answers with an
/// error status. The base provider recognizes this shape and wraps it with
/// operation context.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct VendorError {
    /// Vendor tag, e.g. "midtrans"
    pub vendor: String,

    /// HTTP or body-level status code reported by the vendor
    pub status: Option<u16>,

    /// Vendor error code (Xendit `error_code`), if any
    pub code: Option<String>,

    /// Human readable message from the vendor
    pub message: String,
}

impl VendorError {
    pub fn new(vendor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Whether the vendor reported the referenced resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
            || self
                .code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case("DATA_NOT_FOUND"))
    }
}

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Required provider configuration fields are absent
    #[error("Missing required config fields: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    /// A provider hook was not overridden
    #[error("{0}")]
    NotImplemented(String),

    /// Vendor call failed with a vendor-specific error, wrapped with context
    #[error("Provider error in {operation}: {source}")]
    Provider {
        operation: String,
        #[source]
        source: VendorError,
    },

    /// Vendor-specific error before it has been attributed to an operation
    #[error("{0}")]
    Vendor(VendorError),

    /// Registry asked for a provider type that was never registered
    #[error(
        "Provider type '{requested}' is not registered. Available providers: {}",
        .available.join(", ")
    )]
    UnknownProvider {
        requested: String,
        available: Vec<String>,
    },

    /// Facade used before a provider was set
    #[error("No payment provider configured; call set_provider before using this method")]
    NoProviderConfigured,

    /// Capability missing on the active provider or structurally absent at the vendor
    #[error("{0}")]
    UnsupportedOperation(String),

    /// Validation errors for inputs and vendor payloads
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Vendor transport errors (connection, timeout, unreadable body)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        AppError::Gateway(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        AppError::UnsupportedOperation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    /// True when the error carries a vendor response error, wrapped or not
    pub fn is_vendor_specific(&self) -> bool {
        matches!(self, AppError::Vendor(_) | AppError::Provider { .. })
    }
}

impl From<VendorError> for AppError {
    fn from(err: VendorError) -> Self {
        AppError::Vendor(err)
    }
}

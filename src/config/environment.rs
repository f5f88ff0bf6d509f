use serde::{Deserialize, Serialize};

/// Sandbox or production mode of a gateway account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn from_flag(is_production: bool) -> Self {
        if is_production {
            GatewayEnvironment::Production
        } else {
            GatewayEnvironment::Sandbox
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, GatewayEnvironment::Production)
    }
}

impl std::fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayEnvironment::Sandbox => write!(f, "sandbox"),
            GatewayEnvironment::Production => write!(f, "production"),
        }
    }
}

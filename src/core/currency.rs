use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies accepted by the supported gateways, with their decimal precision rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indonesian Rupiah (no decimal places)
    #[default]
    IDR,
    /// US Dollar (2 decimal places)
    USD,
    /// Malaysian Ringgit (2 decimal places)
    MYR,
    /// Philippine Peso (2 decimal places)
    PHP,
    /// Thai Baht (2 decimal places)
    THB,
    /// Singapore Dollar (2 decimal places)
    SGD,
    /// Vietnamese Dong (no decimal places)
    VND,
}

impl Currency {
    /// Returns the decimal scale for this currency
    /// - IDR/VND: 0 (no decimals)
    /// - everything else: 2
    pub fn scale(&self) -> u32 {
        match self {
            Currency::IDR | Currency::VND => 0,
            _ => 2,
        }
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }

    /// Validates that an amount is non-negative and fits the currency scale
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), String> {
        if amount < Decimal::ZERO {
            return Err(format!("{} amount cannot be negative", self));
        }

        let scale = amount.normalize().scale();
        let expected_scale = self.scale();
        if scale > expected_scale {
            return Err(format!(
                "{} amounts must have at most {} decimal places, got {}",
                self, expected_scale, scale
            ));
        }

        Ok(())
    }

    /// Formats an amount the way gateway APIs expect it on the wire
    pub fn wire_amount(&self, amount: Decimal) -> String {
        self.round(amount).normalize().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::IDR => "IDR",
            Currency::USD => "USD",
            Currency::MYR => "MYR",
            Currency::PHP => "PHP",
            Currency::THB => "THB",
            Currency::SGD => "SGD",
            Currency::VND => "VND",
        };
        f.write_str(code)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IDR" => Ok(Currency::IDR),
            "USD" => Ok(Currency::USD),
            "MYR" => Ok(Currency::MYR),
            "PHP" => Ok(Currency::PHP),
            "THB" => Ok(Currency::THB),
            "SGD" => Ok(Currency::SGD),
            "VND" => Ok(Currency::VND),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl TryFrom<&str> for Currency {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

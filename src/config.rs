use alloy_primitives::Address;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_NODE_URL: &str = "https://testnet.vechain.org";
pub const DEFAULT_EXPLORER_URL: &str = "https://explore-testnet.vechain.org";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_TX_EXPIRATION: u32 = 720;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid address: {value}")]
    InvalidAddress { name: &'static str, value: String },

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub node_url: String,
    pub contract_address: Option<Address>,
    pub private_key: Option<String>,
    pub cors_origin: String,
    pub prepaid_private_key: Option<String>,
    pub prepaid_address: Option<Address>,
    pub port: u16,
    pub explorer_url: String,
    pub tx_expiration: u32,
    pub gas_price_coef: u8,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name-to-value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            node_url: get("NODE_URL").unwrap_or_else(|| DEFAULT_NODE_URL.to_string()),
            contract_address: parse_address("CONTRACT_ADDRESS", get("CONTRACT_ADDRESS"))?,
            private_key: get("PRIVATE_KEY"),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            prepaid_private_key: get("PREPAID_PK"),
            prepaid_address: parse_address("PREPAID_ADDRESS", get("PREPAID_ADDRESS"))?,
            port: parse_number("PORT", get("PORT"), DEFAULT_PORT)?,
            explorer_url: get("EXPLORER_URL").unwrap_or_else(|| DEFAULT_EXPLORER_URL.to_string()),
            tx_expiration: parse_number("TX_EXPIRATION", get("TX_EXPIRATION"), DEFAULT_TX_EXPIRATION)?,
            gas_price_coef: parse_number("GAS_PRICE_COEF", get("GAS_PRICE_COEF"), 0)?,
        })
    }

    /// Settings that are allowed to be missing but disable some endpoints.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.contract_address.is_none() {
            warnings.push("CONTRACT_ADDRESS missing: registry endpoints disabled, notarization uses data-embed");
        }
        if self.private_key.is_none() {
            warnings.push("PRIVATE_KEY missing: registry endpoints cannot sign");
        }
        if self.prepaid_private_key.is_none() && self.private_key.is_none() {
            warnings.push("PREPAID_PK missing: prepaid notarization has no signer");
        }
        warnings
    }
}

fn parse_address(name: &'static str, value: Option<String>) -> Result<Option<Address>, ConfigError> {
    value
        .map(|v| {
            Address::from_str(&v).map_err(|_| ConfigError::InvalidAddress { name, value: v })
        })
        .transpose()
}

fn parse_number<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidNumber { name, value: v }),
        None => Ok(default),
    }
}

fn redacted(secret: &Option<String>) -> &'static str {
    if secret.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("node_url", &self.node_url)
            .field("contract_address", &self.contract_address)
            .field("private_key", &redacted(&self.private_key))
            .field("cors_origin", &self.cors_origin)
            .field("prepaid_private_key", &redacted(&self.prepaid_private_key))
            .field("prepaid_address", &self.prepaid_address)
            .field("port", &self.port)
            .field("explorer_url", &self.explorer_url)
            .field("tx_expiration", &self.tx_expiration)
            .field("gas_price_coef", &self.gas_price_coef)
            .finish()
    }
}

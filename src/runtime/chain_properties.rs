use crate::constants::{DEFAULT_SS58_FORMAT, DEFAULT_TOKEN_DECIMALS, DEFAULT_TOKEN_SYMBOL};
use serde::Deserialize;
use serde_json::Value;

/// Chain properties advertised by `system_properties`.
///
/// Multi-token chains report symbols and decimals as arrays; the first entry
/// is taken as the native token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainProperties {
    pub ss58_format: Option<u16>,
    pub token_symbol: Option<String>,
    pub token_decimals: Option<u8>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn first(self) -> Option<T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.into_iter().next(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperties {
    #[serde(default, alias = "SS58Prefix")]
    ss58_format: Option<u16>,
    #[serde(default)]
    token_symbol: Option<OneOrMany<String>>,
    #[serde(default)]
    token_decimals: Option<OneOrMany<u8>>,
}

impl ChainProperties {
    /// Parses the `system_properties` result. A `null` result yields empty
    /// properties.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }

        let raw: RawProperties = serde_json::from_value(value)?;

        Ok(Self {
            ss58_format: raw.ss58_format,
            token_symbol: raw.token_symbol.and_then(OneOrMany::first),
            token_decimals: raw.token_decimals.and_then(OneOrMany::first),
        })
    }

    pub fn ss58_format_or_default(&self) -> u16 {
        self.ss58_format.unwrap_or(DEFAULT_SS58_FORMAT)
    }

    pub fn token_symbol_or_default(&self) -> String {
        self.token_symbol
            .clone()
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string())
    }

    pub fn token_decimals_or_default(&self) -> u8 {
        self.token_decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }
}

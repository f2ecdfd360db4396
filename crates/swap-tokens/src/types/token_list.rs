use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A token list as published per the Uniswap token-list schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenList {
    pub name: String,

    /// ISO 8601 timestamp, empty for lists built in-process.
    pub timestamp: String,

    pub version: Version,

    pub tokens: Vec<TokenInfo>,

    #[serde(rename = "logoURI")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Tag identifier → tag definition.
    #[serde(default)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, TagDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    #[serde(deserialize_with = "integral")]
    pub major: u64,
    #[serde(deserialize_with = "integral")]
    pub minor: u64,
    #[serde(deserialize_with = "integral")]
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A single token entry of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(rename = "chainId")]
    #[serde(deserialize_with = "integral")]
    pub chain_id: u64,

    pub address: String,

    pub name: String,

    #[serde(deserialize_with = "integral")]
    pub decimals: u8,

    pub symbol: String,

    #[serde(rename = "logoURI")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub name: String,
    pub description: String,
}

/// JSON numbers with no fractional part are integers, so `6.0` reads as `6`.
fn integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let value = number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, got {number}")))?;
    T::try_from(value).map_err(|_| D::Error::custom(format!("integer {value} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_json(decimals: serde_json::Value) -> serde_json::Value {
        json!({
            "chainId": 1.0,
            "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "name": "USD Coin",
            "decimals": decimals,
            "symbol": "USDC"
        })
    }

    #[test]
    fn test_integral_floats_deserialize() {
        let token: TokenInfo = serde_json::from_value(token_json(json!(6.0))).unwrap();
        assert_eq!(token.chain_id, 1);
        assert_eq!(token.decimals, 6);

        let version: Version =
            serde_json::from_value(json!({ "major": 2.0, "minor": 1, "patch": 0.0 })).unwrap();
        assert_eq!(version, Version::new(2, 1, 0));
    }

    #[test]
    fn test_non_integral_numbers_rejected() {
        assert!(serde_json::from_value::<TokenInfo>(token_json(json!(6.5))).is_err());
        assert!(serde_json::from_value::<TokenInfo>(token_json(json!(-1))).is_err());
        assert!(serde_json::from_value::<TokenInfo>(token_json(json!(256))).is_err());
    }
}

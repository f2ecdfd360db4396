use serde::{Deserialize, Serialize};

/// A token record as returned by the Hive-Engine `tokens` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTokenRecord {
    #[serde(rename = "_id")]
    pub id: u64,

    pub symbol: String,

    pub name: String,

    pub precision: u8,

    pub supply: String,

    #[serde(rename = "circulatingSupply")]
    pub circulating_supply: String,

    #[serde(rename = "maxSupply")]
    pub max_supply: String,

    /// JSON-encoded `{desc, icon, url}` object.
    pub metadata: String,
}

/// A registry token with its metadata parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiveToken {
    pub id: u64,
    pub symbol: String,
    pub name: String,
    pub precision: u8,
    pub supply: String,
    pub circulating_supply: String,
    pub max_supply: String,
    pub metadata: HiveTokenMetadata,
    pub is_crypto: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiveTokenMetadata {
    #[serde(default)]
    pub desc: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

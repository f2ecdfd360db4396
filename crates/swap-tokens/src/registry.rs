//! The internal Hive-Engine token registry.
//!
//! Registry tokens are not EVM contracts. Each one gets a synthetic
//! placeholder address so it fits the token list shape; a handful of
//! well-known symbols use fixed addresses instead so they stay stable across
//! loads.

use std::collections::BTreeSet;

use rand::Rng;
use serde_json::{json, Value};

use crate::config::Config;
use crate::currency::NATIVE_SYMBOL;
use crate::error::Error;
use crate::source::{FindQuery, SortIndex, TokenIndex};
use crate::types::hive::{HiveToken, HiveTokenMetadata, RemoteTokenRecord};
use crate::types::token_list::{TokenInfo, TokenList, Version};
use crate::wrapped::{wrapped_native_address, MAINNET};

/// List reference that selects the internal registry instead of a URL.
pub const INTERNAL_LIST: &str = "hive-engine.list";

pub const INTERNAL_LIST_NAME: &str = "Hive-Engine Tokens";

/// Page size used when loading the whole registry.
pub const REGISTRY_PAGE_SIZE: u32 = 1000;

/// Fixed addresses for well-known symbols.
const CANONICAL_ADDRESSES: [(&str, &str); 5] = [
    ("PAL", "0x4d9f6e0f7bd5b8fcb2f56f1b0b9a2f8e1c3a5d71"),
    ("LEO", "0x9a3c1e2f4b5d6a7e8f901b2c3d4e5f6a7b8c9d0e"),
    ("BEE", "0x1b2e3d4c5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c"),
    ("WORKERBEE", "0x7e6d5c4b3a29180f7e6d5c4b3a29180f7e6d5c4b"),
    ("DEC", "0x2c4e6a8b0d1f3e5a7c9b1d3f5e7a9c0b2d4f6e8a"),
];

/// Fixed address for `symbol`, if it has one. `SWAP.HIVE` resolves to the
/// mainnet wrapped-native token so that it unwraps to the native currency.
pub fn canonical_address(symbol: &str) -> Option<&'static str> {
    if symbol == NATIVE_SYMBOL {
        return wrapped_native_address(MAINNET);
    }
    CANONICAL_ADDRESSES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, address)| *address)
}

/// A random `0x`-prefixed 20-byte address. Synthetic, never an on-chain contract.
pub fn placeholder_address() -> String {
    let bytes: [u8; 20] = rand::thread_rng().gen();
    format!("0x{}", hex::encode(bytes))
}

/// Load registry tokens, optionally restricted to `symbols`, skipping disabled ones.
pub async fn load_tokens(
    index: &dyn TokenIndex,
    config: &Config,
    symbols: &BTreeSet<String>,
    limit: u32,
    offset: u32,
) -> Result<Vec<HiveToken>, Error> {
    let query = if symbols.is_empty() {
        json!({})
    } else {
        json!({ "symbol": { "$in": symbols } })
    };

    let find = FindQuery {
        contract: "tokens".to_string(),
        table: "tokens".to_string(),
        query,
        limit,
        offset,
        indexes: vec![SortIndex {
            index: "symbol".to_string(),
            descending: false,
        }],
    };

    let records = index
        .find(&find)
        .await
        .map_err(Error::TokenIndexQueryFailed)?;

    records
        .iter()
        .filter(|record| {
            let disabled = config.is_disabled(&record.symbol);
            if disabled {
                tracing::debug!(symbol = %record.symbol, "skipping disabled token");
            }
            !disabled
        })
        .map(map_token_record)
        .collect()
}

/// Convert a raw index record, parsing its JSON metadata.
pub fn map_token_record(record: &RemoteTokenRecord) -> Result<HiveToken, Error> {
    Ok(HiveToken {
        id: record.id,
        symbol: record.symbol.clone(),
        name: record.name.clone(),
        precision: record.precision,
        supply: record.supply.clone(),
        circulating_supply: record.circulating_supply.clone(),
        max_supply: record.max_supply.clone(),
        metadata: map_metadata(&record.symbol, &record.metadata)?,
        is_crypto: false,
    })
}

/// Parse a metadata string. Fields that are missing or not strings are left empty.
pub fn map_metadata(symbol: &str, metadata: &str) -> Result<HiveTokenMetadata, Error> {
    let parsed: Value =
        serde_json::from_str(metadata).map_err(|source| Error::MetadataParseError {
            symbol: symbol.to_string(),
            source,
        })?;

    let field = |key: &str| parsed.get(key).and_then(Value::as_str).map(str::to_string);
    Ok(HiveTokenMetadata {
        desc: field("desc"),
        icon: field("icon"),
        url: field("url"),
    })
}

/// Convert a registry token into a token list entry.
pub fn to_token_info(token: &HiveToken) -> TokenInfo {
    let address = canonical_address(&token.symbol)
        .map(str::to_string)
        .unwrap_or_else(placeholder_address);

    TokenInfo {
        chain_id: MAINNET,
        address,
        name: token.name.clone(),
        decimals: token.precision,
        symbol: token.symbol.clone(),
        logo_uri: token.metadata.icon.clone(),
        tags: Vec::new(),
        extensions: None,
    }
}

/// Build the token list for the whole internal registry.
pub async fn internal_token_list(index: &dyn TokenIndex, config: &Config) -> Result<TokenList, Error> {
    let tokens = load_tokens(index, config, &BTreeSet::new(), REGISTRY_PAGE_SIZE, 0).await?;
    tracing::info!(count = tokens.len(), "loaded internal token registry");

    Ok(TokenList {
        name: INTERNAL_LIST_NAME.to_string(),
        timestamp: String::new(),
        version: Version::new(1, 0, 0),
        tokens: tokens.iter().map(to_token_info).collect(),
        logo_uri: None,
        keywords: Vec::new(),
        tags: Default::default(),
    })
}

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::Error;

/// Comma-separated symbols hidden from the internal registry.
pub const DISABLED_TOKENS_VAR: &str = "HE_DISABLED_TOKENS";
/// Per-URL token list fetch timeout in whole seconds.
pub const FETCH_TIMEOUT_VAR: &str = "TOKEN_LIST_FETCH_TIMEOUT_SECS";
/// Endpoint of the Hive-Engine contracts RPC.
pub const TOKEN_INDEX_URL_VAR: &str = "HE_RPC_URL";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TOKEN_INDEX_URL: &str = "https://api.hive-engine.com/rpc/contracts";

/// Process configuration. Read once at startup and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub disabled_tokens: BTreeSet<String>,
    pub fetch_timeout: Duration,
    pub token_index_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disabled_tokens: BTreeSet::new(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            token_index_url: DEFAULT_TOKEN_INDEX_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DISABLED_TOKENS_VAR) {
            config.disabled_tokens = parse_symbol_set(&raw);
        }

        if let Some(raw) = lookup(FETCH_TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "{FETCH_TIMEOUT_VAR} must be a positive number of seconds, got '{raw}'"
                    ))
                })?;
            config.fetch_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(TOKEN_INDEX_URL_VAR) {
            let url = raw.trim();
            url::Url::parse(url)
                .map_err(|e| Error::Config(format!("{TOKEN_INDEX_URL_VAR} is not a URL: {e}")))?;
            config.token_index_url = url.to_string();
        }

        Ok(config)
    }

    pub fn is_disabled(&self, symbol: &str) -> bool {
        self.disabled_tokens.contains(symbol)
    }
}

/// Split a comma-separated list into a set of trimmed, non-empty symbols.
pub fn parse_symbol_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(config.disabled_tokens.is_empty());
    }

    #[test]
    fn test_disabled_tokens() {
        let config =
            Config::from_lookup(lookup(&[(DISABLED_TOKENS_VAR, " XYZ,BAD ,, ABC,XYZ")])).unwrap();
        let expected: BTreeSet<String> = ["ABC", "BAD", "XYZ"].map(String::from).into();
        assert_eq!(config.disabled_tokens, expected);
        assert!(config.is_disabled("XYZ"));
        assert!(!config.is_disabled("xyz"));
    }

    #[test]
    fn test_timeout_and_url() {
        let config = Config::from_lookup(lookup(&[
            (FETCH_TIMEOUT_VAR, "3"),
            (TOKEN_INDEX_URL_VAR, "https://engine.rishipanthee.com/contracts"),
        ]))
        .unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.token_index_url, "https://engine.rishipanthee.com/contracts");
    }

    #[test]
    fn test_invalid_values() {
        for bad in ["0", "-1", "soon"] {
            let result = Config::from_lookup(lookup(&[(FETCH_TIMEOUT_VAR, bad)]));
            assert!(matches!(result, Err(Error::Config(_))), "{bad} accepted");
        }
        let result = Config::from_lookup(lookup(&[(TOKEN_INDEX_URL_VAR, "not a url")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

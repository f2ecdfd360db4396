pub mod config;
pub mod contenthash;
pub mod currency;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod source;
pub mod types;
pub mod uri;
pub mod wrapped;

// Re-exports for convenience
pub use config::Config;
pub use currency::{currency_id, Currency, Token};
pub use error::Error;
pub use resolver::TokenListResolver;
pub use source::{EnsResolver, ListFetcher, TokenIndex};
pub use types::token_list::{TokenInfo, TokenList, Version};
pub use wrapped::{unwrap, wrap, wrap_amount, CurrencyAmount, TokenAmount};

use std::sync::Arc;

/// High-level convenience: resolve a list reference with a one-off resolver.
pub async fn get_token_list(
    list_url: &str,
    ens: &dyn EnsResolver,
    fetcher: Arc<dyn ListFetcher>,
    index: Arc<dyn TokenIndex>,
    config: Arc<Config>,
) -> Result<TokenList, Error> {
    TokenListResolver::new(fetcher, index, config)
        .resolve(list_url, ens)
        .await
}

/// Resolver backed by HTTP fetching and the Hive-Engine API, configured from `config`.
#[cfg(feature = "http")]
pub fn http_resolver(config: Config) -> Result<TokenListResolver, Error> {
    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout)
        .build()
        .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
    let index = http::HiveEngineClient::from_config(client.clone(), &config);
    Ok(TokenListResolver::new(
        Arc::new(http::HttpFetcher::new(client)),
        Arc::new(index),
        Arc::new(config),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{StaticEnsResolver, StaticFetcher, StaticTokenIndex};

    #[tokio::test]
    async fn test_get_token_list_unrecognized() {
        let result = get_token_list(
            "gopher://example.com",
            &StaticEnsResolver::new(),
            Arc::new(StaticFetcher::new()),
            Arc::new(StaticTokenIndex::default()),
            Arc::new(Config::default()),
        )
        .await;
        assert!(matches!(result, Err(Error::UnrecognizedListProtocol(_))));
    }

    #[test]
    fn test_list_tokens_to_currencies() {
        let json = r#"{
            "name": "Swap",
            "timestamp": "2021-01-01T00:00:00Z",
            "version": { "major": 1, "minor": 0, "patch": 0 },
            "tokens": [
                {
                    "chainId": 1,
                    "address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                    "symbol": "WETH",
                    "name": "Wrapped Ether",
                    "decimals": 18
                }
            ]
        }"#;
        let list: TokenList = serde_json::from_str(json).unwrap();
        let token = Token::try_from(&list.tokens[0]).unwrap();

        // the wrapped-native entry of a list is presented as the native currency
        let currency = unwrap(&token);
        assert_eq!(currency, Currency::Native);
        assert_eq!(currency_id(&currency), "SWAP.HIVE");
        assert_eq!(wrap(Some(&currency), Some(1)), Some(token));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_resolver_builds() {
        assert!(http_resolver(Config::default()).is_ok());
    }
}

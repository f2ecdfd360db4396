use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::contenthash::contenthash_to_uri;
use crate::error::Error;
use crate::registry::{internal_token_list, INTERNAL_LIST};
use crate::schema::{format_violations, SchemaValidator, TokenListSchema};
use crate::source::{EnsResolver, ListFetcher, TokenIndex};
use crate::types::token_list::TokenList;
use crate::uri::{parse_ens_address, uri_to_http};

/// Resolves list references (URLs, ENS names or the internal registry) to validated token lists.
#[derive(Clone)]
pub struct TokenListResolver {
    fetcher: Arc<dyn ListFetcher>,
    index: Arc<dyn TokenIndex>,
    validator: Arc<dyn SchemaValidator>,
    expand_uri: fn(&str) -> Vec<String>,
    config: Arc<Config>,
}

impl TokenListResolver {
    /// Create a resolver validating against the Uniswap token list schema.
    pub fn new(fetcher: Arc<dyn ListFetcher>, index: Arc<dyn TokenIndex>, config: Arc<Config>) -> Self {
        Self {
            fetcher,
            index,
            validator: Arc::new(TokenListSchema),
            expand_uri: uri_to_http,
            config,
        }
    }

    /// Replace the schema validator.
    pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the URI to HTTP(S) URL expansion, e.g. to use other IPFS gateways.
    pub fn with_uri_expander(mut self, expand_uri: fn(&str) -> Vec<String>) -> Self {
        self.expand_uri = expand_uri;
        self
    }

    /// Resolve `list_url` into a token list.
    ///
    /// Candidate URLs are tried in order; transport failures move on to the
    /// next one and only the last is fatal. A document that fails to parse or
    /// validate is rejected without trying further URLs.
    pub async fn resolve(&self, list_url: &str, ens: &dyn EnsResolver) -> Result<TokenList, Error> {
        if list_url == INTERNAL_LIST {
            return internal_token_list(self.index.as_ref(), &self.config).await;
        }

        let urls = self.candidate_urls(list_url, ens).await?;
        let count = urls.len();

        for (i, url) in urls.iter().enumerate() {
            let is_last = i + 1 == count;

            let attempt = tokio::time::timeout(self.config.fetch_timeout, self.fetcher.get(url)).await;
            let outcome = match attempt {
                Ok(Ok(response)) if response.ok() => Ok(response),
                Ok(Ok(response)) => Err(format!("status {}", response.status)),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("timed out after {:?}", self.config.fetch_timeout)),
            };

            let response = match outcome {
                Ok(response) => response,
                Err(reason) => {
                    tracing::debug!(%list_url, %url, %reason, "failed to fetch list");
                    if is_last {
                        return Err(Error::TokenListFetchFailed(list_url.to_string()));
                    }
                    continue;
                }
            };

            let json: Value =
                serde_json::from_slice(&response.body).map_err(|source| Error::TokenListParseFailed {
                    list_url: list_url.to_string(),
                    source,
                })?;

            if let Err(violations) = self.validator.validate(&json) {
                return Err(Error::TokenListValidationFailed {
                    list_url: list_url.to_string(),
                    details: format_violations(&violations),
                });
            }

            let list: TokenList =
                serde_json::from_value(json).map_err(|source| Error::TokenListParseFailed {
                    list_url: list_url.to_string(),
                    source,
                })?;
            tracing::info!(%list_url, %url, tokens = list.tokens.len(), "resolved token list");
            return Ok(list);
        }

        Err(Error::UnrecognizedListProtocol(list_url.to_string()))
    }

    /// Expand a list reference into the HTTP(S) URLs to try, resolving ENS names first.
    async fn candidate_urls(&self, list_url: &str, ens: &dyn EnsResolver) -> Result<Vec<String>, Error> {
        let Some(parsed) = parse_ens_address(list_url) else {
            return Ok((self.expand_uri)(list_url));
        };

        let content_hash = ens
            .resolve_content_hash(&parsed.ens_name)
            .await
            .map_err(|source| {
                tracing::debug!(ens_name = %parsed.ens_name, error = %source, "failed to resolve ENS name");
                Error::EnsResolutionFailed {
                    name: parsed.ens_name.clone(),
                    source,
                }
            })?;

        let uri = contenthash_to_uri(&content_hash).map_err(|source| {
            tracing::debug!(%content_hash, error = %source, "failed to translate contenthash to URI");
            Error::ContentHashTranslationFailed {
                hash: content_hash.clone(),
                source,
            }
        })?;

        Ok((self.expand_uri)(&format!(
            "{uri}{}",
            parsed.ens_path.as_deref().unwrap_or_default()
        )))
    }
}

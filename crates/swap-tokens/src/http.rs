//! `reqwest` implementations of the network collaborators.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::BoxError;
use crate::source::{FetchResponse, FindQuery, ListFetcher, TokenIndex};
use crate::types::hive::RemoteTokenRecord;

/// Fetches token list documents over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, BoxError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(FetchResponse { status, body })
    }
}

/// JSON-RPC client for the Hive-Engine contracts API.
#[derive(Debug, Clone)]
pub struct HiveEngineClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl HiveEngineClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Client for the endpoint configured in `config`.
    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, config.token_index_url.clone())
    }
}

#[async_trait]
impl TokenIndex for HiveEngineClient {
    async fn find(&self, query: &FindQuery) -> Result<Vec<RemoteTokenRecord>, BoxError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "find",
            "params": query,
        });
        tracing::debug!(url = %self.url, contract = %query.contract, table = %query.table, "querying token index");

        let response: RpcResponse<Vec<RemoteTokenRecord>> = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(format!("rpc error {}: {}", error.code, error.message).into());
        }
        Ok(response.result.unwrap_or_default())
    }
}

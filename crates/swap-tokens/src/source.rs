use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::BoxError;
use crate::types::hive::RemoteTokenRecord;

/// Resolves ENS names to their content hash.
#[async_trait]
pub trait EnsResolver: Send + Sync {
    async fn resolve_content_hash(&self, ens_name: &str) -> Result<String, BoxError>;
}

/// A fetched HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP GET requests for token list documents.
#[async_trait]
pub trait ListFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse, BoxError>;
}

/// Sort key for token index queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortIndex {
    pub index: String,
    pub descending: bool,
}

/// A `find` query against a smart-contract table of the token index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindQuery {
    pub contract: String,
    pub table: String,
    pub query: Value,
    pub limit: u32,
    pub offset: u32,
    pub indexes: Vec<SortIndex>,
}

/// Remote token index (Hive-Engine contracts API).
#[async_trait]
pub trait TokenIndex: Send + Sync {
    async fn find(&self, query: &FindQuery) -> Result<Vec<RemoteTokenRecord>, BoxError>;
}

/// In-memory ENS resolver for testing.
#[derive(Debug, Default)]
pub struct StaticEnsResolver {
    records: HashMap<String, String>,
}

impl StaticEnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ens_name: &str, content_hash: &str) {
        self.records
            .insert(ens_name.to_lowercase(), content_hash.to_string());
    }
}

#[async_trait]
impl EnsResolver for StaticEnsResolver {
    async fn resolve_content_hash(&self, ens_name: &str) -> Result<String, BoxError> {
        self.records
            .get(&ens_name.to_lowercase())
            .cloned()
            .ok_or_else(|| format!("no content hash set for {ens_name}").into())
    }
}

/// Canned outcome of a [`StaticFetcher`] request.
#[derive(Debug, Clone)]
pub enum StaticResponse {
    Body { status: u16, body: String },
    NetworkError(String),
    /// Never completes; exercises the fetch timeout.
    Stall,
}

/// In-memory fetcher for testing. Records every requested URL in order.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, StaticResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    pub fn ok(&mut self, url: &str, body: impl Into<String>) {
        self.respond(url, StaticResponse::Body {
            status: 200,
            body: body.into(),
        });
    }

    pub fn respond(&mut self, url: &str, response: StaticResponse) {
        self.responses.insert(url.to_string(), response);
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ListFetcher for StaticFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, BoxError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.responses.get(url).cloned() {
            Some(StaticResponse::Body { status, body }) => Ok(FetchResponse {
                status,
                body: body.into_bytes(),
            }),
            Some(StaticResponse::NetworkError(message)) => Err(message.into()),
            Some(StaticResponse::Stall) => {
                tokio::time::sleep(Duration::from_secs(u64::from(u32::MAX))).await;
                Err("stalled request gave up".into())
            }
            None => Ok(FetchResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

/// In-memory token index for testing. Supports `symbol` `$in` filters, sorting by symbol and paging.
#[derive(Debug, Default)]
pub struct StaticTokenIndex {
    records: Vec<RemoteTokenRecord>,
    queries: Mutex<Vec<FindQuery>>,
}

impl StaticTokenIndex {
    pub fn new(records: Vec<RemoteTokenRecord>) -> Self {
        Self {
            records,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<FindQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TokenIndex for StaticTokenIndex {
    async fn find(&self, query: &FindQuery) -> Result<Vec<RemoteTokenRecord>, BoxError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        let wanted: Option<Vec<&str>> = query
            .query
            .pointer("/symbol/$in")
            .and_then(Value::as_array)
            .map(|symbols| symbols.iter().filter_map(Value::as_str).collect());

        let mut matches: Vec<RemoteTokenRecord> = self
            .records
            .iter()
            .filter(|r| wanted.as_ref().map_or(true, |w| w.contains(&r.symbol.as_str())))
            .cloned()
            .collect();

        if let Some(sort) = query.indexes.iter().find(|i| i.index == "symbol") {
            matches.sort_by(|a, b| a.symbol.cmp(&b.symbol));
            if sort.descending {
                matches.reverse();
            }
        }

        Ok(matches
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }
}

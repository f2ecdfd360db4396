use thiserror::Error;

/// Boxed error returned by the network collaborators (ENS, fetch, token index).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for currency handling and token list resolution.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("failed to resolve ENS name: {name}")]
    EnsResolutionFailed {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to translate contenthash to URI: {hash}")]
    ContentHashTranslationFailed {
        hash: String,
        #[source]
        source: ContentHashError,
    },

    #[error("failed to download list {0}")]
    TokenListFetchFailed(String),

    #[error("token list {list_url} is not valid JSON")]
    TokenListParseFailed {
        list_url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("token list {list_url} failed validation: {details}")]
    TokenListValidationFailed { list_url: String, details: String },

    #[error("unrecognized list URL protocol: {0}")]
    UnrecognizedListProtocol(String),

    #[error("invalid metadata for token {symbol}")]
    MetadataParseError {
        symbol: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("token index query failed")]
    TokenIndexQueryFailed(#[source] BoxError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors while decoding an EIP-1577 content hash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentHashError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("truncated varint at byte {0}")]
    TruncatedVarint(usize),

    #[error("unrecognized codec: 0x{0:x}")]
    UnrecognizedCodec(u64),

    #[error("unrecognized IPNS hash function: 0x{0:x}")]
    UnrecognizedIpnsHash(u64),

    #[error("invalid CID: {0}")]
    InvalidCid(String),

    #[error("multihash digest length mismatch: declared {declared}, got {actual}")]
    DigestLength { declared: usize, actual: usize },
}

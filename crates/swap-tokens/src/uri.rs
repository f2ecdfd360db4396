use std::sync::LazyLock;

use regex::Regex;

static ENS_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([a-zA-Z0-9]+(-[a-zA-Z0-9]+)*\.)+)eth(/.*)?$").expect("valid ENS regex")
});

static IPFS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ipfs:(//)?(.*)$").expect("valid ipfs regex"));

static IPNS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ipns:(//)?(.*)$").expect("valid ipns regex"));

/// Public gateways for content-addressed documents, tried in this order.
const IPFS_GATEWAYS: [&str; 2] = ["https://cloudflare-ipfs.com", "https://ipfs.io"];

/// An ENS name with an optional path, e.g. `tokens.uniswap.eth/list.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEns {
    /// Lowercased name ending in `eth`.
    pub ens_name: String,
    /// Path suffix starting with `/`, if present.
    pub ens_path: Option<String>,
}

/// Parse an ENS `name.eth[/path]` reference.
pub fn parse_ens_address(input: &str) -> Option<ParsedEns> {
    let captures = ENS_NAME_REGEX.captures(input)?;
    let labels = captures.get(1)?.as_str();
    Some(ParsedEns {
        ens_name: format!("{}eth", labels.to_lowercase()),
        ens_path: captures.get(4).map(|m| m.as_str().to_string()),
    })
}

/// Expand a URI into the HTTP(S) URLs it can be fetched from, most preferred first.
///
/// Unknown schemes yield an empty list.
pub fn uri_to_http(uri: &str) -> Vec<String> {
    let protocol = uri.split(':').next().unwrap_or_default().to_lowercase();
    match protocol.as_str() {
        "https" => vec![uri.to_string()],
        "http" => vec![format!("https{}", &uri[4..]), uri.to_string()],
        "ipfs" => gateway_urls(&IPFS_REGEX, "ipfs", uri),
        "ipns" => gateway_urls(&IPNS_REGEX, "ipns", uri),
        _ => Vec::new(),
    }
}

fn gateway_urls(regex: &Regex, namespace: &str, uri: &str) -> Vec<String> {
    let Some(hash) = regex.captures(uri).and_then(|c| c.get(2)) else {
        return Vec::new();
    };
    IPFS_GATEWAYS
        .iter()
        .map(|gateway| format!("{gateway}/{namespace}/{}/", hash.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ens_name_only() {
        let parsed = parse_ens_address("tokens.Uniswap.eth").unwrap();
        assert_eq!(parsed.ens_name, "tokens.uniswap.eth");
        assert_eq!(parsed.ens_path, None);
    }

    #[test]
    fn test_parse_ens_with_path() {
        let parsed = parse_ens_address("my-lists.eth/hive/list.json").unwrap();
        assert_eq!(parsed.ens_name, "my-lists.eth");
        assert_eq!(parsed.ens_path.as_deref(), Some("/hive/list.json"));
    }

    #[test]
    fn test_parse_ens_rejects_urls() {
        assert!(parse_ens_address("https://tokens.uniswap.eth").is_none());
        assert!(parse_ens_address("eth").is_none());
        assert!(parse_ens_address("foo.com").is_none());
        assert!(parse_ens_address("-bad.eth").is_none());
        assert!(parse_ens_address("hive-engine.list").is_none());
    }

    #[test]
    fn test_uri_to_http_https() {
        assert_eq!(
            uri_to_http("https://example.com/list.json"),
            vec!["https://example.com/list.json"]
        );
    }

    #[test]
    fn test_uri_to_http_upgrades_http() {
        assert_eq!(
            uri_to_http("http://example.com/list.json"),
            vec![
                "https://example.com/list.json",
                "http://example.com/list.json"
            ]
        );
    }

    #[test]
    fn test_uri_to_http_ipfs() {
        assert_eq!(
            uri_to_http("ipfs://QmV8AfDE8GFSGQvt3vck8EwAzsPuNTmtP8VcQJE3qxRPaZ"),
            vec![
                "https://cloudflare-ipfs.com/ipfs/QmV8AfDE8GFSGQvt3vck8EwAzsPuNTmtP8VcQJE3qxRPaZ/",
                "https://ipfs.io/ipfs/QmV8AfDE8GFSGQvt3vck8EwAzsPuNTmtP8VcQJE3qxRPaZ/"
            ]
        );
        // the `//` after the scheme is optional
        assert_eq!(uri_to_http("IPFS:Qmabc").len(), 2);
    }

    #[test]
    fn test_uri_to_http_ipns() {
        assert_eq!(
            uri_to_http("ipns://app.uniswap.org"),
            vec![
                "https://cloudflare-ipfs.com/ipns/app.uniswap.org/",
                "https://ipfs.io/ipns/app.uniswap.org/"
            ]
        );
    }

    #[test]
    fn test_uri_to_http_unknown_scheme() {
        assert!(uri_to_http("ftp://example.com/list.json").is_empty());
        assert!(uri_to_http("hive-engine.list").is_empty());
        assert!(uri_to_http("").is_empty());
    }
}

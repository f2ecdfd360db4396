use std::fmt;
use std::hash::Hash;

use tiny_keccak::{Hasher, Keccak};

use crate::error::Error;
use crate::types::token_list::TokenInfo;

/// Symbol of the native pseudo-currency.
pub const NATIVE_SYMBOL: &str = "SWAP.HIVE";

/// Human-readable name of the native pseudo-currency.
pub const NATIVE_NAME: &str = "Hive";

/// Decimals of the native pseudo-currency.
pub const NATIVE_DECIMALS: u8 = 8;

/// A currency is either the chain's native pseudo-currency or an ERC-20 style token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    Native,
    Token(Token),
}

impl Currency {
    pub fn symbol(&self) -> &str {
        match self {
            Currency::Native => NATIVE_SYMBOL,
            Currency::Token(token) => token.symbol(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Currency::Native => NATIVE_NAME,
            Currency::Token(token) => token.name(),
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Currency::Native => NATIVE_DECIMALS,
            Currency::Token(token) => token.decimals(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native)
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Currency::Native => None,
            Currency::Token(token) => Some(token),
        }
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}

/// Canonical string identifier of a currency: the native symbol or the token address.
pub fn currency_id(currency: &Currency) -> String {
    match currency {
        Currency::Native => NATIVE_SYMBOL.to_string(),
        Currency::Token(token) => token.address().to_string(),
    }
}

/// An immutable token value. Two tokens are equal when chain and address match.
#[derive(Debug, Clone)]
pub struct Token {
    chain_id: u64,
    address: String,
    decimals: u8,
    symbol: String,
    name: String,
}

impl Token {
    /// Create a token, validating the address and storing its EIP-55 checksummed form.
    pub fn new(
        chain_id: u64,
        address: &str,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            chain_id,
            address: checksum_address(address)?,
            decimals,
            symbol: symbol.into(),
            name: name.into(),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Checksummed `0x`-prefixed address.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

impl TryFrom<&TokenInfo> for Token {
    type Error = Error;

    fn try_from(info: &TokenInfo) -> Result<Self, Self::Error> {
        Token::new(
            info.chain_id,
            &info.address,
            info.decimals,
            info.symbol.clone(),
            info.name.clone(),
        )
    }
}

/// Validate a `0x`-prefixed 20-byte hex address and return its EIP-55 checksummed form.
///
/// Mixed-case input must already carry a correct checksum; all-lowercase and
/// all-uppercase input is accepted as-is.
pub fn checksum_address(address: &str) -> Result<String, Error> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| Error::InvalidCurrency(format!("address missing 0x prefix: {address}")))?;

    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidCurrency(format!(
            "address is not 20 bytes of hex: {address}"
        )));
    }

    let lower = hex_part.to_ascii_lowercase();
    let mut hash = [0u8; 32];
    let mut keccak = Keccak::v256();
    keccak.update(lower.as_bytes());
    keccak.finalize(&mut hash);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    let is_mixed_case = hex_part.bytes().any(|b| b.is_ascii_lowercase())
        && hex_part.bytes().any(|b| b.is_ascii_uppercase());
    if is_mixed_case && checksummed[2..] != *hex_part {
        return Err(Error::InvalidCurrency(format!(
            "bad address checksum: {address}"
        )));
    }

    Ok(checksummed)
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vectors
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_checksum_reference_vectors() {
        for expected in CHECKSUMMED {
            let lower = expected.to_lowercase();
            assert_eq!(checksum_address(&lower).unwrap(), expected);
            assert_eq!(checksum_address(expected).unwrap(), expected);
        }
    }

    #[test]
    fn test_checksum_rejects_bad_mixed_case() {
        // flip case of one letter in a valid checksummed address
        let result = checksum_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(matches!(result, Err(Error::InvalidCurrency(_))));
    }

    #[test]
    fn test_token_rejects_malformed_address() {
        assert!(Token::new(1, "0x1234", 18, "X", "X").is_err());
        assert!(Token::new(1, "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", 18, "X", "X").is_err());
        assert!(Token::new(1, "0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed", 18, "X", "X").is_err());
    }

    #[test]
    fn test_token_equality_by_chain_and_address() {
        let a = Token::new(1, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", 18, "A", "Alpha").unwrap();
        let b = Token::new(1, "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED", 6, "B", "Beta").unwrap();
        let c = Token::new(3, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", 18, "A", "Alpha").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_currency_id() {
        assert_eq!(currency_id(&Currency::Native), "SWAP.HIVE");

        let token = Token::new(1, CHECKSUMMED[1], 18, "T", "Test").unwrap();
        assert_eq!(currency_id(&Currency::Token(token.clone())), token.address());
        assert_eq!(token.address(), CHECKSUMMED[1]);
    }

    #[test]
    fn test_token_from_token_info() {
        let info = TokenInfo {
            chain_id: 1,
            address: CHECKSUMMED[2].to_lowercase(),
            name: "Dragon".to_string(),
            decimals: 3,
            symbol: "DEC".to_string(),
            logo_uri: None,
            tags: Vec::new(),
            extensions: None,
        };
        let token = Token::try_from(&info).unwrap();
        assert_eq!(token.address(), CHECKSUMMED[2]);
        assert_eq!(token.decimals(), 3);
        assert_eq!(Currency::from(token).symbol(), "DEC");
    }
}

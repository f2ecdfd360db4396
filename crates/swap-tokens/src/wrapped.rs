use num_bigint::BigUint;

use crate::currency::{Currency, Token};

/// Chain ID of Ethereum mainnet, used for tokens built from the internal registry.
pub const MAINNET: u64 = 1;

/// Wrapped-native deployments per chain: (chain_id, address).
const WRAPPED_NATIVE: [(u64, &str); 5] = [
    (1, "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
    (3, "0xc778417e063141139fce010982780140aa0cd5ab"),
    (4, "0xc778417e063141139fce010982780140aa0cd5ab"),
    (5, "0xb4fbf271143f4fbf7b91a5ded31805e42b2208d6"),
    (42, "0xd0a1e359811322d97991e03f863a0c8c2c4b6cb8"),
];

/// Address of the wrapped-native token on `chain_id`, if the chain is known.
pub fn wrapped_native_address(chain_id: u64) -> Option<&'static str> {
    WRAPPED_NATIVE
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, address)| *address)
}

/// The canonical wrapped-native token for a chain.
pub fn wrapped_native(chain_id: u64) -> Option<Token> {
    let address = wrapped_native_address(chain_id)?;
    Token::new(chain_id, address, 18, "WETH", "Wrapped Ether").ok()
}

/// An amount of some currency, in raw base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    pub currency: Currency,
    pub raw: BigUint,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, raw: impl Into<BigUint>) -> Self {
        Self {
            currency,
            raw: raw.into(),
        }
    }
}

/// An amount of a specific token, in raw base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    pub token: Token,
    pub raw: BigUint,
}

/// Map a currency onto its token form on `chain_id`.
///
/// The native currency becomes the chain's wrapped-native token; tokens pass
/// through regardless of `chain_id`.
pub fn wrap(currency: Option<&Currency>, chain_id: Option<u64>) -> Option<Token> {
    match (currency?, chain_id) {
        (Currency::Native, Some(chain_id)) => wrapped_native(chain_id),
        (Currency::Native, None) => None,
        (Currency::Token(token), _) => Some(token.clone()),
    }
}

/// Wrap the currency of an amount, keeping the raw quantity untouched.
pub fn wrap_amount(amount: Option<&CurrencyAmount>, chain_id: Option<u64>) -> Option<TokenAmount> {
    let (amount, chain_id) = (amount?, chain_id?);
    let token = wrap(Some(&amount.currency), Some(chain_id))?;
    Some(TokenAmount {
        token,
        raw: amount.raw.clone(),
    })
}

/// Map the wrapped-native token of a chain back to the native currency.
pub fn unwrap(token: &Token) -> Currency {
    match wrapped_native(token.chain_id()) {
        Some(native) if native == *token => Currency::Native,
        _ => Currency::Token(token.clone()),
    }
}

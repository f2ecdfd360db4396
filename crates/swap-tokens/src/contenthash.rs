//! EIP-1577 content hash decoding.

use crate::error::ContentHashError;

const IPFS_NS: u64 = 0xe3;
const IPNS_NS: u64 = 0xe5;

const CID_V1: u64 = 0x01;
const MULTIHASH_IDENTITY: u64 = 0x00;
const MULTIHASH_SHA2_256: u64 = 0x12;

/// Translate a hex content hash (as stored in an ENS resolver) into an `ipfs://` or `ipns://` URI.
pub fn contenthash_to_uri(contenthash: &str) -> Result<String, ContentHashError> {
    let hex_str = contenthash
        .strip_prefix("0x")
        .or_else(|| contenthash.strip_prefix("0X"))
        .unwrap_or(contenthash);
    let bytes = hex::decode(hex_str).map_err(|e| ContentHashError::InvalidHex(e.to_string()))?;

    let (codec, rest) = read_varint(&bytes, 0)?;
    let data = &bytes[rest..];

    match codec {
        IPFS_NS => {
            let multihash = cid_multihash(data)?;
            Ok(format!("ipfs://{}", bs58::encode(multihash).into_string()))
        }
        IPNS_NS => {
            let multihash = cid_multihash(data)?;
            // only inline (identity) names are accepted
            let (code, digest) = split_multihash(multihash)?;
            if code != MULTIHASH_IDENTITY {
                return Err(ContentHashError::UnrecognizedIpnsHash(code));
            }
            let name = String::from_utf8_lossy(digest);
            Ok(format!("ipns://{}", name.trim()))
        }
        other => Err(ContentHashError::UnrecognizedCodec(other)),
    }
}

/// Extract the multihash bytes of a CID, accepting both v0 (bare sha2-256 multihash) and v1.
fn cid_multihash(data: &[u8]) -> Result<&[u8], ContentHashError> {
    if data.len() == 34 && data[0] == MULTIHASH_SHA2_256 as u8 && data[1] == 0x20 {
        return Ok(data);
    }

    let (version, pos) = read_varint(data, 0)?;
    if version != CID_V1 {
        return Err(ContentHashError::InvalidCid(format!(
            "unsupported CID version {version}"
        )));
    }
    // content codec (dag-pb, libp2p-key, ...) is not needed to build the URI
    let (_codec, pos) = read_varint(data, pos)?;
    let multihash = &data[pos..];
    split_multihash(multihash)?;
    Ok(multihash)
}

/// Split a multihash into its hash function code and digest, checking the declared length.
fn split_multihash(multihash: &[u8]) -> Result<(u64, &[u8]), ContentHashError> {
    let (code, pos) = read_varint(multihash, 0)?;
    let (length, pos) = read_varint(multihash, pos)?;
    let digest = &multihash[pos..];
    if digest.len() as u64 != length {
        return Err(ContentHashError::DigestLength {
            declared: length as usize,
            actual: digest.len(),
        });
    }
    Ok((code, digest))
}

/// Read an unsigned LEB128 varint starting at `start`; returns the value and the next offset.
fn read_varint(bytes: &[u8], start: usize) -> Result<(u64, usize), ContentHashError> {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().enumerate().skip(start).take(9) {
        value |= u64::from(byte & 0x7f) << (7 * (i - start));
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(ContentHashError::TruncatedVarint(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256_multihash() -> Vec<u8> {
        let mut multihash = vec![0x12, 0x20];
        multihash.extend((0u8..32).map(|i| i.wrapping_mul(7)));
        multihash
    }

    #[test]
    fn test_ipfs_cid_v1() {
        let multihash = sha256_multihash();
        let contenthash = format!("0xe30101701220{}", hex::encode(&multihash[2..]));

        let uri = contenthash_to_uri(&contenthash).unwrap();
        let expected = format!("ipfs://{}", bs58::encode(&multihash).into_string());
        assert_eq!(uri, expected);
        assert!(uri.starts_with("ipfs://Qm"));
    }

    #[test]
    fn test_ipfs_cid_v0() {
        let multihash = sha256_multihash();
        let contenthash = format!("e301{}", hex::encode(&multihash));
        let uri = contenthash_to_uri(&contenthash).unwrap();
        assert_eq!(uri, format!("ipfs://{}", bs58::encode(&multihash).into_string()));
    }

    #[test]
    fn test_ipns_identity() {
        let name = b"app.uniswap.org";
        let contenthash = format!("0xe5010172000f{}", hex::encode(name));
        assert_eq!(contenthash_to_uri(&contenthash).unwrap(), "ipns://app.uniswap.org");
    }

    #[test]
    fn test_ipns_hashed_key_rejected() {
        let multihash = sha256_multihash();
        let contenthash = format!("0xe501017212{}", hex::encode(&multihash[1..]));
        assert_eq!(
            contenthash_to_uri(&contenthash),
            Err(ContentHashError::UnrecognizedIpnsHash(MULTIHASH_SHA2_256))
        );
    }

    #[test]
    fn test_unrecognized_codec() {
        // swarm-ns
        let result = contenthash_to_uri("0xe40101fa011b20d1de9994b4d039f6548d191eb26786769f580809256b4685ef316805265ea162");
        assert_eq!(result, Err(ContentHashError::UnrecognizedCodec(0xe4)));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            contenthash_to_uri("0xnothex"),
            Err(ContentHashError::InvalidHex(_))
        ));
        assert!(matches!(
            contenthash_to_uri("0x"),
            Err(ContentHashError::TruncatedVarint(0))
        ));
        assert!(matches!(
            contenthash_to_uri("0xe301017012200000"),
            Err(ContentHashError::DigestLength { declared: 32, actual: 2 })
        ));
    }
}

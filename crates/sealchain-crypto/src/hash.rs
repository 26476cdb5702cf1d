//! Algorithm-tagged content hashing.
//!
//! Digest hashes carry their algorithm identifier alongside the raw bytes.
//! The chain stores hashes for years; tagging each one lets a future
//! algorithm migration verify old records with the algorithm that produced
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CryptoError, CryptoResult};

/// Hash length in bytes, shared by every supported algorithm.
pub const HASH_LEN: usize = 32;

/// Supported hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// BLAKE3, the current default.
    Blake3,
}

impl HashAlgorithm {
    /// Stable string identifier used in serialized hashes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Blake3
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blake3" => Ok(Self::Blake3),
            other => Err(CryptoError::UnknownHashAlgorithm(other.to_string())),
        }
    }
}

/// An algorithm-tagged 32-byte digest hash.
///
/// Serializes as `"<algorithm>:<hex>"`, e.g.
/// `"blake3:af13…"`, so exported records remain self-describing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigestHash {
    algorithm: HashAlgorithm,
    bytes: [u8; HASH_LEN],
}

impl DigestHash {
    /// Hash arbitrary data with the default algorithm.
    #[must_use]
    pub fn hash(data: &[u8]) -> Self {
        Self {
            algorithm: HashAlgorithm::Blake3,
            bytes: *blake3::hash(data).as_bytes(),
        }
    }

    /// Hash multiple chunks as if concatenated.
    #[must_use]
    pub fn hash_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        Self {
            algorithm: HashAlgorithm::Blake3,
            bytes: *hasher.finalize().as_bytes(),
        }
    }

    /// Hash chunks under a domain-separation label.
    ///
    /// Distinct domains guarantee that, e.g., a content hash can never
    /// collide with a linkage hash computed over the same bytes.
    #[must_use]
    pub fn hash_parts_with_domain(domain: &str, parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key(domain);
        for part in parts {
            hasher.update(part);
        }
        Self {
            algorithm: HashAlgorithm::Blake3,
            bytes: *hasher.finalize().as_bytes(),
        }
    }

    /// The well-known genesis value used as `previous_digest_hash` for
    /// sequence 0.
    #[must_use]
    pub const fn genesis() -> Self {
        Self {
            algorithm: HashAlgorithm::Blake3,
            bytes: [0u8; HASH_LEN],
        }
    }

    /// Whether this is the genesis value.
    #[must_use]
    pub fn is_genesis(&self) -> bool {
        self.bytes == [0u8; HASH_LEN]
    }

    /// The algorithm that produced this hash.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.bytes
    }

    /// Reconstruct from an algorithm tag and raw bytes.
    #[must_use]
    pub const fn from_parts(algorithm: HashAlgorithm, bytes: [u8; HASH_LEN]) -> Self {
        Self { algorithm, bytes }
    }

    /// Hex encoding of the raw bytes (without the algorithm tag).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse the `"<algorithm>:<hex>"` form.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm tag is unknown, the hex is
    /// malformed, or the decoded length is not 32 bytes.
    pub fn parse(s: &str) -> CryptoResult<Self> {
        let (algo, hex_part) = s
            .split_once(':')
            .ok_or(CryptoError::InvalidHexEncoding)?;
        let algorithm = algo.parse::<HashAlgorithm>()?;
        let decoded = hex::decode(hex_part).map_err(|_| CryptoError::InvalidHexEncoding)?;
        if decoded.len() != HASH_LEN {
            return Err(CryptoError::InvalidHashLength {
                expected: HASH_LEN,
                actual: decoded.len(),
            });
        }
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self { algorithm, bytes })
    }
}

impl fmt::Debug for DigestHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestHash({}:{})", self.algorithm, &self.to_hex()[..16])
    }
}

impl fmt::Display for DigestHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl Serialize for DigestHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DigestHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"audit payload";
        assert_eq!(DigestHash::hash(data), DigestHash::hash(data));
        assert_ne!(DigestHash::hash(data), DigestHash::hash(b"other"));
    }

    #[test]
    fn test_hash_parts_matches_concatenation() {
        let parts: &[&[u8]] = &[b"audit ", b"payload"];
        assert_eq!(DigestHash::hash_parts(parts), DigestHash::hash(b"audit payload"));
    }

    #[test]
    fn test_domain_separation() {
        let parts: &[&[u8]] = &[b"same bytes"];
        let a = DigestHash::hash_parts_with_domain("sealchain.content.v1", parts);
        let b = DigestHash::hash_parts_with_domain("sealchain.link.v1", parts);
        assert_ne!(a, b);
        assert_ne!(a, DigestHash::hash(b"same bytes"));
    }

    #[test]
    fn test_genesis() {
        let genesis = DigestHash::genesis();
        assert!(genesis.is_genesis());
        assert!(!DigestHash::hash(b"data").is_genesis());
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let hash = DigestHash::hash(b"data");
        let s = hash.to_string();
        assert!(s.starts_with("blake3:"));
        assert_eq!(DigestHash::parse(&s).unwrap(), hash);
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let hash = DigestHash::hash(b"data");
        let s = format!("md5:{}", hash.to_hex());
        assert!(matches!(
            DigestHash::parse(&s),
            Err(CryptoError::UnknownHashAlgorithm(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let hash = DigestHash::hash(b"data");
        let json = serde_json::to_string(&hash).unwrap();
        let decoded: DigestHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, decoded);
    }
}

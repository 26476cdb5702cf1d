//! Ed25519 signatures over digest hashes and certificates.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CryptoError, CryptoResult};

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Create from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Raw signature bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Verify this signature against a message and raw public key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the public key is invalid or verification fails.
    pub fn verify(&self, message: &[u8], public_key: &[u8; 32]) -> CryptoResult<()> {
        let verifying_key = VerifyingKey::from_bytes(public_key)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

        verifying_key
            .verify(message, &DalekSignature::from_bytes(&self.0))
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Encode as base64 string.
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    /// Decode from base64 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid base64 or not 64 bytes.
    pub fn from_base64(s: &str) -> CryptoResult<Self> {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|_| CryptoError::InvalidBase64Encoding)?;
        if decoded.len() != 64 {
            return Err(CryptoError::InvalidSignatureLength {
                expected: 64,
                actual: decoded.len(),
            });
        }
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

impl From<DalekSignature> for Signature {
    fn from(sig: DalekSignature) -> Self {
        Self(sig.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SigningKeyPair;

    #[test]
    fn test_base64_roundtrip() {
        let pair = SigningKeyPair::generate();
        let sig = pair.sign(b"message");

        let decoded = Signature::from_base64(&sig.to_base64()).unwrap();
        assert_eq!(sig, decoded);
    }

    #[test]
    fn test_verify_against_raw_key() {
        let pair = SigningKeyPair::generate();
        let message = b"message";
        let sig = pair.sign(message);

        assert!(sig.verify(message, pair.public_key().as_bytes()).is_ok());
        assert!(sig.verify(b"tampered", pair.public_key().as_bytes()).is_err());

        let other = SigningKeyPair::generate();
        assert!(sig.verify(message, other.public_key().as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        use base64::Engine;
        let short = base64::engine::general_purpose::STANDARD.encode([0u8; 32]);
        assert!(matches!(
            Signature::from_base64(&short),
            Err(CryptoError::InvalidSignatureLength { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let sig = SigningKeyPair::generate().sign(b"message");
        let json = serde_json::to_string(&sig).unwrap();
        let decoded: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, decoded);
    }
}

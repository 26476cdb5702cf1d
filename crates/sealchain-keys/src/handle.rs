//! Key metadata exposed to callers.
//!
//! A [`KeyHandle`] describes a key without carrying any private material;
//! it is what the key manager hands back from lifecycle operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use sealchain_core::{TenantId, Timestamp};
use sealchain_crypto::Fingerprint;

/// Asymmetric signature algorithms supported by the key manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    /// Ed25519, the current default.
    Ed25519,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ed25519"),
        }
    }
}

/// Lifecycle status of a signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    /// The key currently signs new digests.
    Active,
    /// Rotated out; still valid for verifying past signatures.
    Expired,
    /// Administratively revoked; past signatures are flagged, not rejected.
    Revoked,
    /// Revoked due to suspected compromise.
    Compromised,
}

impl KeyStatus {
    /// Whether signatures by this key should be flagged during verification.
    ///
    /// Expiry is routine rotation and is not flagged; only revocation is.
    #[must_use]
    pub const fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked | Self::Compromised)
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Revoked => write!(f, "revoked"),
            Self::Compromised => write!(f, "compromised"),
        }
    }
}

/// Why a key was rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationReason {
    /// Routine rotation triggered by the external scheduler.
    Scheduled,
    /// Rotation forced by a policy change (e.g. tenant tier upgrade).
    PolicyChange,
    /// Manual rotation requested by an operator.
    Operator,
}

impl fmt::Display for RotationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::PolicyChange => write!(f, "policy_change"),
            Self::Operator => write!(f, "operator"),
        }
    }
}

/// Why a key was revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    /// The private key is suspected or known to be compromised.
    Compromise,
    /// Administrative revocation for any other cause.
    Administrative,
}

impl fmt::Display for RevocationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compromise => write!(f, "compromise"),
            Self::Administrative => write!(f, "administrative"),
        }
    }
}

/// Public metadata of a signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyHandle {
    /// Owning tenant.
    pub tenant: TenantId,
    /// Stable identifier derived from the public key.
    pub fingerprint: Fingerprint,
    /// Signature algorithm.
    pub algorithm: SignatureAlgorithm,
    /// Current lifecycle status.
    pub status: KeyStatus,
    /// Start of the validity window (activation time).
    pub not_before: Timestamp,
    /// End of the validity window; `None` while the key is Active.
    pub not_after: Option<Timestamp>,
}

//! Tenant identity, tiers and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Maximum accepted length for a tenant identifier.
const MAX_TENANT_ID_LEN: usize = 128;

/// A tenant identifier.
///
/// Tenants are the unit of isolation: each tenant owns exactly one logical
/// digest chain, and chains never cross tenant boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Create a tenant identifier, validating the raw string.
    ///
    /// Accepts non-empty ASCII strings of alphanumerics, `-`, `_` and `.`
    /// up to 128 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTenantId`] if the string is empty, too
    /// long, or contains characters outside the accepted set.
    pub fn new(raw: impl Into<String>) -> CoreResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CoreError::InvalidTenantId {
                reason: "empty".to_string(),
            });
        }
        if raw.len() > MAX_TENANT_ID_LEN {
            return Err(CoreError::InvalidTenantId {
                reason: format!("longer than {MAX_TENANT_ID_LEN} bytes"),
            });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
        {
            return Err(CoreError::InvalidTenantId {
                reason: "contains characters outside [A-Za-z0-9._-]".to_string(),
            });
        }
        Ok(Self(raw))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compliance tier of a tenant.
///
/// Tiers do not change chain semantics; they drive operational policy such
/// as the key rotation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantTier {
    /// Default tier.
    Standard,
    /// Regulated industries; shorter rotation period.
    Regulated,
    /// Strictest compliance posture.
    Restricted,
}

impl Default for TenantTier {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for TenantTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Regulated => write!(f, "regulated"),
            Self::Restricted => write!(f, "restricted"),
        }
    }
}

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Unix timestamp in milliseconds.
    ///
    /// Used when feeding timestamps into hash computations, where a stable
    /// integer encoding is required.
    #[must_use]
    pub fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_accepts_reasonable_names() {
        assert!(TenantId::new("acme-corp").is_ok());
        assert!(TenantId::new("tenant_42.eu").is_ok());
    }

    #[test]
    fn test_tenant_id_rejects_empty() {
        assert!(matches!(
            TenantId::new(""),
            Err(CoreError::InvalidTenantId { .. })
        ));
    }

    #[test]
    fn test_tenant_id_rejects_bad_chars() {
        assert!(TenantId::new("acme corp").is_err());
        assert!(TenantId::new("acme/corp").is_err());
    }

    #[test]
    fn test_tenant_id_rejects_oversized() {
        let long = "a".repeat(200);
        assert!(TenantId::new(long).is_err());
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let decoded: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, decoded);
    }
}

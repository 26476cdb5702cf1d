//! Rotation policy per tenant tier.
//!
//! The engine never rotates keys on its own; an external scheduler asks
//! [`rotation_due`](RotationPolicy::rotation_due) and calls
//! `KeyManager::rotate_key` when it answers yes. Keeping the trigger outside
//! the cryptographic core keeps policy decisions auditable on their own.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use sealchain_core::{TenantTier, Timestamp};

/// Key rotation periods, in days, per tenant tier.
///
/// Deserializable so deployments can override the defaults from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Rotation period for `Standard` tenants.
    pub standard_days: u32,
    /// Rotation period for `Regulated` tenants.
    pub regulated_days: u32,
    /// Rotation period for `Restricted` tenants.
    pub restricted_days: u32,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            standard_days: 90,
            regulated_days: 30,
            restricted_days: 7,
        }
    }
}

impl RotationPolicy {
    /// The rotation period for a tier.
    #[must_use]
    pub fn period(&self, tier: TenantTier) -> Duration {
        let days = match tier {
            TenantTier::Standard => self.standard_days,
            TenantTier::Regulated => self.regulated_days,
            TenantTier::Restricted => self.restricted_days,
        };
        Duration::days(i64::from(days))
    }

    /// Whether a key activated at `not_before` is due for rotation at `now`.
    #[must_use]
    pub fn rotation_due(&self, tier: TenantTier, not_before: Timestamp, now: Timestamp) -> bool {
        now.0.signed_duration_since(not_before.0) >= self.period(tier)
    }
}

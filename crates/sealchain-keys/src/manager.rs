//! The key manager: per-tenant signing key custody.

use dashmap::DashMap;
use std::sync::RwLock;

use sealchain_core::{TenantId, TenantTier, Timestamp};
use sealchain_crypto::{Fingerprint, PublicKey, Signature, SigningKeyPair};

use crate::error::{KeyError, KeyResult};
use crate::handle::{KeyHandle, KeyStatus, RevocationReason, RotationReason, SignatureAlgorithm};
use crate::policy::RotationPolicy;

/// One key held by a tenant keyring.
///
/// The signing pair is present only while the key is Active; rotation and
/// revocation drop it (zeroizing the secret), keeping only the public half.
struct StoredKey {
    handle: KeyHandle,
    public_key: PublicKey,
    pair: Option<SigningKeyPair>,
}

/// All keys ever issued to one tenant.
#[derive(Default)]
struct TenantKeyring {
    tier: TenantTier,
    active: Option<Fingerprint>,
    keys: Vec<StoredKey>,
}

impl TenantKeyring {
    fn find(&self, fingerprint: &Fingerprint) -> Option<&StoredKey> {
        self.keys.iter().find(|k| k.handle.fingerprint == *fingerprint)
    }

    fn find_mut(&mut self, fingerprint: &Fingerprint) -> Option<&mut StoredKey> {
        self.keys
            .iter_mut()
            .find(|k| k.handle.fingerprint == *fingerprint)
    }
}

/// Read a lock even if a panicking writer poisoned it; the keyring data is
/// valid at every point a lock is released.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Sole custodian of signing key material and lifecycle policy.
///
/// Tenants are isolated in a concurrent keyring arena; a global fingerprint
/// index routes historical public-key lookups. `sign` snapshots the Active
/// key under the tenant keyring read lock, so an in-flight append either
/// observes the old key or the new one, never a key mid-rotation.
pub struct KeyManager {
    policy: RotationPolicy,
    keyrings: DashMap<TenantId, RwLock<TenantKeyring>>,
    tenant_by_fingerprint: DashMap<Fingerprint, TenantId>,
}

impl KeyManager {
    /// Create a key manager with the default rotation policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RotationPolicy::default())
    }

    /// Create a key manager with an explicit rotation policy.
    #[must_use]
    pub fn with_policy(policy: RotationPolicy) -> Self {
        Self {
            policy,
            keyrings: DashMap::new(),
            tenant_by_fingerprint: DashMap::new(),
        }
    }

    /// Set the compliance tier of a tenant (drives the rotation period).
    pub fn set_tenant_tier(&self, tenant: &TenantId, tier: TenantTier) {
        let entry = self
            .keyrings
            .entry(tenant.clone())
            .or_insert_with(|| RwLock::new(TenantKeyring::default()));
        write_lock(entry.value()).tier = tier;
    }

    /// Generate and activate a signing key for a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyConflict`] if the tenant already has an
    /// Active key; rotation must be requested explicitly.
    pub fn activate_key(&self, tenant: &TenantId) -> KeyResult<KeyHandle> {
        let entry = self
            .keyrings
            .entry(tenant.clone())
            .or_insert_with(|| RwLock::new(TenantKeyring::default()));
        let mut ring = write_lock(entry.value());

        if let Some(active) = &ring.active {
            return Err(KeyError::KeyConflict {
                tenant: tenant.to_string(),
                fingerprint: active.to_string(),
            });
        }

        let handle = Self::install_key(&mut ring, tenant);
        self.tenant_by_fingerprint
            .insert(handle.fingerprint, tenant.clone());

        tracing::info!(tenant = %tenant, fingerprint = %handle.fingerprint, "activated signing key");
        Ok(handle)
    }

    /// Rotate the tenant's Active key.
    ///
    /// The old key is marked Expired, not Revoked: it remains valid for
    /// verifying every digest it signed. The expiry and the activation
    /// happen under one keyring write lock, so no signer can observe the
    /// window in between.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::NoActiveKey`] if the tenant has nothing to
    /// rotate.
    pub fn rotate_key(&self, tenant: &TenantId, reason: RotationReason) -> KeyResult<KeyHandle> {
        let entry = self
            .keyrings
            .get(tenant)
            .ok_or_else(|| KeyError::NoActiveKey {
                tenant: tenant.to_string(),
            })?;
        let mut ring = write_lock(entry.value());

        let old_fingerprint = ring.active.take().ok_or_else(|| KeyError::NoActiveKey {
            tenant: tenant.to_string(),
        })?;

        if let Some(old) = ring.find_mut(&old_fingerprint) {
            old.handle.status = KeyStatus::Expired;
            old.handle.not_after = Some(Timestamp::now());
            old.pair = None; // drops and zeroizes the secret
        }

        let handle = Self::install_key(&mut ring, tenant);
        self.tenant_by_fingerprint
            .insert(handle.fingerprint, tenant.clone());

        tracing::info!(
            tenant = %tenant,
            old = %old_fingerprint,
            new = %handle.fingerprint,
            reason = %reason,
            "rotated signing key"
        );
        Ok(handle)
    }

    /// Revoke a key, active or not.
    ///
    /// Reserved for compromise and administrative withdrawal, not routine
    /// rotation. Digests already signed by the key remain part of the
    /// chain; verification flags them with an informational anomaly.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownKey`] if the fingerprint was never issued
    /// to this tenant.
    pub fn revoke_key(
        &self,
        tenant: &TenantId,
        fingerprint: &Fingerprint,
        reason: RevocationReason,
    ) -> KeyResult<()> {
        let entry = self
            .keyrings
            .get(tenant)
            .ok_or_else(|| KeyError::UnknownKey {
                fingerprint: fingerprint.to_string(),
            })?;
        let mut ring = write_lock(entry.value());

        let key = ring
            .find_mut(fingerprint)
            .ok_or_else(|| KeyError::UnknownKey {
                fingerprint: fingerprint.to_string(),
            })?;

        key.handle.status = match reason {
            RevocationReason::Compromise => KeyStatus::Compromised,
            RevocationReason::Administrative => KeyStatus::Revoked,
        };
        if key.handle.not_after.is_none() {
            key.handle.not_after = Some(Timestamp::now());
        }
        key.pair = None;

        if ring.active == Some(*fingerprint) {
            ring.active = None;
        }

        tracing::warn!(tenant = %tenant, fingerprint = %fingerprint, reason = %reason, "revoked signing key");
        Ok(())
    }

    /// Sign bytes with the tenant's Active key.
    ///
    /// The Active key is snapshotted under the keyring read lock, fencing
    /// signing against concurrent rotation. The fingerprint of the key that
    /// actually signed is returned with the signature so the caller can
    /// attribute the digest across rotation boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::NoActiveKey`] if the tenant has no Active key.
    pub fn sign(&self, tenant: &TenantId, message: &[u8]) -> KeyResult<(Signature, Fingerprint)> {
        let no_active = || KeyError::NoActiveKey {
            tenant: tenant.to_string(),
        };

        let entry = self.keyrings.get(tenant).ok_or_else(no_active)?;
        let ring = read_lock(entry.value());

        let fingerprint = ring.active.ok_or_else(no_active)?;
        let pair = ring
            .find(&fingerprint)
            .and_then(|k| k.pair.as_ref())
            .ok_or_else(no_active)?;

        Ok((pair.sign(message), fingerprint))
    }

    /// Look up the public key for any fingerprint ever issued.
    ///
    /// Works for Expired, Revoked and Compromised keys; historical
    /// verification depends on it.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownKey`] if the fingerprint was never issued.
    pub fn get_public_key(&self, fingerprint: &Fingerprint) -> KeyResult<PublicKey> {
        self.with_key(fingerprint, |key| key.public_key)
    }

    /// Current lifecycle status of a key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownKey`] if the fingerprint was never issued.
    pub fn key_status(&self, fingerprint: &Fingerprint) -> KeyResult<KeyStatus> {
        self.with_key(fingerprint, |key| key.handle.status)
    }

    /// All keys ever issued to a tenant, in issuance order.
    #[must_use]
    pub fn list_keys(&self, tenant: &TenantId) -> Vec<KeyHandle> {
        self.keyrings.get(tenant).map_or_else(Vec::new, |entry| {
            read_lock(entry.value())
                .keys
                .iter()
                .map(|k| k.handle.clone())
                .collect()
        })
    }

    /// Whether the tenant's Active key is due for rotation under the
    /// configured policy. Intended for the external rotation scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::NoActiveKey`] if the tenant has no Active key.
    pub fn rotation_due(&self, tenant: &TenantId, now: Timestamp) -> KeyResult<bool> {
        let no_active = || KeyError::NoActiveKey {
            tenant: tenant.to_string(),
        };

        let entry = self.keyrings.get(tenant).ok_or_else(no_active)?;
        let ring = read_lock(entry.value());
        let fingerprint = ring.active.ok_or_else(no_active)?;
        let key = ring.find(&fingerprint).ok_or_else(no_active)?;

        Ok(self
            .policy
            .rotation_due(ring.tier, key.handle.not_before, now))
    }

    fn with_key<T>(
        &self,
        fingerprint: &Fingerprint,
        f: impl FnOnce(&StoredKey) -> T,
    ) -> KeyResult<T> {
        let unknown = || KeyError::UnknownKey {
            fingerprint: fingerprint.to_string(),
        };

        let tenant = self
            .tenant_by_fingerprint
            .get(fingerprint)
            .ok_or_else(unknown)?;
        let entry = self.keyrings.get(tenant.value()).ok_or_else(unknown)?;
        let ring = read_lock(entry.value());
        let key = ring.find(fingerprint).ok_or_else(unknown)?;
        Ok(f(key))
    }

    /// Generate a fresh pair and make it the ring's Active key.
    fn install_key(ring: &mut TenantKeyring, tenant: &TenantId) -> KeyHandle {
        let pair = SigningKeyPair::generate();
        let public_key = pair.public_key();
        let fingerprint = public_key.fingerprint();

        let handle = KeyHandle {
            tenant: tenant.clone(),
            fingerprint,
            algorithm: SignatureAlgorithm::Ed25519,
            status: KeyStatus::Active,
            not_before: Timestamp::now(),
            not_after: None,
        };

        ring.keys.push(StoredKey {
            handle: handle.clone(),
            public_key,
            pair: Some(pair),
        });
        ring.active = Some(fingerprint);

        handle
    }
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("tenants", &self.keyrings.len())
            .field("keys", &self.tenant_by_fingerprint.len())
            .finish_non_exhaustive()
    }
}

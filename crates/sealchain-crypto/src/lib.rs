//! Sealchain Crypto - Cryptographic primitives for the audit digest chain.
//!
//! This crate provides:
//! - Algorithm-tagged BLAKE3 digest hashes with a well-known genesis value
//! - Ed25519 key pairs with secure memory handling
//! - Signatures and public-key fingerprints
//!
//! Every hash carries its algorithm identifier so a future algorithm
//! migration can coexist with historical records instead of invalidating
//! them.
//!
//! # Example
//!
//! ```
//! use sealchain_crypto::{DigestHash, SigningKeyPair};
//!
//! let keypair = SigningKeyPair::generate();
//!
//! let payload = b"audit event payload";
//! let hash = DigestHash::hash(payload);
//!
//! let signature = keypair.sign(hash.as_bytes());
//! assert!(keypair.public_key().verify(hash.as_bytes(), &signature).is_ok());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod hash;
mod keypair;
mod signature;

pub use error::{CryptoError, CryptoResult};
pub use hash::{DigestHash, HASH_LEN, HashAlgorithm};
pub use keypair::{FINGERPRINT_LEN, Fingerprint, PublicKey, SigningKeyPair};
pub use signature::Signature;

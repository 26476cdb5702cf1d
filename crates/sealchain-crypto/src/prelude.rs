//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sealchain_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Hashing
pub use crate::{DigestHash, HashAlgorithm};

// Keys and signatures
pub use crate::{Fingerprint, PublicKey, Signature, SigningKeyPair};

//! Nonce values and the sources that produce them.
//!
//! Signing draws a fresh nonce from a [`NonceSource`]. Production code uses
//! [`RandomNonce`]; deterministic test vectors substitute a [`FixedNonce`].

use std::fmt;

use crate::error::SignatureError;

/// Number of random bytes in a generated nonce.
pub const NONCE_LEN: usize = 64;

/// A hex-encoded nonce.
///
/// Generated nonces are always [`NONCE_LEN`] bytes (128 hex characters). Parsed
/// nonces only need to be valid hex; their length is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    /// Build a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse a hex-encoded nonce.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidHeader`] if the value is not valid hex.
    pub fn from_hex(value: &str) -> Result<Self, SignatureError> {
        hex::decode(value).map_err(|_| SignatureError::InvalidHeader)?;
        Ok(Self(value.to_owned()))
    }

    /// The hex representation, as carried on the wire.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// The decoded bytes that enter the canonical message.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        // Validated on construction.
        hex::decode(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of nonces for the signer.
///
/// Implementations must be safe to share across concurrent signing calls.
pub trait NonceSource: Send + Sync {
    /// Produce the nonce for one signature.
    fn generate_nonce(&self) -> Nonce;
}

/// Cryptographically random nonces from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn generate_nonce(&self) -> Nonce {
        let bytes: [u8; NONCE_LEN] = rand::random();
        Nonce::from_bytes(&bytes)
    }
}

/// Always returns the same nonce.
///
/// # Examples
///
/// ```
/// use ss1_auth::nonce::{FixedNonce, NonceSource};
///
/// let source = FixedNonce::zeroed();
/// assert_eq!(source.generate_nonce().as_hex(), "0".repeat(128));
/// ```
#[derive(Debug, Clone)]
pub struct FixedNonce(Nonce);

impl FixedNonce {
    /// Create a source that always yields `nonce`.
    #[must_use]
    pub fn new(nonce: Nonce) -> Self {
        Self(nonce)
    }

    /// A source yielding [`NONCE_LEN`] zero bytes.
    #[must_use]
    pub fn zeroed() -> Self {
        Self(Nonce::from_bytes(&[0u8; NONCE_LEN]))
    }
}

impl NonceSource for FixedNonce {
    fn generate_nonce(&self) -> Nonce {
        self.0.clone()
    }
}

//! SS1 request signing and verification.
//!
//! SS1 is a stateless HTTP request-signing scheme. A client proves it holds the
//! shared secret behind a key id by sending
//!
//! ```text
//! Authorization: ss1 keyid=<key id>, hash=<HMAC-SHA512 hex>, nonce=<hex>
//! ```
//!
//! where the hash covers the nonce, method, path, body and date of the request.
//! The server resolves the secret out-of-band, recomputes the hash and compares.
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use ss1_auth::{StaticKeyLookup, generate, verify};
//!
//! # tokio_test::block_on(async {
//! let date = Utc::now().to_rfc3339();
//! let header = generate("my key id", "my secret key", "POST", "/endpoint", "the payload", &date)
//!     .await
//!     .unwrap();
//!
//! let lookup = StaticKeyLookup::new(vec![("my key id".to_owned(), "my secret key".to_owned())]);
//! let key_id = verify(&header, "POST", "/endpoint", "the payload", &date, &lookup)
//!     .await
//!     .unwrap();
//! assert_eq!(key_id, "my key id");
//! # });
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical message construction
//! - [`config`] - Verifier configuration
//! - [`credentials`] - Credentials and the key lookup collaborator
//! - [`error`] - Error types
//! - [`header`] - Header serialization and strict parsing
//! - [`http`] - Signing and verifying `http` requests
//! - [`nonce`] - Nonces and injectable nonce sources
//! - [`payload`] - Payload normalization
//! - [`signer`] - Header generation
//! - [`verifier`] - Header verification

pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod header;
pub mod http;
pub mod nonce;
pub mod payload;
pub mod signer;
pub mod verifier;

pub use canonical::build_canonical_message;
pub use config::VerifierConfig;
pub use credentials::{Credential, FnKeyLookup, KeyLookup, StaticKeyLookup, key_lookup_fn};
pub use error::{SignatureError, SignatureResult, TimeSkewError};
pub use header::AuthorizationHeader;
pub use nonce::{FixedNonce, Nonce, NonceSource, RandomNonce};
pub use payload::Payload;
pub use signer::{Signer, SigningRequest, compute_hash};
pub use verifier::{Verifier, check_time_skew, parse_date};

/// Generate an SS1 header with a random nonce.
///
/// # Errors
///
/// See [`Signer::sign`].
pub async fn generate<'a>(
    key_id: &str,
    secret_key: &str,
    method: &'a str,
    path: &'a str,
    payload: impl Into<Payload<'a>>,
    date: &'a str,
) -> SignatureResult<String> {
    Signer::new()
        .sign(
            &Credential::new(key_id, secret_key),
            SigningRequest::new(method, path, payload, date),
        )
        .await
}

/// Verify an SS1 header with the default configuration, returning the key id.
///
/// # Errors
///
/// See [`Verifier::verify`].
pub async fn verify<'a, K>(
    header: &str,
    method: &'a str,
    path: &'a str,
    payload: impl Into<Payload<'a>>,
    date: &'a str,
    key_lookup: &K,
) -> SignatureResult<String>
where
    K: KeyLookup + ?Sized,
{
    Verifier::default()
        .verify(
            header,
            SigningRequest::new(method, path, payload, date),
            key_lookup,
        )
        .await
}

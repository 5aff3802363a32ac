//! SS1 header generation.
//!
//! Signing a request:
//!
//! 1. Validate the credential (non-empty key id and secret, no `,` in the key id).
//! 2. Draw a nonce from the [`NonceSource`].
//! 3. Normalize the payload into bytes.
//! 4. Build the canonical message and compute `HMAC-SHA512(secret, message)`.
//! 5. Encode `ss1 keyid=<id>, hash=<digest>, nonce=<nonce>`.

use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha512;
use tracing::debug;

use crate::canonical::build_canonical_message;
use crate::credentials::Credential;
use crate::error::SignatureError;
use crate::header::AuthorizationHeader;
use crate::nonce::{Nonce, NonceSource, RandomNonce};
use crate::payload::Payload;

type HmacSha512 = Hmac<Sha512>;

/// The parts of an HTTP request covered by the signature.
#[derive(Debug)]
pub struct SigningRequest<'a> {
    /// HTTP method token, e.g. `POST`.
    pub method: &'a str,
    /// Request path, e.g. `/endpoint`.
    pub path: &'a str,
    /// Request body.
    pub payload: Payload<'a>,
    /// Date string, used byte-for-byte.
    pub date: &'a str,
}

impl<'a> SigningRequest<'a> {
    /// Bundle the request parts.
    pub fn new(
        method: &'a str,
        path: &'a str,
        payload: impl Into<Payload<'a>>,
        date: &'a str,
    ) -> Self {
        Self {
            method,
            path,
            payload: payload.into(),
            date,
        }
    }
}

/// Produces SS1 headers.
///
/// The nonce source is injected so deterministic vectors can be produced with a
/// [`FixedNonce`](crate::nonce::FixedNonce).
///
/// # Examples
///
/// ```
/// use ss1_auth::{Credential, Signer, SigningRequest};
///
/// # tokio_test::block_on(async {
/// let signer = Signer::new();
/// let credential = Credential::new("my key id", "my secret key");
/// let request = SigningRequest::new("POST", "/endpoint", "the payload", "2011-10-07T21:33:17.289Z");
/// let header = signer
///     .sign(&credential, request)
///     .await
///     .unwrap();
/// assert!(header.starts_with("ss1 keyid=my key id, hash="));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signer<N = RandomNonce> {
    nonce_source: N,
}

impl Signer<RandomNonce> {
    /// A signer using cryptographically random nonces.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nonce_source: RandomNonce,
        }
    }
}

impl<N: NonceSource> Signer<N> {
    /// A signer drawing nonces from `nonce_source`.
    pub fn with_nonce_source(nonce_source: N) -> Self {
        Self { nonce_source }
    }

    /// Sign `request` with `credential` and return the header value.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidInput`] if the key id or secret is empty or the
    /// key id contains `,`, and [`SignatureError::Payload`] if the payload cannot be
    /// read.
    pub async fn sign(
        &self,
        credential: &Credential,
        request: SigningRequest<'_>,
    ) -> Result<String, SignatureError> {
        validate_credential(credential)?;

        let nonce = self.nonce_source.generate_nonce();
        let payload = request.payload.normalize().await?;

        debug!(
            key_id = credential.key_id(),
            method = request.method,
            path = request.path,
            payload_len = payload.len(),
            "Signing request"
        );

        let hash = compute_hash(
            credential.secret_key(),
            &nonce,
            request.method,
            request.path,
            &payload,
            request.date,
        );

        Ok(AuthorizationHeader {
            key_id: credential.key_id().to_owned(),
            hash,
            nonce,
        }
        .to_string())
    }
}

/// Compute the hex-encoded `HMAC-SHA512` over the canonical message.
///
/// The result is 128 lowercase hex characters.
#[must_use]
pub fn compute_hash(
    secret_key: &str,
    nonce: &Nonce,
    method: &str,
    path: &str,
    payload: &[u8],
    date: &str,
) -> String {
    let message = build_canonical_message(nonce, method, path, payload, date);
    let mut mac = HmacSha512::new_from_slice(secret_key.as_bytes())
        .expect("HMAC can accept keys of any length");
    mac.update(&message);
    hex::encode(mac.finalize().into_bytes())
}

fn validate_credential(credential: &Credential) -> Result<(), SignatureError> {
    if credential.key_id().is_empty() {
        return Err(SignatureError::InvalidInput("key id must not be empty"));
    }
    if credential.key_id().contains(',') {
        return Err(SignatureError::InvalidInput("key id must not contain ','"));
    }
    if credential.secret_key().is_empty() {
        return Err(SignatureError::InvalidInput("secret key must not be empty"));
    }
    Ok(())
}

//! Canonical message construction for SS1.
//!
//! The signing input is the byte-exact concatenation of:
//!
//! ```text
//! hex_decode(nonce) || method || path || payload || date
//! ```
//!
//! There are no delimiters between the components. The message is only ever fed
//! into the keyed hash and never parsed back. The date is used exactly as supplied;
//! signer and verifier must use byte-identical date strings.

use crate::nonce::Nonce;

/// Build the canonical signing input.
///
/// # Examples
///
/// ```
/// use ss1_auth::canonical::build_canonical_message;
/// use ss1_auth::nonce::Nonce;
///
/// let nonce = Nonce::from_hex("00ff").unwrap();
/// let message = build_canonical_message(&nonce, "GET", "/a", b"", "d");
/// assert_eq!(message, b"\x00\xffGET/ad");
/// ```
#[must_use]
pub fn build_canonical_message(
    nonce: &Nonce,
    method: &str,
    path: &str,
    payload: &[u8],
    date: &str,
) -> Vec<u8> {
    let nonce = nonce.to_bytes();
    let mut message =
        Vec::with_capacity(nonce.len() + method.len() + path.len() + payload.len() + date.len());
    message.extend_from_slice(&nonce);
    message.extend_from_slice(method.as_bytes());
    message.extend_from_slice(path.as_bytes());
    message.extend_from_slice(payload);
    message.extend_from_slice(date.as_bytes());
    message
}

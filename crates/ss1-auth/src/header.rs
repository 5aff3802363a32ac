//! The SS1 `Authorization` header value.
//!
//! Wire format:
//!
//! ```text
//! ss1 keyid=<key id>, hash=<128 hex chars>, nonce=<hex chars>
//! ```
//!
//! The value may be embedded in a full header line such as
//! `Authorization: ss1 keyid=...`; the `<name>: ` prefix is stripped before parsing.
//! Parsing is strict: the value must carry exactly the `keyid`, `hash` and `nonce`
//! fields, each once.

use std::fmt;
use std::str::FromStr;

use crate::error::SignatureError;
use crate::nonce::Nonce;

/// The scheme tag that starts every header value.
pub const SCHEME: &str = "ss1";

/// A parsed SS1 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// The key identifier the request claims to be signed with.
    pub key_id: String,
    /// The hex-encoded HMAC-SHA512 digest.
    pub hash: String,
    /// The nonce mixed into the canonical message.
    pub nonce: Nonce,
}

impl AuthorizationHeader {
    /// Parse a header value, optionally preceded by a `<name>: ` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidHeader`] if the scheme tag is missing, a field
    /// has no `=`, a field is repeated or unknown, a required field is missing, or the
    /// nonce is not valid hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use ss1_auth::header::AuthorizationHeader;
    ///
    /// let header = AuthorizationHeader::parse(
    ///     "Authorization: ss1 nonce=00ff, keyid=my key id, hash=abcd",
    /// ).unwrap();
    /// assert_eq!(header.key_id, "my key id");
    /// assert_eq!(header.hash, "abcd");
    /// assert_eq!(header.nonce.as_hex(), "00ff");
    /// ```
    pub fn parse(value: &str) -> Result<Self, SignatureError> {
        let value = strip_header_name(value);
        let fields = value
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or(SignatureError::InvalidHeader)?;

        let mut key_id = None;
        let mut hash = None;
        let mut nonce = None;

        for (i, token) in fields.split(',').enumerate() {
            // Separator is `,` followed by optional whitespace.
            let token = if i == 0 { token } else { token.trim_start() };
            let (name, value) = token.split_once('=').ok_or(SignatureError::InvalidHeader)?;
            let slot = match name {
                "keyid" => &mut key_id,
                "hash" => &mut hash,
                "nonce" => &mut nonce,
                _ => return Err(SignatureError::InvalidHeader),
            };
            if slot.replace(value).is_some() {
                return Err(SignatureError::InvalidHeader);
            }
        }

        match (key_id, hash, nonce) {
            (Some(key_id), Some(hash), Some(nonce)) => Ok(Self {
                key_id: key_id.to_owned(),
                hash: hash.to_owned(),
                nonce: Nonce::from_hex(nonce)?,
            }),
            _ => Err(SignatureError::InvalidHeader),
        }
    }
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME} keyid={}, hash={}, nonce={}",
            self.key_id, self.hash, self.nonce
        )
    }
}

impl FromStr for AuthorizationHeader {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Strip a leading `<name>: ` where `<name>` is non-empty and has no `:` or space.
fn strip_header_name(value: &str) -> &str {
    match value.split_once(": ") {
        Some((name, rest)) if !name.is_empty() && !name.contains([':', ' ']) => rest,
        _ => value,
    }
}

//! Error types for SS1 signing and verification.
//!
//! All failures are represented by [`SignatureError`]. Each variant maps to one
//! distinguishable failure mode so callers (typically an HTTP server) can decide
//! how to respond, e.g. with `401 Unauthorized`.

/// Reasons a request date is rejected by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeSkewError {
    /// The date string could not be parsed as a timestamp.
    #[error("Date format not valid.")]
    InvalidDate,

    /// The date is further from the current time than the allowed skew.
    #[error("Too big time difference.")]
    TooBigDifference,
}

/// Errors that can occur while signing or verifying an SS1 header.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The call arguments are malformed (empty key id or secret, etc.).
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    /// The payload stream failed while it was being drained.
    #[error("Error when reading payload: {0}")]
    Payload(#[source] std::io::Error),

    /// The header is unparseable or does not carry exactly `keyid`, `hash` and `nonce`.
    #[error("Wrong header format.")]
    InvalidHeader,

    /// The request date is unparseable or outside the allowed window.
    #[error(transparent)]
    TimeSkew(#[from] TimeSkewError),

    /// The key lookup collaborator failed. Display and source are the collaborator's.
    #[error(transparent)]
    KeyLookup(anyhow::Error),

    /// The key lookup succeeded but returned no usable secret for this key id.
    #[error("No such key: {0}")]
    NoSuchKey(String),

    /// The recomputed hash does not equal the one carried by the header.
    #[error("Hash does not match.")]
    HashMismatch,
}

/// Convenience result type for SS1 operations.
pub type SignatureResult<T> = Result<T, SignatureError>;

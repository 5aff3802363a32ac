//! Integration tests for SS1 request signing.
//!
//! These tests exercise the public API of `ss1-auth` end to end: signing,
//! verification, payload representations and the `http` helpers.
//!
//! Run them with:
//! ```text
//! cargo test -p ss1-integration
//! ```

use std::sync::Once;

use chrono::{SecondsFormat, Utc};
use ss1_auth::{FixedNonce, Signer, StaticKeyLookup};

static INIT: Once = Once::new();

/// Key id used across the tests.
pub const KEY_ID: &str = "my key id";

/// Secret matching [`KEY_ID`].
pub const SECRET_KEY: &str = "my secret key";

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A key lookup that knows [`KEY_ID`].
#[must_use]
pub fn test_key_lookup() -> StaticKeyLookup {
    init_tracing();
    StaticKeyLookup::new(vec![(KEY_ID.to_owned(), SECRET_KEY.to_owned())])
}

/// A signer whose nonce is 64 zero bytes.
#[must_use]
pub fn fixed_signer() -> Signer<FixedNonce> {
    init_tracing();
    Signer::with_nonce_source(FixedNonce::zeroed())
}

/// The current time as an RFC 3339 date string with millisecond precision.
#[must_use]
pub fn now_date() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod test_roundtrip;

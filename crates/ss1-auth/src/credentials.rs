//! Credentials and key lookup.
//!
//! The verifier never stores secrets. It asks a [`KeyLookup`] collaborator for the
//! secret belonging to the key id carried by the header. [`StaticKeyLookup`] is an
//! in-memory implementation for tests and development; [`key_lookup_fn`] adapts an
//! async closure.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

/// A key id and its shared secret.
///
/// The secret is redacted from the `Debug` output.
#[derive(Clone)]
pub struct Credential {
    key_id: String,
    secret_key: String,
}

impl Credential {
    /// Create a credential.
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The public key identifier.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The shared secret.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Resolves a key id to its shared secret.
///
/// Called exactly once per verification. Return `Ok(None)` (or an empty secret)
/// when the key id is unknown, and `Err` when the lookup itself failed; the error
/// is handed back to the caller of `verify` unchanged.
#[async_trait::async_trait]
pub trait KeyLookup: Send + Sync {
    /// Look up the secret for `key_id`.
    async fn secret_key(&self, key_id: &str) -> anyhow::Result<Option<String>>;
}

/// An in-memory key lookup backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use ss1_auth::credentials::{KeyLookup, StaticKeyLookup};
///
/// let lookup = StaticKeyLookup::new(vec![
///     ("my key id".to_owned(), "my secret key".to_owned()),
/// ]);
///
/// # tokio_test::block_on(async {
/// let secret = lookup.secret_key("my key id").await.unwrap();
/// assert_eq!(secret.as_deref(), Some("my secret key"));
/// # });
/// ```
#[derive(Clone, Default)]
pub struct StaticKeyLookup {
    keys: HashMap<String, String>,
}

impl StaticKeyLookup {
    /// Create a lookup from `(key_id, secret_key)` pairs.
    pub fn new(keys: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl fmt::Debug for StaticKeyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticKeyLookup")
            .field("key_ids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait::async_trait]
impl KeyLookup for StaticKeyLookup {
    async fn secret_key(&self, key_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.keys.get(key_id).cloned())
    }
}

/// A [`KeyLookup`] backed by an async closure. Build one with [`key_lookup_fn`].
#[derive(Clone)]
pub struct FnKeyLookup<F>(F);

impl<F> fmt::Debug for FnKeyLookup<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnKeyLookup(..)")
    }
}

/// Adapt an async closure taking the key id into a [`KeyLookup`].
///
/// # Examples
///
/// ```
/// use ss1_auth::credentials::{KeyLookup, key_lookup_fn};
///
/// let lookup = key_lookup_fn(|key_id: String| async move {
///     Ok::<_, anyhow::Error>((key_id == "admin").then(|| "hunter2".to_owned()))
/// });
///
/// # tokio_test::block_on(async {
/// assert!(lookup.secret_key("admin").await.unwrap().is_some());
/// assert!(lookup.secret_key("guest").await.unwrap().is_none());
/// # });
/// ```
pub fn key_lookup_fn<F, Fut>(f: F) -> FnKeyLookup<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    FnKeyLookup(f)
}

#[async_trait::async_trait]
impl<F, Fut> KeyLookup for FnKeyLookup<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    async fn secret_key(&self, key_id: &str) -> anyhow::Result<Option<String>> {
        (self.0)(key_id.to_owned()).await
    }
}

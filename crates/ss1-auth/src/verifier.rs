//! SS1 header verification.
//!
//! This module implements the verification flow:
//!
//! 1. Parse the header into its `keyid`, `hash` and `nonce` fields.
//! 2. Parse the request date and reject it if it is too far from the current time.
//! 3. Resolve the secret through the [`KeyLookup`] collaborator while the payload is
//!    normalized; both must finish before continuing.
//! 4. Recompute the HMAC-SHA512 digest with the header's nonce.
//! 5. Compare the digests in constant time.
//!
//! There is no replay cache: a captured header stays valid for the whole skew
//! window.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::config::VerifierConfig;
use crate::credentials::KeyLookup;
use crate::error::{SignatureError, TimeSkewError};
use crate::header::AuthorizationHeader;
use crate::signer::{SigningRequest, compute_hash};

/// Verifies SS1 headers.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use ss1_auth::{Credential, Signer, SigningRequest, StaticKeyLookup, Verifier};
///
/// # tokio_test::block_on(async {
/// let date = Utc::now().to_rfc3339();
/// let header = Signer::new()
///     .sign(
///         &Credential::new("my key id", "my secret key"),
///         SigningRequest::new("POST", "/endpoint", "the payload", &date),
///     )
///     .await
///     .unwrap();
///
/// let lookup = StaticKeyLookup::new(vec![("my key id".to_owned(), "my secret key".to_owned())]);
/// let key_id = Verifier::default()
///     .verify(&header, SigningRequest::new("POST", "/endpoint", "the payload", &date), &lookup)
///     .await
///     .unwrap();
/// assert_eq!(key_id, "my key id");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    /// Create a verifier with the given configuration.
    #[must_use]
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify `header` against `request`, returning the authenticated key id.
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] if:
    /// - the header is malformed ([`SignatureError::InvalidHeader`])
    /// - the date is unparseable or outside the window ([`SignatureError::TimeSkew`])
    /// - the key lookup fails ([`SignatureError::KeyLookup`]) or finds no secret
    ///   ([`SignatureError::NoSuchKey`])
    /// - the payload cannot be read ([`SignatureError::Payload`])
    /// - the hash does not match ([`SignatureError::HashMismatch`])
    pub async fn verify<K>(
        &self,
        header: &str,
        request: SigningRequest<'_>,
        key_lookup: &K,
    ) -> Result<String, SignatureError>
    where
        K: KeyLookup + ?Sized,
    {
        self.verify_at(header, request, key_lookup, Utc::now()).await
    }

    /// Like [`verify`](Self::verify), measuring the time skew against `now`.
    pub async fn verify_at<K>(
        &self,
        header: &str,
        request: SigningRequest<'_>,
        key_lookup: &K,
        now: DateTime<Utc>,
    ) -> Result<String, SignatureError>
    where
        K: KeyLookup + ?Sized,
    {
        let parsed = AuthorizationHeader::parse(header)?;

        check_time_skew(request.date, now, self.config.max_clock_skew())?;

        let SigningRequest {
            method,
            path,
            payload,
            date,
        } = request;

        debug!(key_id = %parsed.key_id, method, path, "Verifying SS1 signature");

        let (secret_key, payload) = futures::join!(
            resolve_secret(key_lookup, &parsed.key_id),
            payload.normalize()
        );
        let secret_key = secret_key?;
        let payload = payload?;

        let expected = compute_hash(&secret_key, &parsed.nonce, method, path, &payload, date);

        if parsed.hash.as_bytes().ct_eq(expected.as_bytes()).into() {
            debug!(key_id = %parsed.key_id, "Signature verification succeeded");
            Ok(parsed.key_id)
        } else {
            debug!(key_id = %parsed.key_id, provided = %parsed.hash, "Hash mismatch");
            Err(SignatureError::HashMismatch)
        }
    }
}

/// Parse a request date.
///
/// Accepted forms, tried in order:
/// - RFC 3339, e.g. `2011-10-07T21:33:17.289Z`
/// - RFC 2822, which covers the HTTP `Date` format
/// - ISO date-time without an offset, e.g. `2011-10-07T21:33:17.289`, read as UTC
/// - ISO date only, e.g. `2011-10-07`, read as UTC midnight
/// - JavaScript `Date.prototype.toString()` output, e.g.
///   `Fri Oct 07 2011 21:33:17 GMT+0000 (Coordinated Universal Time)`
///
/// # Errors
///
/// Returns [`TimeSkewError::InvalidDate`] if no format matches.
///
/// # Examples
///
/// ```
/// use ss1_auth::verifier::parse_date;
///
/// let iso = parse_date("2011-10-07T21:33:17.289Z").unwrap();
/// assert_eq!(iso.timestamp_millis(), 1_318_023_197_289);
///
/// let http = parse_date("Fri, 07 Oct 2011 21:33:17 GMT").unwrap();
/// assert_eq!(http.timestamp(), 1_318_023_197);
/// ```
pub fn parse_date(date: &str) -> Result<DateTime<Utc>, TimeSkewError> {
    DateTime::parse_from_rfc3339(date)
        .or_else(|_| DateTime::parse_from_rfc2822(date))
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| parse_ecmascript_date(date))
        .map_err(|_| TimeSkewError::InvalidDate)
}

fn parse_ecmascript_date(date: &str) -> chrono::ParseResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        })
        .or_else(|_| {
            // The parenthesized zone name after the offset is informational.
            let trimmed = date.split_once(" (").map_or(date, |(head, _)| head);
            DateTime::parse_from_str(trimmed, "%a %b %d %Y %H:%M:%S GMT%z")
                .map(|parsed| parsed.with_timezone(&Utc))
        })
}

/// Check that `date` is within `max_skew` of `now`, in either direction.
///
/// # Errors
///
/// Returns [`TimeSkewError::InvalidDate`] if the date cannot be parsed and
/// [`TimeSkewError::TooBigDifference`] if it is outside the window.
pub fn check_time_skew(
    date: &str,
    now: DateTime<Utc>,
    max_skew: TimeDelta,
) -> Result<DateTime<Utc>, TimeSkewError> {
    let timestamp = parse_date(date)?;
    if (timestamp - now).abs() > max_skew {
        debug!(%timestamp, %now, "Request date outside the allowed window");
        return Err(TimeSkewError::TooBigDifference);
    }
    Ok(timestamp)
}

/// Ask the collaborator for the secret, treating an empty secret as absent.
async fn resolve_secret<K>(key_lookup: &K, key_id: &str) -> Result<String, SignatureError>
where
    K: KeyLookup + ?Sized,
{
    match key_lookup
        .secret_key(key_id)
        .await
        .map_err(SignatureError::KeyLookup)?
    {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(SignatureError::NoSuchKey(key_id.to_owned())),
    }
}

//! Helpers for signing and verifying `http` requests.
//!
//! The signature covers the method, the path including the query string, the body
//! and the `Date` header. The SS1 value travels in the `Authorization` header.

use http::HeaderValue;
use http::header::{AUTHORIZATION, DATE};
use http::request::Parts;
use tracing::debug;

use crate::credentials::{Credential, KeyLookup};
use crate::error::{SignatureError, TimeSkewError};
use crate::nonce::NonceSource;
use crate::payload::Payload;
use crate::signer::{Signer, SigningRequest};
use crate::verifier::Verifier;

/// Sign `request` in place, inserting the `Authorization` header.
///
/// The request must already carry a `Date` header; its value is signed verbatim.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidInput`] if the `Date` header is missing or not
/// UTF-8, or the resulting header value is not a valid HTTP header value, plus any
/// error from [`Signer::sign`].
///
/// # Examples
///
/// ```
/// use ss1_auth::{Credential, Payload, Signer};
/// use ss1_auth::http::sign_request;
///
/// # tokio_test::block_on(async {
/// let mut request = http::Request::builder()
///     .method("POST")
///     .uri("/endpoint?page=2")
///     .header("date", "Fri, 07 Oct 2011 21:33:17 GMT")
///     .body(())
///     .unwrap();
///
/// let credential = Credential::new("my key id", "my secret key");
/// sign_request(&Signer::new(), &credential, &mut request, Payload::from("the payload"))
///     .await
///     .unwrap();
/// assert!(request.headers()["authorization"].to_str().unwrap().starts_with("ss1 "));
/// # });
/// ```
pub async fn sign_request<N, B>(
    signer: &Signer<N>,
    credential: &Credential,
    request: &mut http::Request<B>,
    payload: Payload<'_>,
) -> Result<(), SignatureError>
where
    N: NonceSource,
{
    let date = request
        .headers()
        .get(DATE)
        .ok_or(SignatureError::InvalidInput("missing Date header"))?
        .to_str()
        .map_err(|_| SignatureError::InvalidInput("Date header is not valid UTF-8"))?
        .to_owned();
    let method = request.method().as_str().to_owned();
    let path = request_path(request.uri());

    let header = signer
        .sign(
            credential,
            SigningRequest::new(&method, &path, payload, &date),
        )
        .await?;
    let value = HeaderValue::from_str(&header)
        .map_err(|_| SignatureError::InvalidInput("key id is not a valid header value"))?;
    request.headers_mut().insert(AUTHORIZATION, value);

    Ok(())
}

/// Verify the SS1 `Authorization` header of a request, returning the key id.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidHeader`] if the `Authorization` header is missing
/// or not UTF-8, [`SignatureError::TimeSkew`] if the `Date` header is missing, plus
/// any error from [`Verifier::verify`].
pub async fn verify_request<K>(
    verifier: &Verifier,
    parts: &Parts,
    payload: Payload<'_>,
    key_lookup: &K,
) -> Result<String, SignatureError>
where
    K: KeyLookup + ?Sized,
{
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(SignatureError::InvalidHeader)?
        .to_str()
        .map_err(|_| SignatureError::InvalidHeader)?;
    let date = parts
        .headers
        .get(DATE)
        .and_then(|value| value.to_str().ok())
        .ok_or(TimeSkewError::InvalidDate)?;
    let path = request_path(&parts.uri);

    debug!(method = %parts.method, path, "Verifying SS1 request");

    verifier
        .verify(
            header,
            SigningRequest::new(parts.method.as_str(), &path, payload, date),
            key_lookup,
        )
        .await
}

/// The signed path: path plus query string, as sent on the wire.
fn request_path(uri: &http::Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned())
}

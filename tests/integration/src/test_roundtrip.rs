//! Sign-then-verify integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, SecondsFormat, Utc};
    use ss1_auth::{
        Credential, SignatureError, SigningRequest, StaticKeyLookup, TimeSkewError, Verifier,
        generate, key_lookup_fn, verify,
    };

    use crate::{KEY_ID, SECRET_KEY, fixed_signer, now_date, test_key_lookup};

    const HASH: &str = "afc7e506a3e77a55d64ad2744d0f7a02d3bd9128ef1bf5eff04620c4b6fdd4e4\
                        17b70893566edcef6ada6a4c5d76099c98bb06bfec5b93a1be793fdaba808ab9";

    #[derive(Debug, thiserror::Error)]
    #[error("credential store unavailable")]
    struct StoreUnavailable;

    #[tokio::test]
    async fn test_should_verify_headers_created_by_generate() {
        let lookup = test_key_lookup();
        let date = now_date();

        let header = generate(KEY_ID, SECRET_KEY, "POST", "/endpoint", "the payload", &date)
            .await
            .expect("generate");
        let key_id = verify(&header, "POST", "/endpoint", "the payload", &date, &lookup)
            .await
            .expect("verify");

        assert_eq!(key_id, KEY_ID);
    }

    #[tokio::test]
    async fn test_should_fail_when_secret_key_is_not_the_same() {
        let other =
            StaticKeyLookup::new(vec![(KEY_ID.to_owned(), "another secret key".to_owned())]);
        let date = now_date();

        let header = generate(KEY_ID, SECRET_KEY, "POST", "/endpoint", "the payload", &date)
            .await
            .expect("generate");
        let err = verify(&header, "POST", "/endpoint", "the payload", &date, &other)
            .await
            .unwrap_err();

        assert!(matches!(err, SignatureError::HashMismatch));
        assert_eq!(err.to_string(), "Hash does not match.");
    }

    #[tokio::test]
    async fn test_should_fail_when_payload_is_not_the_same() {
        let lookup = test_key_lookup();
        let date = now_date();

        let header = generate(KEY_ID, SECRET_KEY, "POST", "/endpoint", "the payload", &date)
            .await
            .expect("generate");
        let result =
            verify(&header, "POST", "/endpoint", "different payload", &date, &lookup).await;

        assert!(matches!(result, Err(SignatureError::HashMismatch)));
    }

    #[tokio::test]
    async fn test_should_fail_when_date_is_not_the_same() {
        let lookup = test_key_lookup();
        let now = Utc::now();
        let signed_date = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let other_date = (now + Duration::seconds(1)).to_rfc3339_opts(SecondsFormat::Millis, true);

        let header = generate(KEY_ID, SECRET_KEY, "POST", "/endpoint", "", &signed_date)
            .await
            .expect("generate");
        let result = verify(&header, "POST", "/endpoint", "", &other_date, &lookup).await;

        assert!(matches!(result, Err(SignatureError::HashMismatch)));
    }

    #[tokio::test]
    async fn test_should_fail_if_time_diff_is_more_than_24h() {
        let lookup = test_key_lookup();
        for offset in [Duration::hours(25), -Duration::hours(25)] {
            let date = (Utc::now() + offset).to_rfc3339_opts(SecondsFormat::Millis, true);
            let header = generate(KEY_ID, SECRET_KEY, "GET", "/", "", &date)
                .await
                .expect("generate");

            let err = verify(&header, "GET", "/", "", &date, &lookup)
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                SignatureError::TimeSkew(TimeSkewError::TooBigDifference)
            ));
            assert_eq!(err.to_string(), "Too big time difference.");
        }
    }

    #[tokio::test]
    async fn test_should_accept_http_date_within_window() {
        let lookup = test_key_lookup();
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let header = generate(KEY_ID, SECRET_KEY, "DELETE", "/items/1", "", &date)
            .await
            .expect("generate");
        let key_id = verify(&header, "DELETE", "/items/1", "", &date, &lookup)
            .await
            .expect("verify");

        assert_eq!(key_id, KEY_ID);
    }

    #[tokio::test]
    async fn test_should_accept_javascript_style_dates_within_window() {
        let lookup = test_key_lookup();
        let now = Utc::now();
        let dates = [
            now.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            now.format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
                .to_string(),
        ];

        for date in dates {
            let header = generate(KEY_ID, SECRET_KEY, "GET", "/status", "", &date)
                .await
                .expect("generate");
            tracing::info!(%date, "verifying");
            let key_id = verify(&header, "GET", "/status", "", &date, &lookup)
                .await
                .expect("verify");
            assert_eq!(key_id, KEY_ID);
        }
    }

    #[tokio::test]
    async fn test_should_fail_if_format_has_too_many_params() {
        let lookup = test_key_lookup();
        let header = format!(
            "ss1 keyid=my key id, realm=wtf, hash={HASH}, nonce={}",
            "0".repeat(128)
        );

        let err = verify(&header, "GET", "/", "", &now_date(), &lookup)
            .await
            .unwrap_err();

        assert!(matches!(err, SignatureError::InvalidHeader));
        assert_eq!(err.to_string(), "Wrong header format.");
    }

    #[tokio::test]
    async fn test_should_fail_if_not_all_params_are_in_the_string() {
        let lookup = test_key_lookup();
        let header = format!("ss1 keyid=my key id, hash={HASH}");

        let result = verify(&header, "GET", "/", "", &now_date(), &lookup).await;

        assert!(matches!(result, Err(SignatureError::InvalidHeader)));
    }

    #[tokio::test]
    async fn test_should_accept_full_header_line() {
        let lookup = test_key_lookup();
        let date = now_date();

        let header = generate(KEY_ID, SECRET_KEY, "PUT", "/endpoint", "body", &date)
            .await
            .expect("generate");
        let line = format!("Authorization: {header}");
        let key_id = verify(&line, "PUT", "/endpoint", "body", &date, &lookup)
            .await
            .expect("verify");

        assert_eq!(key_id, KEY_ID);
    }

    #[tokio::test]
    async fn test_should_pass_key_lookup_error_through() {
        let failing = key_lookup_fn(|_key_id: String| async move {
            Err::<Option<String>, _>(anyhow::Error::new(StoreUnavailable))
        });
        let date = now_date();

        let header = generate(KEY_ID, SECRET_KEY, "POST", "/endpoint", "the payload", &date)
            .await
            .expect("generate");
        let err = verify(&header, "POST", "/endpoint", "the payload", &date, &failing)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "credential store unavailable");
        match err {
            SignatureError::KeyLookup(source) => {
                assert!(source.downcast_ref::<StoreUnavailable>().is_some());
            }
            other => panic!("expected KeyLookup error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_fail_with_no_such_key_for_unknown_key_id() {
        let empty = StaticKeyLookup::default();
        let date = now_date();

        let header = generate(KEY_ID, SECRET_KEY, "POST", "/endpoint", "the payload", &date)
            .await
            .expect("generate");
        let result = verify(&header, "POST", "/endpoint", "the payload", &date, &empty).await;

        assert!(matches!(result, Err(SignatureError::NoSuchKey(ref id)) if id == KEY_ID));
    }

    #[tokio::test]
    async fn test_should_produce_golden_vector() {
        let header = fixed_signer()
            .sign(
                &Credential::new(KEY_ID, SECRET_KEY),
                SigningRequest::new("POST", "/endpoint", "the payload", "2011-10-07T21:33:17.289Z"),
            )
            .await
            .expect("sign");

        assert_eq!(
            header,
            format!(
                "ss1 keyid=my key id, \
                 hash=02a299bc24fbc3b6de2c6169a0e7f829ab85c590e992d82a5ce707d2721bee99\
                 6e0a03f1494d20782133abfcc46e6df7733592b22581d3f3952d6ceecb9ce065, \
                 nonce={}",
                "0".repeat(128)
            )
        );
    }

    #[tokio::test]
    async fn test_should_verify_concurrently_without_interference() {
        let lookup = Arc::new(test_key_lookup());
        let verifier = Arc::new(Verifier::default());
        let date = Arc::new(now_date());

        let mut handles = Vec::new();
        for i in 0..16 {
            let lookup = Arc::clone(&lookup);
            let verifier = Arc::clone(&verifier);
            let date = Arc::clone(&date);
            handles.push(tokio::spawn(async move {
                let path = format!("/items/{i}");
                let body = format!("payload {i}");
                let header = generate(KEY_ID, SECRET_KEY, "POST", &path, body.as_str(), &date)
                    .await
                    .expect("generate");
                verifier
                    .verify(
                        &header,
                        SigningRequest::new("POST", &path, body.as_str(), &date),
                        lookup.as_ref(),
                    )
                    .await
            }));
        }

        for handle in handles {
            let key_id = handle.await.expect("join").expect("verify");
            assert_eq!(key_id, KEY_ID);
        }
    }
}

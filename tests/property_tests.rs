//! Property tests for token classification and scanning.
//!
//! These tests check classifier invariants over generated tokens and make
//! sure scanning arbitrary traffic never panics.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jwt_discovery::{is_jwt, unwrap_bearer, Exchange, LocationType, ScanConfig, Scanner};
use proptest::prelude::*;

// Strategy: Generate a structurally valid compact JWS
fn arb_jwt() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("HS256"), Just("RS256"), Just("ES256"), Just("none")],
        prop::string::string_regex("[a-z0-9]{1,12}").unwrap(),
        prop::collection::vec(any::<u8>(), 0..48),
    )
        .prop_map(|(alg, sub, signature)| {
            let header = format!(r#"{{"alg":"{}","typ":"JWT"}}"#, alg);
            let payload = format!(r#"{{"sub":"{}"}}"#, sub);
            format!(
                "{}.{}.{}",
                URL_SAFE_NO_PAD.encode(header),
                URL_SAFE_NO_PAD.encode(payload),
                URL_SAFE_NO_PAD.encode(signature)
            )
        })
}

// Strategy: Generate header names, some of which have dedicated handlers
fn arb_header_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("authorization".to_string()),
        Just("Authorization".to_string()),
        Just("x-client".to_string()),
        Just("location".to_string()),
        prop::string::string_regex("x-[a-z]{1,8}").unwrap(),
    ]
}

proptest! {
    /// Property: Generated tokens are always classified as JWTs
    #[test]
    fn proptest_generated_tokens_classify(token in arb_jwt()) {
        prop_assert!(is_jwt(&token));
    }

    /// Property: Anything without exactly two dots is never a JWT
    #[test]
    fn proptest_wrong_segment_count_never_classifies(candidate in "[A-Za-z0-9_-]{0,64}(\\.[A-Za-z0-9_-]{0,32}){0,1}") {
        prop_assert!(!is_jwt(&candidate));
    }

    /// Property: Adding a fourth segment breaks classification
    #[test]
    fn proptest_extra_segment_never_classifies(token in arb_jwt(), extra in "[A-Za-z0-9_-]{0,16}") {
        let candidate = format!("{}.{}", token, extra);
        prop_assert!(!is_jwt(&candidate));
    }

    /// Property: A token in a query parameter is found under its parameter name
    #[test]
    fn proptest_query_token_is_found(
        token in arb_jwt(),
        key in prop::string::string_regex("[a-z_]{1,12}").unwrap()
    ) {
        let exchange = Exchange::new("req", format!("https://x.test/cb?{}={}", key, token));
        let findings = Scanner::new().scan(&exchange);

        prop_assert_eq!(findings.len(), 1);
        prop_assert_eq!(findings[0].location_type(), LocationType::QueryString);
        prop_assert_eq!(findings[0].name(), key.as_str());
        prop_assert_eq!(findings[0].value(), token.as_str());
    }

    /// Property: Bearer unwrapping recovers the token under any scheme casing
    #[test]
    fn proptest_bearer_unwraps_any_casing(token in arb_jwt(), scheme in "[bB][eE][aA][rR][eE][rR]") {
        let value = format!("{} {}", scheme, token);
        prop_assert_eq!(unwrap_bearer(&value), token.as_str());
    }

    /// Property: Every finding value classifies and the limit is honored
    #[test]
    fn proptest_findings_always_classify(
        token in arb_jwt(),
        name in arb_header_name(),
        limit in 16usize..512
    ) {
        let config = ScanConfig::new(limit);
        let exchange = Exchange::new("req", "https://x.test/")
            .with_request_header(name.clone(), format!("Bearer {}", token))
            .with_response_header(name, token.clone());

        for finding in Scanner::with_config(config).scan(&exchange) {
            prop_assert!(config.is_jwt(finding.value()));
            prop_assert!(finding.value().len() <= limit);
        }
    }

    /// Property: Scanning arbitrary traffic never panics
    #[test]
    fn proptest_scan_never_panics(
        url in ".{0,80}",
        headers in prop::collection::vec((arb_header_name(), ".{0,80}"), 0..6)
    ) {
        let mut exchange = Exchange::new("req", url);
        for (name, value) in headers {
            exchange = exchange
                .with_request_header(name.clone(), value.clone())
                .with_response_header(name, value);
        }

        let findings = Scanner::new().scan(&exchange);
        for finding in &findings {
            prop_assert!(is_jwt(finding.value()));
        }
    }
}

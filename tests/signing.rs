//! Request signing: canonical ordering, determinism and golden signatures.

use kuna::auth::{canonical_query, signed_path, signed_url};
use kuna::{Error, FixedTonce, Signer};
use reqwest::Method;

// ============================================================================
// Golden values
// ============================================================================

#[test]
fn signed_get_matches_reference_digest() {
    let url = signed_path(
        &Method::GET,
        "/api/v2/orders",
        "ak",
        "sk",
        &[("market", "btcuah")],
        1000,
    );
    assert_eq!(
        url,
        "/api/v2/orders?access_key=ak&market=btcuah&tonce=1000\
         &signature=a378cedb69795b4e5acb7e6d52415731c103e3052a8fa646212a5e9564814f35"
    );
}

#[test]
fn signed_post_matches_reference_digest() {
    let signer = Signer::new("ak", "sk").unwrap().with_tonce_source(FixedTonce(1000));
    let url = signer.signed_url(
        "https://kuna.io",
        &Method::POST,
        "/api/v2/orders",
        &[
            ("volume", "0.500000"),
            ("side", "buy"),
            ("price", "100.000000"),
            ("market", "btcuah"),
        ],
    );
    assert_eq!(
        url,
        "https://kuna.io/api/v2/orders?access_key=ak&market=btcuah&price=100.000000\
         &side=buy&tonce=1000&volume=0.500000\
         &signature=1f67b4f17ce9f641e95b55d1dc0b6837a75181579d830a6ff2fb8e9ca2963b25"
    );
}

// ============================================================================
// Canonical ordering
// ============================================================================

#[test]
fn injected_keys_sort_between_caller_params() {
    let url = signed_path(
        &Method::POST,
        "/api/v2/orders",
        "key",
        "secret",
        &[("volume", "1"), ("market", "x"), ("price", "2")],
        42,
    );
    let query = url.split_once('?').unwrap().1;
    let keys: Vec<&str> = query
        .split('&')
        .map(|kv| kv.split_once('=').unwrap().0)
        .collect();
    assert_eq!(
        keys,
        ["access_key", "market", "price", "tonce", "volume", "signature"]
    );
}

#[test]
fn insertion_order_does_not_matter() {
    let a = canonical_query(&[("b", "2"), ("a", "1"), ("c", "3")]);
    let b = canonical_query(&[("c", "3"), ("b", "2"), ("a", "1")]);
    assert_eq!(a, "a=1&b=2&c=3");
    assert_eq!(a, b);
}

#[test]
fn empty_params_still_carry_key_and_tonce() {
    let url = signed_path(&Method::GET, "/api/v2/members/me", "ak", "sk", &[], 5);
    assert!(url.starts_with("/api/v2/members/me?access_key=ak&tonce=5&signature="));
}

#[test]
fn signed_url_prefixes_base() {
    let path = signed_path(&Method::GET, "/api/v2/members/me", "ak", "sk", &[], 5);
    let url = signed_url("https://kuna.io", &Method::GET, "/api/v2/members/me", "ak", "sk", &[], 5);
    assert_eq!(url, format!("https://kuna.io{path}"));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn same_inputs_same_url() {
    let sign = || signed_path(&Method::GET, "/p", "k", "s", &[("a", "1"), ("b", "2")], 9);
    assert_eq!(sign(), sign());
}

#[test]
fn any_change_changes_signature() {
    let base = || signed_path(&Method::GET, "/p", "k", "s", &[("a", "1")], 9);
    let signature = |url: String| url.rsplit_once("signature=").unwrap().1.to_string();
    let reference = signature(base());

    let variants = [
        signed_path(&Method::POST, "/p", "k", "s", &[("a", "1")], 9),
        signed_path(&Method::GET, "/q", "k", "s", &[("a", "1")], 9),
        signed_path(&Method::GET, "/p", "k2", "s", &[("a", "1")], 9),
        signed_path(&Method::GET, "/p", "k", "s2", &[("a", "1")], 9),
        signed_path(&Method::GET, "/p", "k", "s", &[("a", "2")], 9),
        signed_path(&Method::GET, "/p", "k", "s", &[("a", "1")], 10),
    ];
    for v in variants {
        assert_ne!(signature(v), reference);
    }
}

#[test]
fn signature_is_lowercase_hex() {
    let url = signed_path(&Method::GET, "/p", "k", "s", &[], 1);
    let sig = url.rsplit_once("signature=").unwrap().1;
    assert_eq!(sig.len(), 64);
    assert!(sig.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn empty_keys_rejected() {
    assert!(matches!(Signer::new("", "sk"), Err(Error::Credentials(_))));
    assert!(matches!(Signer::new("ak", ""), Err(Error::Credentials(_))));
}

#[test]
fn debug_output_hides_secret() {
    let signer = Signer::new("visible", "hidden-secret").unwrap();
    let text = format!("{signer:?}");
    assert!(text.contains("visible"));
    assert!(!text.contains("hidden-secret"));
}

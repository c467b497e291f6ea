//! Tests for domain normalization and provider status semantics.

use storelane_platform::domains::{DNS_INSTRUCTIONS, normalize_domain};
use storelane_platform::vercel::DomainInfo;

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_normalize_full_url() {
    assert_eq!(normalize_domain("https://Shop.Example.com/"), "shop.example.com");
}

#[test]
fn test_normalize_strips_path_and_www() {
    assert_eq!(normalize_domain("http://www.example.com/shop/all"), "example.com");
    assert_eq!(normalize_domain("WWW.EXAMPLE.COM"), "example.com");
}

#[test]
fn test_normalize_leaves_bare_domains_alone() {
    assert_eq!(normalize_domain("shop.example.com"), "shop.example.com");
}

#[test]
fn test_normalize_is_idempotent() {
    let inputs = [
        "https://Shop.Example.com/",
        "www.example.com/",
        "  store.test  ",
        "http://WWW.a.b.c/d/e?f=g",
    ];
    for input in inputs {
        let once = normalize_domain(input);
        assert_eq!(normalize_domain(&once), once, "input {input:?}");
    }
}

// =============================================================================
// Provider payload decoding
// =============================================================================

#[test]
fn test_domain_info_decodes_provider_shape() {
    let info: DomainInfo = serde_json::from_value(serde_json::json!({
        "name": "shop.example.com",
        "apexName": "example.com",
        "verified": false,
        "verification": [{
            "type": "TXT",
            "domain": "_vercel.shop.example.com",
            "value": "vc-domain-verify=abc",
            "reason": "pending_domain_verification"
        }]
    }))
    .expect("provider payload should decode");

    assert_eq!(info.name, "shop.example.com");
    assert!(!info.verified);
    assert_eq!(info.verification.len(), 1);
    assert_eq!(info.verification[0].kind, "TXT");
}

#[test]
fn test_dns_instructions_name_both_records() {
    assert!(DNS_INSTRUCTIONS.contains("A record"));
    assert!(DNS_INSTRUCTIONS.contains("CNAME"));
}

//! Tests for store slug derivation.

use storelane_core::{Slug, SlugError};

#[test]
fn test_accented_name_folds_to_ascii() {
    let slug = Slug::from_name("My Café").expect("valid name");
    assert_eq!(slug.as_str(), "my-cafe");
}

#[test]
fn test_whitespace_runs_collapse() {
    let slug = Slug::from_name("  The   Corner    Shop ").expect("valid name");
    assert_eq!(slug.as_str(), "the-corner-shop");
}

#[test]
fn test_punctuation_is_stripped() {
    let slug = Slug::from_name("Bob's Bikes & Boards!").expect("valid name");
    assert_eq!(slug.as_str(), "bobs-bikes-boards");
}

#[test]
fn test_reserved_words_rejected() {
    for reserved in ["admin", "api", "www"] {
        assert!(
            matches!(Slug::from_name(reserved), Err(SlugError::Reserved(_))),
            "{reserved} should be reserved"
        );
    }
}

#[test]
fn test_empty_name_rejected() {
    assert!(matches!(Slug::from_name("   "), Err(SlugError::Empty)));
    assert!(matches!(Slug::from_name("!!!"), Err(SlugError::Empty)));
}

#[test]
fn test_suffix_dedup_form() {
    // Same store name under a different merchant gets a numbered slug
    let slug = Slug::from_name("My Café").expect("valid name");
    assert_eq!(slug.with_suffix(2).as_str(), "my-cafe-2");
}

#[test]
fn test_derivation_is_idempotent() {
    let slug = Slug::from_name("My Café").expect("valid name");
    let again = Slug::from_name(slug.as_str()).expect("still valid");
    assert_eq!(slug, again);
}

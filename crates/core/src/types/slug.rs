//! URL-safe store slugs.
//!
//! A [`Slug`] is the globally unique, URL-safe identifier derived from a
//! store's name. Derivation lowercases, folds common accented Latin
//! characters to ASCII, strips punctuation, and collapses whitespace runs
//! into single hyphens. A fixed set of reserved words (routing prefixes)
//! can never be used as a slug.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Routing prefixes and platform words that can never be store slugs.
const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "app", "assets", "auth", "billing", "blog", "cart",
    "checkout", "cron", "dashboard", "docs", "health", "help", "login",
    "logout", "register", "s", "static", "status", "store", "support", "www",
];

/// Errors that can occur when deriving or parsing a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    /// The source name produced no usable characters.
    #[error("name produces an empty slug")]
    Empty,

    /// The slug collides with a reserved routing word.
    #[error("slug '{0}' is reserved")]
    Reserved(String),

    /// A stored slug contains characters outside `[a-z0-9-]`.
    #[error("invalid slug character in '{0}'")]
    InvalidCharacter(String),
}

/// A validated, URL-safe store slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a store name.
    ///
    /// `"My Café"` becomes `my-cafe`: lowercased, accents folded to ASCII,
    /// punctuation stripped, whitespace runs collapsed to single hyphens.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if nothing usable remains, or
    /// [`SlugError::Reserved`] if the result is a reserved word.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut out = String::with_capacity(name.len());
        let mut pending_hyphen = false;

        for c in name.to_lowercase().chars() {
            let folded = fold_char(c);
            match folded {
                Folded::Ascii(a) => {
                    if pending_hyphen && !out.is_empty() {
                        out.push('-');
                    }
                    pending_hyphen = false;
                    out.push(a);
                }
                Folded::Pair(a, b) => {
                    if pending_hyphen && !out.is_empty() {
                        out.push('-');
                    }
                    pending_hyphen = false;
                    out.push(a);
                    out.push(b);
                }
                Folded::Separator => pending_hyphen = true,
                Folded::Drop => {}
            }
        }

        if out.is_empty() {
            return Err(SlugError::Empty);
        }
        if RESERVED_SLUGS.contains(&out.as_str()) {
            return Err(SlugError::Reserved(out));
        }
        Ok(Self(out))
    }

    /// Validate a slug string as stored in the database.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, reserved words, or characters
    /// outside `[a-z0-9-]`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacter(s.to_string()));
        }
        if RESERVED_SLUGS.contains(&s) {
            return Err(SlugError::Reserved(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Produce a deduplicated variant, e.g. `my-cafe` → `my-cafe-2`.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// The slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

enum Folded {
    Ascii(char),
    Pair(char, char),
    Separator,
    Drop,
}

/// Fold one (already lowercased) character for slug output.
fn fold_char(c: char) -> Folded {
    match c {
        'a'..='z' | '0'..='9' => Folded::Ascii(c),
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => Folded::Ascii('a'),
        'ç' => Folded::Ascii('c'),
        'è' | 'é' | 'ê' | 'ë' => Folded::Ascii('e'),
        'ì' | 'í' | 'î' | 'ï' => Folded::Ascii('i'),
        'ñ' => Folded::Ascii('n'),
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => Folded::Ascii('o'),
        'ù' | 'ú' | 'û' | 'ü' => Folded::Ascii('u'),
        'ý' | 'ÿ' => Folded::Ascii('y'),
        'æ' => Folded::Pair('a', 'e'),
        'œ' => Folded::Pair('o', 'e'),
        'ß' => Folded::Pair('s', 's'),
        c if c.is_whitespace() || c == '-' || c == '_' || c == '/' => Folded::Separator,
        _ => Folded::Drop,
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_accents_and_spaces() {
        assert_eq!(Slug::from_name("My Café").expect("slug").as_str(), "my-cafe");
        assert_eq!(
            Slug::from_name("Crème Brûlée & Co.").expect("slug").as_str(),
            "creme-brulee-co"
        );
        assert_eq!(
            Slug::from_name("  Señora   Pérez  ").expect("slug").as_str(),
            "senora-perez"
        );
    }

    #[test]
    fn test_from_name_punctuation_stripped() {
        assert_eq!(Slug::from_name("Bob's Bikes!").expect("slug").as_str(), "bobs-bikes");
        assert_eq!(Slug::from_name("A/B Testing_Shop").expect("slug").as_str(), "a-b-testing-shop");
    }

    #[test]
    fn test_from_name_idempotent_on_own_output() {
        let once = Slug::from_name("Über Größe").expect("slug");
        let twice = Slug::from_name(once.as_str()).expect("slug");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_from_name_empty() {
        assert_eq!(Slug::from_name("!!!"), Err(SlugError::Empty));
        assert_eq!(Slug::from_name(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_reserved_words_rejected() {
        assert!(matches!(Slug::from_name("Admin"), Err(SlugError::Reserved(_))));
        assert!(matches!(Slug::parse("api"), Err(SlugError::Reserved(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert!(matches!(Slug::parse("My Cafe"), Err(SlugError::InvalidCharacter(_))));
        assert!(Slug::parse("my-cafe-2").is_ok());
    }

    #[test]
    fn test_with_suffix() {
        let slug = Slug::from_name("My Café").expect("slug");
        assert_eq!(slug.with_suffix(2).as_str(), "my-cafe-2");
    }
}

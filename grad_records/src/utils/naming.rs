//! Identifier utilities for GradRecords
//!
//! Table and column names are spliced into SQL text, so every name passes
//! through [`validate_identifier`] before it reaches a statement. Values are
//! always bound, never spliced.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}_$]+$").expect("identifier pattern is valid"));

/// Longest identifier MySQL accepts
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Reject names that could not have come from the catalog or introspection
pub fn validate_identifier(name: &str) -> Result<&str> {
    if name.chars().count() <= MAX_IDENTIFIER_LENGTH && IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Quote an identifier with backticks.
///
/// MySQL requires backticks and SQLite accepts them for compatibility.
pub fn quote_identifier(name: &str) -> Result<String> {
    validate_identifier(name).map(|name| format!("`{}`", name))
}

/// Quote every identifier in order
pub fn quote_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    names.iter().map(|name| quote_identifier(name.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Graduates")]
    #[case("Graduation_ID")]
    #[case("_hidden")]
    #[case("DONATION_ID")]
    #[case("Выпускники")]
    #[case("col$1")]
    #[case("1st_Job")]
    fn accepts_plain_identifiers(#[case] name: &str) {
        assert_eq!(validate_identifier(name).unwrap(), name);
    }

    #[rstest]
    #[case("")]
    #[case("Graduates; DROP TABLE Donations")]
    #[case("a`b")]
    #[case("name with space")]
    #[case("x--")]
    fn rejects_unsafe_identifiers(#[case] name: &str) {
        assert!(matches!(
            validate_identifier(name),
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn rejects_overlong_identifier() {
        let name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_identifier(&name).is_err());
        assert!(validate_identifier(&name[1..]).is_ok());
    }

    #[test]
    fn quotes_with_backticks() {
        assert_eq!(quote_identifier("Work_ID").unwrap(), "`Work_ID`");
        assert_eq!(
            quote_all(&["a", "b"]).unwrap(),
            vec!["`a`".to_string(), "`b`".to_string()]
        );
        assert!(quote_all(&["a", "b c"]).is_err());
    }
}

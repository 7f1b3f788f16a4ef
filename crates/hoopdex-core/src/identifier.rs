use std::fmt;

use crate::error::AppError;

const DETAIL_EXTENSION: &str = ".html";

/// A player detail-page reference that passed syntactic validation.
///
/// Shape: one ASCII letter, `/`, one or more ASCII alphanumerics, `.html`
/// (case-insensitive). Detail URLs are only ever built from this type, so
/// arbitrary user input can never steer a render to another path or host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if is_valid_identifier(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::ValidationError(format!("invalid path: {raw:?}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_identifier(raw: &str) -> bool {
    let Some((letter, file)) = raw.split_once('/') else {
        return false;
    };

    let mut letter_chars = letter.chars();
    let single_letter = matches!(
        (letter_chars.next(), letter_chars.next()),
        (Some(c), None) if c.is_ascii_alphabetic()
    );
    if !single_letter {
        return false;
    }

    // `get` keeps this safe when the tail is not on a char boundary.
    let split = file.len().saturating_sub(DETAIL_EXTENSION.len());
    let (Some(stem), Some(ext)) = (file.get(..split), file.get(split..)) else {
        return false;
    };

    ext.eq_ignore_ascii_case(DETAIL_EXTENSION)
        && !stem.is_empty()
        && stem.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_identifier() {
        let id = PlayerId::parse("j/jordami01.html").unwrap();
        assert_eq!(id.as_str(), "j/jordami01.html");
    }

    #[test]
    fn accepts_uppercase() {
        assert!(PlayerId::parse("J/NAME.HTML").is_ok());
        assert!(PlayerId::parse("j/Jordami01.Html").is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = PlayerId::parse("  j/jordami01.html ").unwrap();
        assert_eq!(id.to_string(), "j/jordami01.html");
    }

    #[test]
    fn rejects_traversal_and_shape_violations() {
        for raw in [
            "../secret.html",
            "jj/x.html",
            "j/",
            "j/.html",
            "/jordami01.html",
            "j/jordami01.htm",
            "j/jordami01.html/extra",
            "j/jord-ami01.html",
            "j/jordami01.html?x=1",
            "j//jordami01.html",
            "1/jordami01.html",
            "https://evil.example/x.html",
            "",
            "é/x.html",
            "j/xé.html",
        ] {
            let err = PlayerId::parse(raw).unwrap_err();
            assert!(
                matches!(err, AppError::ValidationError(_)),
                "expected validation error for {raw:?}"
            );
        }
    }
}

//! Thin query layer over `scraper` (html5ever).
//!
//! Parsing never fails: malformed markup yields a best-effort tree and
//! selectors simply match fewer nodes.

use scraper::{ElementRef, Html, Selector};

use crate::error::AppError;

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching a CSS selector, in document order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// Trimmed text of the first `<title>`, or an empty string.
    pub fn title(&self) -> String {
        let Ok(selector) = Selector::parse("title") else {
            return String::new();
        };
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}

/// Compile a CSS selector, mapping failure to [`AppError::ParseError`].
pub fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::ParseError(format!("invalid selector {css:?}: {e}")))
}

/// Concatenated text of an element with whitespace runs collapsed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Text of the first descendant matching `selector`, trimmed.
pub fn child_text(el: &ElementRef<'_>, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(|child| child.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Replace every run of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

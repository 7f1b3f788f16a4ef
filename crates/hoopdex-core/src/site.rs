use url::Url;

use crate::error::AppError;
use crate::identifier::PlayerId;

pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";

/// Partition keys crawled for the listing, in crawl order.
pub const PARTITION_KEYS: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Where things live on the remote site.
///
/// Listing pages and detail pages share the `/players/` prefix; the
/// listing anchors' `href`s carry the same prefix, which is stripped to get
/// the identifier.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub(crate) base_url: String,
    pub path_prefix: String,
    pub listing_anchor_selector: String,
    /// Case-insensitive fragment the listing `<title>` should contain.
    pub expected_title: String,
    pub stats_row_selector: String,
    pub season_cell_selector: String,
    pub value_cell_selector: String,
}

impl SiteLayout {
    /// Layout for the given base URL (scheme + host, optional path).
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{base_url}': {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::ConfigError(format!(
                    "Base URL scheme '{scheme}' is not allowed (only http/https)"
                )));
            }
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Listing page for one partition key, e.g. `.../players/j/`.
    pub fn listing_url(&self, key: char) -> String {
        format!("{}{}{}/", self.base_url, self.path_prefix, key)
    }

    /// Detail page for a validated identifier.
    pub fn detail_url(&self, id: &PlayerId) -> String {
        format!("{}{}{}", self.base_url, self.path_prefix, id)
    }

    /// Strip the path prefix from a listing `href`, if it has one.
    pub fn identifier_from_href<'a>(&self, href: &'a str) -> Option<&'a str> {
        href.strip_prefix(self.path_prefix.as_str())
    }
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path_prefix: "/players/".to_string(),
            listing_anchor_selector: "#div_players a".to_string(),
            expected_title: "players index".to_string(),
            stats_row_selector: "#per_game_stats tbody tr".to_string(),
            season_cell_selector: r#"th[data-stat="year_id"]"#.to_string(),
            value_cell_selector: r#"td[data-stat="pts_per_g"]"#.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_and_detail_urls() {
        let site = SiteLayout::default();
        assert_eq!(
            site.listing_url('j'),
            "https://www.basketball-reference.com/players/j/"
        );
        let id = PlayerId::parse("j/jordami01.html").unwrap();
        assert_eq!(
            site.detail_url(&id),
            "https://www.basketball-reference.com/players/j/jordami01.html"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let site = SiteLayout::new("http://localhost:8080/").unwrap();
        assert_eq!(site.listing_url('a'), "http://localhost:8080/players/a/");
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(SiteLayout::new("not a url"), Err(AppError::ConfigError(_))));
        assert!(matches!(SiteLayout::new("file:///etc"), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn identifier_from_href_requires_prefix() {
        let site = SiteLayout::default();
        assert_eq!(site.identifier_from_href("/players/j/jordami01.html"), Some("j/jordami01.html"));
        assert_eq!(site.identifier_from_href("/teams/CHI/"), None);
        assert_eq!(site.identifier_from_href("https://x.com/players/j/a.html"), None);
    }

    #[test]
    fn partitions_are_a_to_z() {
        assert_eq!(PARTITION_KEYS.len(), 26);
        assert_eq!(PARTITION_KEYS[0], 'a');
        assert_eq!(PARTITION_KEYS[25], 'z');
        assert!(PARTITION_KEYS.windows(2).all(|w| w[0] < w[1]));
    }
}

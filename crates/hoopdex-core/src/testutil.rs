//! Test utilities: handwritten mock renderer and HTML fixtures.
//!
//! Mocks use `Arc<Mutex<_>>` so clones share state and tests can assert on
//! recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::traits::PageRenderer;

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// Mock renderer that replays a queue of responses and records every URL.
#[derive(Clone)]
pub struct MockRenderer {
    /// Each call pops the first element. If empty, returns a default page.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockRenderer {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs rendered so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A listing page in the shape served for one letter.
///
/// `players` is a list of `(name, href)` pairs placed inside
/// `#div_players`.
pub fn listing_page(title: &str, players: &[(&str, &str)]) -> String {
    let anchors: String = players
        .iter()
        .map(|(name, href)| format!("<p><strong><a href=\"{href}\">{name}</a></strong> (1985-2003)</p>\n"))
        .collect();
    format!(
        "<html><head><title>{title}</title></head><body>\
         <nav><a href=\"/players/a/\">A</a><a href=\"/teams/\">Teams</a></nav>\
         <div id=\"div_players\">\n{anchors}</div></body></html>"
    )
}

/// A detail page with a per-game table holding `(season, pts)` rows.
pub fn detail_page(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(season, pts)| {
            format!(
                "<tr><th data-stat=\"year_id\">{season}</th>\
                 <td data-stat=\"team_name_abbr\">CHI</td>\
                 <td data-stat=\"pts_per_g\">{pts}</td></tr>\n"
            )
        })
        .collect();
    format!(
        "<html><head><title>Player Stats</title></head><body>\
         <table id=\"per_game_stats\"><thead><tr><th>Season</th><th>PTS</th></tr></thead>\
         <tbody>\n{body}</tbody>\
         <tfoot><tr><th data-stat=\"year_id\">Career</th><td data-stat=\"pts_per_g\">30.1</td></tr></tfoot>\
         </table></body></html>"
    )
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single searchable player: display name plus the detail-page path
/// fragment it links to (e.g. `"j/jordami01.html"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
    #[serde(alias = "text")]
    pub display_name: String,
    #[serde(alias = "path")]
    pub identifier: String,
}

impl PlayerEntry {
    pub fn new(display_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            identifier: identifier.into(),
        }
    }

    /// Both halves of the identity key must be present.
    pub fn is_complete(&self) -> bool {
        !self.display_name.is_empty() && !self.identifier.is_empty()
    }
}

/// Ordered, deduplicated player catalog.
///
/// Order is first-discovery order. No two entries share the same
/// `(display_name, identifier)` pair; every constructor enforces this,
/// including deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PlayerEntry>", into = "Vec<PlayerEntry>")]
pub struct PlayerIndex {
    entries: Vec<PlayerEntry>,
}

impl PlayerIndex {
    /// Deduplicate raw crawl output, keeping the first occurrence of each
    /// identity key. Incomplete entries are dropped.
    pub fn from_raw(raw: Vec<PlayerEntry>) -> Self {
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(raw.len());
        let entries = raw
            .into_iter()
            .filter(|e| e.is_complete())
            .filter(|e| seen.insert((e.display_name.clone(), e.identifier.clone())))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PlayerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<PlayerEntry>> for PlayerIndex {
    fn from(raw: Vec<PlayerEntry>) -> Self {
        Self::from_raw(raw)
    }
}

impl From<PlayerIndex> for Vec<PlayerEntry> {
    fn from(index: PlayerIndex) -> Self {
        index.entries
    }
}

/// One row of the season-by-season table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStat {
    pub season_label: String,
    /// Numeric text exactly as rendered (e.g. `"28.2"`).
    pub value: String,
}

/// Points-per-game series for one player, in table row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSeries {
    pub identifier: String,
    pub series: Vec<SeasonStat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Anomaly>,
}

/// Category of a non-fatal page-shape problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Listing page title did not look like a players index.
    UnexpectedTitle,
    /// Listing page yielded no player anchors.
    EmptyListing,
    /// Detail page had no per-game stats table.
    MissingStatsTable,
}

/// A soft parse failure: logged, attached to the result, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Where it happened (partition letter or player identifier).
    pub context: String,
    pub detail: String,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
            detail: detail.into(),
        }
    }
}

/// Output of a complete crawl.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub index: PlayerIndex,
    pub anomalies: Vec<Anomaly>,
    /// Number of accepted anchors before deduplication.
    pub raw_count: usize,
}

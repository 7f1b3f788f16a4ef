use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hoopdex_core::models::{Anomaly, PlayerEntry, SeasonStat, StatSeries};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Free-text name query (at least 2 characters)
    pub q: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntryResponse {
    pub display_name: String,
    pub identifier: String,
}

impl From<PlayerEntry> for PlayerEntryResponse {
    fn from(entry: PlayerEntry) -> Self {
        Self {
            display_name: entry.display_name,
            identifier: entry.identifier,
        }
    }
}

// ---------------------------------------------------------------------------
// Player stats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PlayerQuery {
    /// Player identifier, e.g. `j/jordami01.html`
    #[serde(alias = "identifier")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatResponse {
    pub season_label: String,
    pub value: String,
}

impl From<SeasonStat> for SeasonStatResponse {
    fn from(stat: SeasonStat) -> Self {
        Self {
            season_label: stat.season_label,
            value: stat.value,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WarningResponse {
    pub kind: String,
    pub detail: String,
}

impl From<Anomaly> for WarningResponse {
    fn from(anomaly: Anomaly) -> Self {
        let kind = serde_json::to_value(anomaly.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Self {
            kind,
            detail: anomaly.detail,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatSeriesResponse {
    pub identifier: String,
    pub series: Vec<SeasonStatResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningResponse>,
}

impl From<StatSeries> for StatSeriesResponse {
    fn from(stats: StatSeries) -> Self {
        Self {
            identifier: stats.identifier,
            series: stats.series.into_iter().map(SeasonStatResponse::from).collect(),
            warnings: stats.warnings.into_iter().map(WarningResponse::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    /// Number of players in the adopted index (0 until ready)
    pub players: usize,
    /// One of `not_ready`, `building`, `ready`, `shutting_down`
    pub state: String,
    pub index_ready_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

use crate::error::AppError;
use crate::identifier::PlayerId;
use crate::markup::{self, Document};
use crate::models::{Anomaly, AnomalyKind, SeasonStat, StatSeries};
use crate::site::SiteLayout;
use crate::traits::PageRenderer;

/// Renders one player's detail page and pulls out the per-game points
/// series.
///
/// Takes a [`PlayerId`], so only validated identifiers can reach the
/// renderer. Nothing is cached; every call renders the page afresh.
#[derive(Clone)]
pub struct StatsExtractor<R: PageRenderer> {
    renderer: R,
    site: SiteLayout,
}

impl<R: PageRenderer> StatsExtractor<R> {
    pub fn new(renderer: R, site: SiteLayout) -> Self {
        Self { renderer, site }
    }

    pub async fn extract(&self, id: &PlayerId) -> Result<StatSeries, AppError> {
        let url = self.site.detail_url(id);
        tracing::info!(identifier = %id, "Rendering player page");

        let html = self.renderer.render(&url).await?;
        let series = parse_stats(&self.site, id, &html)?;

        if series.warnings.is_empty() {
            tracing::info!(identifier = %id, rows = series.series.len(), "Extracted season stats");
        } else {
            for warning in &series.warnings {
                tracing::warn!(identifier = %id, detail = %warning.detail, "Unexpected page shape");
            }
        }
        Ok(series)
    }
}

fn parse_stats(site: &SiteLayout, id: &PlayerId, html: &str) -> Result<StatSeries, AppError> {
    let doc = Document::parse(html);
    let rows = markup::selector(&site.stats_row_selector)?;
    let season_cell = markup::selector(&site.season_cell_selector)?;
    let value_cell = markup::selector(&site.value_cell_selector)?;

    let mut row_count = 0;
    let series: Vec<SeasonStat> = doc
        .select(&rows)
        .inspect(|_| row_count += 1)
        .filter_map(|row| {
            let season_label = markup::child_text(&row, &season_cell);
            if season_label.is_empty() {
                return None;
            }
            Some(SeasonStat {
                season_label,
                value: markup::child_text(&row, &value_cell),
            })
        })
        .collect();

    let mut warnings = Vec::new();
    if row_count == 0 {
        warnings.push(Anomaly::new(
            AnomalyKind::MissingStatsTable,
            id.as_str(),
            format!("no rows matched {:?}", site.stats_row_selector),
        ));
    }

    Ok(StatSeries {
        identifier: id.to_string(),
        series,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockRenderer, detail_page};

    fn jordan() -> PlayerId {
        PlayerId::parse("j/jordami01.html").unwrap()
    }

    fn extractor(renderer: MockRenderer) -> StatsExtractor<MockRenderer> {
        StatsExtractor::new(renderer, SiteLayout::default())
    }

    #[tokio::test]
    async fn extracts_rows_in_table_order() {
        let renderer = MockRenderer::new(&detail_page(&[
            ("1984-85", "28.2"),
            ("1985-86", "22.7"),
            ("1986-87", "37.1"),
        ]));

        let stats = extractor(renderer.clone()).extract(&jordan()).await.unwrap();

        assert_eq!(stats.identifier, "j/jordami01.html");
        let seasons: Vec<_> = stats.series.iter().map(|s| s.season_label.as_str()).collect();
        assert_eq!(seasons, ["1984-85", "1985-86", "1986-87"]);
        assert_eq!(stats.series[2].value, "37.1");
        assert!(stats.warnings.is_empty());
        assert_eq!(
            renderer.requested(),
            ["https://www.basketball-reference.com/players/j/jordami01.html"]
        );
    }

    #[tokio::test]
    async fn skips_rows_with_empty_season() {
        let renderer = MockRenderer::new(&detail_page(&[
            ("1984-85", "28.2"),
            ("", ""),
            ("  ", "12.0"),
            ("1986-87", "37.1"),
        ]));

        let stats = extractor(renderer).extract(&jordan()).await.unwrap();

        assert_eq!(stats.series.len(), 2);
        assert!(stats.series.iter().all(|s| !s.season_label.is_empty()));
    }

    #[tokio::test]
    async fn missing_value_cell_yields_empty_value() {
        let html = r#"<table id="per_game_stats"><tbody>
            <tr><th data-stat="year_id">1993-94</th><td data-stat="pts_per_g"></td></tr>
            <tr><th data-stat="year_id">1994-95</th></tr>
        </tbody></table>"#;

        let stats = extractor(MockRenderer::new(html)).extract(&jordan()).await.unwrap();

        assert_eq!(stats.series.len(), 2);
        assert_eq!(stats.series[0].value, "");
        assert_eq!(stats.series[1].value, "");
    }

    #[tokio::test]
    async fn career_footer_is_not_a_season() {
        let renderer = MockRenderer::new(&detail_page(&[("1984-85", "28.2")]));

        let stats = extractor(renderer).extract(&jordan()).await.unwrap();

        assert_eq!(stats.series.len(), 1);
        assert_ne!(stats.series[0].season_label, "Career");
    }

    #[tokio::test]
    async fn missing_table_is_soft_warning() {
        let renderer = MockRenderer::new("<html><title>Page Not Found</title></html>");

        let stats = extractor(renderer).extract(&jordan()).await.unwrap();

        assert!(stats.series.is_empty());
        assert_eq!(stats.warnings.len(), 1);
        assert_eq!(stats.warnings[0].kind, AnomalyKind::MissingStatsTable);
    }

    #[tokio::test]
    async fn render_error_propagates() {
        let renderer = MockRenderer::with_error(AppError::NetworkError("connection reset".into()));

        let err = extractor(renderer).extract(&jordan()).await.unwrap_err();

        assert!(matches!(err, AppError::NetworkError(_)));
    }
}

use crate::error::AppError;
use crate::markup::{self, Document};
use crate::models::{Anomaly, AnomalyKind, BuildReport, PlayerEntry, PlayerIndex};
use crate::site::{PARTITION_KEYS, SiteLayout};
use crate::throttle::{ThrottleConfig, ThrottledRenderer};
use crate::traits::PageRenderer;

/// Events emitted by the index builder for monitoring/logging.
#[derive(Debug, Clone)]
pub enum CrawlEvent<'a> {
    Started {
        partitions: usize,
    },
    PartitionStarted {
        key: char,
        url: &'a str,
    },
    PartitionDone {
        key: char,
        found: usize,
        total: usize,
    },
    Anomaly {
        anomaly: &'a Anomaly,
    },
    Finished {
        raw: usize,
        unique: usize,
    },
}

/// Trait for receiving crawl events (decoupled logging).
pub trait CrawlReporter: Send + Sync {
    fn report(&self, event: CrawlEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCrawlReporter;

impl CrawlReporter for TracingCrawlReporter {
    fn report(&self, event: CrawlEvent<'_>) {
        match event {
            CrawlEvent::Started { partitions } => {
                tracing::info!(%partitions, "Building player index");
            }
            CrawlEvent::PartitionStarted { key, url } => {
                tracing::debug!(letter = %key, %url, "Rendering listing page");
            }
            CrawlEvent::PartitionDone { key, found, total } => {
                tracing::info!(letter = %key, %found, %total, "Letter done");
            }
            CrawlEvent::Anomaly { anomaly } => {
                tracing::warn!(
                    kind = ?anomaly.kind,
                    context = %anomaly.context,
                    detail = %anomaly.detail,
                    "Unexpected page shape"
                );
            }
            CrawlEvent::Finished { raw, unique } => {
                tracing::info!(%raw, %unique, "Player index built");
            }
        }
    }
}

/// Crawls the a–z listing pages and produces a deduplicated [`PlayerIndex`].
///
/// Strictly sequential: one partition at a time, each preceded by the
/// courtesy delay. A render failure on any partition aborts the whole
/// build; page-shape surprises are collected as [`Anomaly`] values and the
/// crawl carries on.
pub struct IndexBuilder<R: PageRenderer> {
    renderer: ThrottledRenderer<R>,
    site: SiteLayout,
}

/// What one listing page yielded.
struct ListingPage {
    title: String,
    entries: Vec<PlayerEntry>,
}

impl<R: PageRenderer> IndexBuilder<R> {
    pub fn new(renderer: R, site: SiteLayout, throttle: ThrottleConfig) -> Self {
        Self {
            renderer: ThrottledRenderer::new(renderer, throttle),
            site,
        }
    }

    pub async fn build(&self, reporter: &dyn CrawlReporter) -> Result<BuildReport, AppError> {
        reporter.report(CrawlEvent::Started {
            partitions: PARTITION_KEYS.len(),
        });

        let mut raw: Vec<PlayerEntry> = Vec::new();
        let mut anomalies: Vec<Anomaly> = Vec::new();

        for key in PARTITION_KEYS {
            let url = self.site.listing_url(key);
            reporter.report(CrawlEvent::PartitionStarted { key, url: &url });

            let html = self.renderer.render(&url).await.inspect_err(|e| {
                tracing::error!(letter = %key, error = %e, "Listing render failed, aborting build");
            })?;

            let page = parse_listing(&self.site, &html)?;

            if !page
                .title
                .to_lowercase()
                .contains(&self.site.expected_title.to_lowercase())
            {
                let anomaly = Anomaly::new(
                    AnomalyKind::UnexpectedTitle,
                    key.to_string(),
                    format!("unexpected title: {:?}", page.title),
                );
                reporter.report(CrawlEvent::Anomaly { anomaly: &anomaly });
                anomalies.push(anomaly);
            }

            if page.entries.is_empty() {
                let anomaly = Anomaly::new(
                    AnomalyKind::EmptyListing,
                    key.to_string(),
                    "no player anchors found",
                );
                reporter.report(CrawlEvent::Anomaly { anomaly: &anomaly });
                anomalies.push(anomaly);
            }

            let found = page.entries.len();
            raw.extend(page.entries);
            reporter.report(CrawlEvent::PartitionDone {
                key,
                found,
                total: raw.len(),
            });
        }

        let raw_count = raw.len();
        let index = PlayerIndex::from_raw(raw);
        reporter.report(CrawlEvent::Finished {
            raw: raw_count,
            unique: index.len(),
        });

        Ok(BuildReport {
            index,
            anomalies,
            raw_count,
        })
    }
}

/// Pull the title and every well-formed player anchor out of a listing page.
///
/// Kept synchronous so the parsed tree never lives across an await point.
fn parse_listing(site: &SiteLayout, html: &str) -> Result<ListingPage, AppError> {
    let doc = Document::parse(html);
    let anchors = markup::selector(&site.listing_anchor_selector)?;

    let entries = doc
        .select(&anchors)
        .filter_map(|a| {
            let text = markup::element_text(&a);
            let href = a.value().attr("href")?;
            let identifier = site.identifier_from_href(href)?;
            let entry = PlayerEntry::new(text, identifier);
            entry.is_complete().then_some(entry)
        })
        .collect();

    Ok(ListingPage {
        title: doc.title(),
        entries,
    })
}

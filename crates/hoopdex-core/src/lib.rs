pub mod bootstrap;
pub mod error;
pub mod identifier;
pub mod index_builder;
pub mod index_store;
pub mod markup;
pub mod models;
pub mod search;
pub mod site;
pub mod snapshot;
pub mod stats;
pub mod throttle;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use bootstrap::{BootstrapOutcome, bootstrap};
pub use error::AppError;
pub use identifier::PlayerId;
pub use index_builder::{CrawlEvent, CrawlReporter, IndexBuilder, TracingCrawlReporter};
pub use index_store::{IndexStore, Readiness};
pub use models::{Anomaly, AnomalyKind, BuildReport, PlayerEntry, PlayerIndex, SeasonStat, StatSeries};
pub use site::SiteLayout;
pub use snapshot::JsonSnapshot;
pub use stats::StatsExtractor;
pub use throttle::{ThrottleConfig, ThrottledRenderer};
pub use traits::{PageRenderer, SharedRenderer};

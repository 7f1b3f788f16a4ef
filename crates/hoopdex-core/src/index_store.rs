use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::error::AppError;
use crate::models::{PlayerEntry, PlayerIndex};
use crate::search;
use crate::snapshot::JsonSnapshot;

/// Service readiness with respect to the player index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// No index yet; a load or build has not completed (or a build failed).
    NotReady,
    /// A crawl is running.
    Building,
    /// An index has been adopted. Terminal for index content.
    Ready,
    /// Process is stopping.
    ShuttingDown,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readiness::NotReady => write!(f, "not_ready"),
            Readiness::Building => write!(f, "building"),
            Readiness::Ready => write!(f, "ready"),
            Readiness::ShuttingDown => write!(f, "shutting_down"),
        }
    }
}

/// Owner of the process-wide player index.
///
/// The index is published at most once (loaded or built) and never
/// replaced. Readers go through [`index`](Self::index) and
/// [`search`](Self::search), which see an empty catalog until then.
pub struct IndexStore {
    snapshot: JsonSnapshot,
    index: OnceLock<PlayerIndex>,
    adopted_at: OnceLock<DateTime<Utc>>,
    state: watch::Sender<Readiness>,
}

impl IndexStore {
    pub fn new(snapshot: JsonSnapshot) -> Self {
        let (state, _) = watch::channel(Readiness::NotReady);
        Self {
            snapshot,
            index: OnceLock::new(),
            adopted_at: OnceLock::new(),
            state,
        }
    }

    pub fn snapshot(&self) -> &JsonSnapshot {
        &self.snapshot
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Read the persisted snapshot. Any failure is logged and reported as
    /// "no snapshot" so the caller can fall back to a crawl.
    pub async fn load(&self) -> Option<PlayerIndex> {
        match self.snapshot.read().await {
            Ok(Some(index)) => {
                tracing::info!(
                    players = index.len(),
                    path = %self.snapshot.path().display(),
                    "Loaded player index from disk"
                );
                Some(index)
            }
            Ok(None) => {
                tracing::info!(path = %self.snapshot.path().display(), "No player index on disk");
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.snapshot.path().display(),
                    "Failed to load player index from disk"
                );
                None
            }
        }
    }

    /// Persist an index. Failures are logged; returns whether the write
    /// succeeded. The in-memory index is unaffected either way.
    pub async fn save(&self, index: &PlayerIndex) -> bool {
        match self.snapshot.write(index).await {
            Ok(()) => {
                tracing::info!(
                    players = index.len(),
                    path = %self.snapshot.path().display(),
                    "Saved player index to disk"
                );
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save player index to disk");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    pub fn state(&self) -> Readiness {
        *self.state.borrow()
    }

    /// Watch readiness transitions; await `Ready` with `wait_for`.
    pub fn subscribe(&self) -> watch::Receiver<Readiness> {
        self.state.subscribe()
    }

    /// `NotReady → Building`. Returns false from any other state.
    pub fn begin_build(&self) -> bool {
        self.transition(|s| matches!(s, Readiness::NotReady), Readiness::Building)
    }

    /// `Building → NotReady` after a failed crawl.
    pub fn abort_build(&self) -> bool {
        self.transition(|s| matches!(s, Readiness::Building), Readiness::NotReady)
    }

    /// Any state → `ShuttingDown`.
    pub fn shutdown(&self) {
        self.state.send_replace(Readiness::ShuttingDown);
    }

    /// Publish the index and move to `Ready`.
    ///
    /// Fails with [`AppError::AlreadyAdopted`] if an index was already
    /// published, and with [`AppError::Cancelled`] once shutting down.
    pub fn adopt(&self, index: PlayerIndex) -> Result<(), AppError> {
        if self.state() == Readiness::ShuttingDown {
            return Err(AppError::Cancelled);
        }
        let players = index.len();
        self.index.set(index).map_err(|_| AppError::AlreadyAdopted)?;
        let _ = self.adopted_at.set(Utc::now());
        self.transition(
            |s| matches!(s, Readiness::NotReady | Readiness::Building),
            Readiness::Ready,
        );
        tracing::info!(%players, "Player index adopted");
        Ok(())
    }

    fn transition(&self, allowed: impl Fn(Readiness) -> bool, next: Readiness) -> bool {
        self.state.send_if_modified(|current| {
            if allowed(*current) {
                tracing::debug!(from = %current, to = %next, "Readiness transition");
                *current = next;
                true
            } else {
                false
            }
        })
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    /// The adopted index's entries, or an empty slice before adoption.
    pub fn index(&self) -> &[PlayerEntry] {
        self.index.get().map(PlayerIndex::entries).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }

    pub fn adopted_at(&self) -> Option<DateTime<Utc>> {
        self.adopted_at.get().copied()
    }

    /// Ranked search over the adopted index.
    pub fn search(&self, query: &str) -> Vec<PlayerEntry> {
        search::search(self.index(), query)
    }
}

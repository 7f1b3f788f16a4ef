//! On-disk snapshot of the player index: a JSON array of
//! `{displayName, identifier}` objects.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::AppError;
use crate::models::PlayerIndex;

pub const DEFAULT_SNAPSHOT_FILE: &str = "./player_index.json";

/// JSON snapshot file at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot.
    ///
    /// `Ok(None)` when the file is missing or holds an empty array. A file
    /// that is not a JSON array of entries is an error; callers treat both
    /// as "no snapshot".
    pub async fn read(&self) -> Result<Option<PlayerIndex>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::PersistenceError(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let index: PlayerIndex = serde_json::from_str(&raw)?;
        Ok((!index.is_empty()).then_some(index))
    }

    /// Write the snapshot atomically (temp file in the same directory, then
    /// rename).
    pub async fn write(&self, index: &PlayerIndex) -> Result<(), AppError> {
        let body = to_pretty_json(index)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(|e| {
            AppError::PersistenceError(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::PersistenceError(format!(
                "Failed to move snapshot into {}: {e}",
                self.path.display()
            ))
        })
    }
}

/// Four-space indented JSON, matching snapshots written by earlier tooling.
fn to_pretty_json(index: &PlayerIndex) -> Result<Vec<u8>, AppError> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    index.serialize(&mut ser)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerEntry;

    fn sample() -> PlayerIndex {
        PlayerIndex::from_raw(vec![
            PlayerEntry::new("Michael Jordan", "j/jordami01.html"),
            PlayerEntry::new("Eddie Johnson", "j/johnsed02.html"),
            PlayerEntry::new("Eddie Johnson", "j/johnsed01.html"),
        ])
    }

    #[tokio::test]
    async fn round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("index.json"));

        snapshot.write(&sample()).await.unwrap();
        let loaded = snapshot.read().await.unwrap().unwrap();

        assert_eq!(loaded, sample());
    }

    #[tokio::test]
    async fn writes_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("index.json"));

        snapshot.write(&sample()).await.unwrap();
        let raw = std::fs::read_to_string(snapshot.path()).unwrap();

        assert!(raw.starts_with("[\n    {\n        \"displayName\""));
        assert!(!dir.path().join("index.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("absent.json"));
        assert!(snapshot.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_array_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(JsonSnapshot::new(path).read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_array_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, r#"{"players": []}"#).unwrap();

        let err = JsonSnapshot::new(path).read().await.unwrap_err();
        assert!(matches!(err, AppError::SerializationError(_)));
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonSnapshot::new(dir.path().join("nope").join("index.json"));

        let err = snapshot.write(&sample()).await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceError(_)));
    }
}

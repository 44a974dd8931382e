//! The "latest created survey" slot.
//!
//! Not transactionally tied to the backend write: the slot may be absent or
//! point at a survey the backend no longer knows. Callers treat both as normal.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::StoreError;

const LATEST_SURVEY_FILE: &str = "latest_survey_id";

/// Best-effort side channel. Neither method ever reports failure.
#[async_trait]
pub trait LatestSurveySlot: Send + Sync {
    async fn remember(&self, survey_id: &str);
    async fn recall(&self) -> Option<String>;
}

/// Slot backed by a single file inside a state directory.
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(LATEST_SURVEY_FILE)
    }

    /// Write the id, creating the state directory if needed.
    pub async fn try_remember(&self, survey_id: &str) -> Result<(), StoreError> {
        let survey_id = survey_id.trim();
        if survey_id.is_empty() {
            return Err(StoreError::Other("empty survey id".into()));
        }
        ensure_dir(&self.dir).await?;
        tokio::fs::write(self.path(), survey_id).await?;
        Ok(())
    }

    /// Read the id. A missing file is `Ok(None)`.
    pub async fn try_recall(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path()).await {
            Ok(s) => {
                let s = s.trim();
                Ok((!s.is_empty()).then(|| s.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

async fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(StoreError::StateDir(dir.to_path_buf())),
        Err(_) => {
            tokio::fs::create_dir_all(dir).await?;
            Ok(())
        }
    }
}

#[async_trait]
impl LatestSurveySlot for FileSlot {
    async fn remember(&self, survey_id: &str) {
        match self.try_remember(survey_id).await {
            Ok(()) => debug!(survey_id, path = %self.path().display(), "latest survey id saved"),
            Err(e) => warn!(survey_id, error = %e, "could not save latest survey id"),
        }
    }

    async fn recall(&self) -> Option<String> {
        match self.try_recall().await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "could not read latest survey id");
                None
            }
        }
    }
}

/// In-process slot, used when no state directory is configured.
#[derive(Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LatestSurveySlot for MemorySlot {
    async fn remember(&self, survey_id: &str) {
        if let Ok(mut guard) = self.value.lock() {
            *guard = Some(survey_id.to_string());
        }
    }

    async fn recall(&self) -> Option<String> {
        self.value.lock().ok().and_then(|g| g.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remember_then_recall() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("state"));
        assert_eq!(slot.recall().await, None);

        slot.remember("S1").await;
        assert_eq!(slot.recall().await.as_deref(), Some("S1"));

        slot.remember("S2").await;
        assert_eq!(slot.recall().await.as_deref(), Some("S2"));
    }

    #[tokio::test]
    async fn unusable_state_dir_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let slot = FileSlot::new(&blocker);
        assert!(matches!(
            slot.try_remember("S1").await,
            Err(StoreError::StateDir(_))
        ));
        // Trait surface never fails.
        slot.remember("S1").await;
        assert_eq!(slot.recall().await, None);
    }

    #[tokio::test]
    async fn blank_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path());
        std::fs::write(slot.path(), "  \n").unwrap();
        assert_eq!(slot.try_recall().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_slot_round_trip() {
        let slot = MemorySlot::new();
        slot.remember("S9").await;
        assert_eq!(slot.recall().await.as_deref(), Some("S9"));
    }
}

use super::{DraftStore, StoreResult};
use crate::models::{Draft, DraftSummary};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the local drafts list (same key the web form used in
/// browser storage)
pub const LOCAL_DRAFTS_KEY: &str = "SOC_V3_PENDIENTES";

/// Drafts stored as one JSON array in `<data_dir>/SOC_V3_PENDIENTES.json`
#[derive(Debug, Clone)]
pub struct LocalDraftStore {
    path: PathBuf,
}

impl LocalDraftStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", LOCAL_DRAFTS_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all drafts. A missing, unreadable or corrupt file reads as empty.
    pub fn load_all(&self) -> Vec<Draft> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read local drafts");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Draft>>(&content) {
            Ok(drafts) => drafts,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "local drafts file is corrupt");
                Vec::new()
            }
        }
    }

    fn write_all(&self, drafts: &[Draft]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(drafts)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[async_trait]
impl DraftStore for LocalDraftStore {
    async fn save(&self, draft: &Draft) -> StoreResult<String> {
        let mut drafts = self.load_all();
        drafts.retain(|d| d.id != draft.id);
        drafts.push(draft.clone());
        self.write_all(&drafts)?;

        tracing::debug!(id = %draft.id, total = drafts.len(), "saved local draft");
        Ok(draft.id.clone())
    }

    async fn list(&self) -> StoreResult<Vec<DraftSummary>> {
        let mut drafts = self.load_all();
        drafts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(drafts.iter().map(Draft::summary).collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Draft>> {
        Ok(self.load_all().into_iter().find(|d| d.id == id))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut drafts = self.load_all();
        let before = drafts.len();
        drafts.retain(|d| d.id != id);

        if drafts.len() != before {
            self.write_all(&drafts)?;
            tracing::debug!(id, "deleted local draft");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

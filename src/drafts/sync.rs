use super::{DraftStore, LocalDraftStore, StoreResult};
use crate::form::FormState;
use crate::models::{generate_draft_id, Draft, DraftSummary};
use chrono::Utc;
use std::sync::Arc;

/// What happened on the remote side of a synchronized operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Remote store updated
    Synced,
    /// No remote store configured
    Disabled,
    /// Remote call failed; the local side still succeeded
    Failed(String),
}

impl RemoteStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, RemoteStatus::Failed(_))
    }
}

/// Result of a save or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub id: String,
    pub remote: RemoteStatus,
}

impl SyncOutcome {
    /// Message to show the user when the remote side failed
    pub fn warning(&self) -> Option<String> {
        match &self.remote {
            RemoteStatus::Failed(reason) => Some(format!(
                "Draft {} is safe locally but the remote copy was not updated: {}",
                self.id, reason
            )),
            _ => None,
        }
    }
}

/// Local-first draft repository mirroring to an optional remote store.
///
/// The local store is authoritative. Mutations land locally first and are
/// then pushed to the remote; reads come from local, with resume falling
/// back to remote for drafts saved on another machine.
pub struct DraftSynchronizer {
    local: LocalDraftStore,
    remote: Option<Arc<dyn DraftStore>>,
}

impl DraftSynchronizer {
    pub fn new(local: LocalDraftStore, remote: Option<Arc<dyn DraftStore>>) -> Self {
        Self { local, remote }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Save the working form, reusing its id or minting a new one
    pub async fn save(&self, state: &FormState) -> StoreResult<SyncOutcome> {
        let id = state
            .id
            .clone()
            .unwrap_or_else(|| generate_draft_id(Utc::now()));
        let draft = Draft::new(id, state.record.clone());
        self.save_draft(&draft).await
    }

    pub async fn save_draft(&self, draft: &Draft) -> StoreResult<SyncOutcome> {
        let id = self.local.save(draft).await?;

        let remote = match &self.remote {
            None => RemoteStatus::Disabled,
            Some(remote) => match remote.save(draft).await {
                Ok(_) => RemoteStatus::Synced,
                Err(e) => {
                    tracing::warn!(id = %draft.id, store = remote.name(), error = %e, "draft save failed");
                    RemoteStatus::Failed(e.to_string())
                }
            },
        };

        tracing::info!(id = %id, ?remote, "draft saved");
        Ok(SyncOutcome { id, remote })
    }

    pub async fn list(&self) -> StoreResult<Vec<DraftSummary>> {
        self.local.list().await
    }

    /// Remote listing; `Ok(None)` when no remote store is configured
    pub async fn list_remote(&self) -> StoreResult<Option<Vec<DraftSummary>>> {
        match &self.remote {
            None => Ok(None),
            Some(remote) => Ok(Some(remote.list().await?)),
        }
    }

    /// Find a draft by id, locally first
    pub async fn resume(&self, id: &str) -> StoreResult<Option<Draft>> {
        if let Some(draft) = self.local.get(id).await? {
            return Ok(Some(draft));
        }
        match &self.remote {
            None => Ok(None),
            Some(remote) => remote.get(id).await,
        }
    }

    /// Remove a draft from both stores. Unknown ids succeed.
    pub async fn delete(&self, id: &str) -> StoreResult<SyncOutcome> {
        self.local.delete(id).await?;

        let remote = match &self.remote {
            None => RemoteStatus::Disabled,
            Some(remote) => match remote.delete(id).await {
                Ok(()) => RemoteStatus::Synced,
                Err(e) => {
                    tracing::warn!(id, store = remote.name(), error = %e, "draft delete failed");
                    RemoteStatus::Failed(e.to_string())
                }
            },
        };

        tracing::info!(id, ?remote, "draft deleted");
        Ok(SyncOutcome {
            id: id.to_string(),
            remote,
        })
    }

    /// Mirror every local draft to the remote store
    pub async fn push(&self) -> Vec<SyncOutcome> {
        let Some(remote) = &self.remote else {
            return Vec::new();
        };

        let mut outcomes = Vec::new();
        for draft in self.local.load_all() {
            let status = match remote.save(&draft).await {
                Ok(_) => RemoteStatus::Synced,
                Err(e) => RemoteStatus::Failed(e.to_string()),
            };
            outcomes.push(SyncOutcome {
                id: draft.id,
                remote: status,
            });
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::drafts::StoreError;
    use crate::form::FormAction;
    use crate::models::{CaseRecord, MetadataField};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory remote, optionally failing every call
    #[derive(Default)]
    struct MemoryRemote {
        drafts: Mutex<Vec<Draft>>,
        fail: bool,
    }

    impl MemoryRemote {
        fn check(&self) -> StoreResult<()> {
            if self.fail {
                Err(StoreError::Remote(ClientError::Application(
                    "offline".to_string(),
                )))
            } else {
                Ok(())
            }
        }

        fn ids(&self) -> Vec<String> {
            self.drafts.lock().unwrap().iter().map(|d| d.id.clone()).collect()
        }
    }

    #[async_trait]
    impl DraftStore for MemoryRemote {
        async fn save(&self, draft: &Draft) -> StoreResult<String> {
            self.check()?;
            let mut drafts = self.drafts.lock().unwrap();
            drafts.retain(|d| d.id != draft.id);
            drafts.push(draft.clone());
            Ok(draft.id.clone())
        }

        async fn list(&self) -> StoreResult<Vec<DraftSummary>> {
            self.check()?;
            Ok(self.drafts.lock().unwrap().iter().map(Draft::summary).collect())
        }

        async fn get(&self, id: &str) -> StoreResult<Option<Draft>> {
            self.check()?;
            Ok(self.drafts.lock().unwrap().iter().find(|d| d.id == id).cloned())
        }

        async fn delete(&self, id: &str) -> StoreResult<()> {
            self.check()?;
            self.drafts.lock().unwrap().retain(|d| d.id != id);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "memory"
        }
    }

    fn setup(remote: Option<Arc<MemoryRemote>>) -> (TempDir, DraftSynchronizer) {
        let temp = TempDir::new().unwrap();
        let local = LocalDraftStore::new(temp.path());
        let sync = DraftSynchronizer::new(local, remote.map(|r| r as Arc<dyn DraftStore>));
        (temp, sync)
    }

    fn named_form(name: &str) -> FormState {
        FormState::new(10).apply(FormAction::SetField(MetadataField::Name, name.into()))
    }

    #[tokio::test]
    async fn test_save_mints_id_and_mirrors() {
        let remote = Arc::new(MemoryRemote::default());
        let (_temp, sync) = setup(Some(remote.clone()));

        let outcome = sync.save(&named_form("Ana")).await.unwrap();

        assert!(outcome.id.starts_with("PEND-"));
        assert_eq!(outcome.remote, RemoteStatus::Synced);
        assert!(outcome.warning().is_none());
        assert_eq!(remote.ids(), vec![outcome.id.clone()]);
        assert_eq!(sync.list().await.unwrap()[0].id, outcome.id);
    }

    #[tokio::test]
    async fn test_resave_keeps_single_entry_everywhere() {
        let remote = Arc::new(MemoryRemote::default());
        let (_temp, sync) = setup(Some(remote.clone()));

        let first = sync.save(&named_form("Ana")).await.unwrap();
        let form = named_form("Ana Li").apply(FormAction::AssignId(first.id.clone()));
        let second = sync.save(&form).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(sync.list().await.unwrap().len(), 1);
        assert_eq!(remote.ids().len(), 1);
        let resumed = sync.resume(&first.id).await.unwrap().unwrap();
        assert_eq!(resumed.record.employee.name, "Ana Li");
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces_as_warning() {
        let remote = Arc::new(MemoryRemote {
            fail: true,
            ..Default::default()
        });
        let (_temp, sync) = setup(Some(remote));

        let outcome = sync.save(&named_form("Ana")).await.unwrap();

        assert!(outcome.remote.is_failed());
        assert!(outcome.warning().unwrap().contains("offline"));
        assert_eq!(sync.list().await.unwrap().len(), 1);
        assert!(sync.list_remote().await.is_err());
    }

    #[tokio::test]
    async fn test_resume_falls_back_to_remote() {
        let remote = Arc::new(MemoryRemote::default());
        remote
            .save(&Draft::new("PEND-far", CaseRecord::new(10)))
            .await
            .unwrap();
        let (_temp, sync) = setup(Some(remote));

        assert!(sync.resume("PEND-far").await.unwrap().is_some());
        assert!(sync.resume("PEND-none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_from_both_and_tolerates_unknown() {
        let remote = Arc::new(MemoryRemote::default());
        let (_temp, sync) = setup(Some(remote.clone()));

        let saved = sync.save(&named_form("Ana")).await.unwrap();
        let outcome = sync.delete(&saved.id).await.unwrap();

        assert_eq!(outcome.remote, RemoteStatus::Synced);
        assert!(sync.list().await.unwrap().is_empty());
        assert!(remote.ids().is_empty());

        let outcome = sync.delete("PEND-none").await.unwrap();
        assert_eq!(outcome.remote, RemoteStatus::Synced);
    }

    #[tokio::test]
    async fn test_local_only() {
        let (_temp, sync) = setup(None);

        let outcome = sync.save(&named_form("Ana")).await.unwrap();
        assert_eq!(outcome.remote, RemoteStatus::Disabled);
        assert!(sync.list_remote().await.unwrap().is_none());
        assert!(sync.push().await.is_empty());
    }

    #[tokio::test]
    async fn test_push_mirrors_local_drafts() {
        let (temp, local_only) = setup(None);
        local_only.save(&named_form("A")).await.unwrap();
        local_only.save(&named_form("B")).await.unwrap();

        let remote = Arc::new(MemoryRemote::default());
        let sync = DraftSynchronizer::new(
            LocalDraftStore::new(temp.path()),
            Some(remote.clone() as Arc<dyn DraftStore>),
        );
        let outcomes = sync.push().await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.remote == RemoteStatus::Synced));
        assert_eq!(remote.ids().len(), 2);
    }
}

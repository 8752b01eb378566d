//! Draft synchronizer
//!
//! Drafts live behind the [`DraftStore`] trait with two backends:
//! - [`LocalDraftStore`]: a JSON file on this machine, the source of truth
//! - [`RemoteDraftStore`]: the spreadsheet backend, reached through the proxy
//!
//! [`DraftSynchronizer`] combines them with a fixed local → remote direction.

mod local;
mod remote;
mod sync;

pub use local::{LocalDraftStore, LOCAL_DRAFTS_KEY};
pub use remote::RemoteDraftStore;
pub use sync::{DraftSynchronizer, RemoteStatus, SyncOutcome};

use crate::client::ClientError;
use crate::models::{Draft, DraftSummary};
use async_trait::async_trait;

/// Errors raised by a draft backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write drafts file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize drafts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] ClientError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Create-or-update / list / get / delete over drafts keyed by id
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Insert the draft, replacing any draft with the same id.
    /// Returns the id under which it was stored.
    async fn save(&self, draft: &Draft) -> StoreResult<String>;

    /// Summaries of all stored drafts, most recently saved first
    async fn list(&self) -> StoreResult<Vec<DraftSummary>>;

    /// Full draft by id
    async fn get(&self, id: &str) -> StoreResult<Option<Draft>>;

    /// Remove a draft. Unknown ids are not an error.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Name for messages
    fn name(&self) -> &'static str;
}

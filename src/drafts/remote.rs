use super::{DraftStore, StoreResult};
use crate::client::ProxyClient;
use crate::models::{Draft, DraftSummary};
use async_trait::async_trait;

/// Drafts kept in the spreadsheet backend
#[derive(Debug, Clone)]
pub struct RemoteDraftStore {
    client: ProxyClient,
}

impl RemoteDraftStore {
    pub fn new(client: ProxyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DraftStore for RemoteDraftStore {
    async fn save(&self, draft: &Draft) -> StoreResult<String> {
        Ok(self.client.save_pending(draft).await?)
    }

    async fn list(&self) -> StoreResult<Vec<DraftSummary>> {
        Ok(self.client.list_pending().await?)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Draft>> {
        Ok(self.client.get_pending(id).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        Ok(self.client.delete_pending(id).await?)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

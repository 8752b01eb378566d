//! Case submission
//!
//! Closing a case sends the whole form once through the proxy. On success the
//! matching draft is removed everywhere; on failure nothing changes and the
//! user can retry.

use crate::client::{CaseSubmission, ClientError, ProxyClient};
use crate::drafts::{DraftSynchronizer, SyncOutcome};
use crate::form::FormState;
use crate::models::generate_draft_id;
use chrono::Utc;

/// Successful submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Id the case was submitted under
    pub id: String,

    /// Cleanup of the matching draft
    pub cleanup: SyncOutcome,
}

pub struct Submitter<'a> {
    client: &'a ProxyClient,
    drafts: &'a DraftSynchronizer,
}

impl<'a> Submitter<'a> {
    pub fn new(client: &'a ProxyClient, drafts: &'a DraftSynchronizer) -> Self {
        Self { client, drafts }
    }

    /// Build the CLOSE_CASE payload for a form
    pub fn submission(state: &FormState) -> CaseSubmission {
        CaseSubmission {
            id: state
                .id
                .clone()
                .unwrap_or_else(|| generate_draft_id(Utc::now())),
            submitted_at: Utc::now().to_rfc3339(),
            record: state.record.clone(),
        }
    }

    /// Send the case. Drafts are only touched after the backend accepted it.
    pub async fn submit(&self, state: &FormState) -> Result<SubmitReceipt, ClientError> {
        let submission = Self::submission(state);
        let id = submission.id.clone();

        self.client.close_case(submission).await.map_err(|e| {
            tracing::warn!(id = %id, error = %e, "case submission failed");
            e
        })?;
        tracing::info!(id = %id, "case closed");

        let cleanup = match self.drafts.delete(&id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Case is already closed upstream; report the leftover draft.
                tracing::warn!(id = %id, error = %e, "could not remove draft after submit");
                SyncOutcome {
                    id: id.clone(),
                    remote: crate::drafts::RemoteStatus::Failed(e.to_string()),
                }
            }
        };

        Ok(SubmitReceipt { id, cleanup })
    }
}

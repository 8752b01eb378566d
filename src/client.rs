//! Proxy client
//!
//! Speaks the action protocol of the spreadsheet backend: every call is a
//! single POST of `{action, ...fields}` answered by `{ok, rows?, id?, draft?, error?}`.
//! Nothing is retried.

use crate::models::{CaseRecord, Draft, DraftSummary};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors surfaced by a proxy call
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response from server: {raw}")]
    MalformedResponse { raw: String },

    #[error("Server rejected the request: {0}")]
    Application(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Request body sent to the proxy
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProxyRequest {
    SavePending { payload: Draft },
    ListPending,
    GetPending { id: String },
    DeletePending { id: String },
    CloseCase { payload: CaseSubmission },
}

impl ProxyRequest {
    pub fn action(&self) -> &'static str {
        match self {
            ProxyRequest::SavePending { .. } => "SAVE_PENDING",
            ProxyRequest::ListPending => "LIST_PENDING",
            ProxyRequest::GetPending { .. } => "GET_PENDING",
            ProxyRequest::DeletePending { .. } => "DELETE_PENDING",
            ProxyRequest::CloseCase { .. } => "CLOSE_CASE",
        }
    }
}

/// Whole case sent when closing: both phases, header and percentages
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSubmission {
    pub id: String,
    pub submitted_at: String,
    #[serde(flatten)]
    pub record: CaseRecord,
}

/// Response body returned by the proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyResponse {
    #[serde(default)]
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<DraftSummary>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<Draft>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProxyResponse {
    /// Turn `ok: false` into an application error
    pub fn into_result(self) -> ClientResult<Self> {
        if self.ok {
            return Ok(self);
        }
        let message = match (&self.error, &self.detail) {
            (Some(error), Some(detail)) => format!("{} ({})", error, detail),
            (Some(error), None) => error.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => "request not accepted".to_string(),
        };
        Err(ClientError::Application(message))
    }
}

/// HTTP client bound to one proxy endpoint
#[derive(Debug, Clone)]
pub struct ProxyClient {
    endpoint: String,
    http: reqwest::Client,
}

impl ProxyClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// Send one action and decode the reply.
    ///
    /// Bodies that are not JSON become `MalformedResponse` carrying the raw
    /// text; `ok: false` becomes `Application`.
    pub async fn call(&self, request: &ProxyRequest) -> ClientResult<ProxyResponse> {
        tracing::debug!(action = request.action(), endpoint = %self.endpoint, "proxy call");

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json;charset=utf-8")
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;

        let parsed: ProxyResponse = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(action = request.action(), %status, error = %e, "non-JSON reply");
                return Err(ClientError::MalformedResponse { raw });
            }
        };

        parsed.into_result()
    }

    pub async fn save_pending(&self, draft: &Draft) -> ClientResult<String> {
        let response = self
            .call(&ProxyRequest::SavePending {
                payload: draft.clone(),
            })
            .await?;
        Ok(response.id.unwrap_or_else(|| draft.id.clone()))
    }

    pub async fn list_pending(&self) -> ClientResult<Vec<DraftSummary>> {
        let response = self.call(&ProxyRequest::ListPending).await?;
        Ok(response.rows.unwrap_or_default())
    }

    pub async fn get_pending(&self, id: &str) -> ClientResult<Option<Draft>> {
        let response = self
            .call(&ProxyRequest::GetPending { id: id.to_string() })
            .await?;
        Ok(response.draft)
    }

    pub async fn delete_pending(&self, id: &str) -> ClientResult<()> {
        self.call(&ProxyRequest::DeletePending { id: id.to_string() })
            .await?;
        Ok(())
    }

    pub async fn close_case(&self, submission: CaseSubmission) -> ClientResult<ProxyResponse> {
        self.call(&ProxyRequest::CloseCase {
            payload: submission,
        })
        .await
    }
}

// SOC V3 - Behavior observation forms
// Working form, drafts, and the proxy that forwards cases to the spreadsheet

pub mod cli;
pub mod client;
pub mod config;
pub mod drafts;
pub mod form;
pub mod logging;
pub mod models;
pub mod proxy;
pub mod submit;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use client::{ClientError, ProxyClient};
pub use config::SocConfig;
pub use drafts::{DraftStore, DraftSynchronizer, LocalDraftStore, RemoteDraftStore};
pub use form::{FormAction, FormSession, FormState};
pub use models::{CaseRecord, Catalog, Choice, Draft, Phase};
pub use submit::Submitter;

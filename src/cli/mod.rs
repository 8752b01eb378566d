pub mod config;
pub mod draft;
pub mod form;
pub mod serve;
pub mod submit;

use crate::client::ProxyClient;
use crate::config::SocConfig;
use crate::drafts::{DraftStore, DraftSynchronizer, LocalDraftStore, RemoteDraftStore};
use crate::form::FormSession;
use crate::models::Catalog;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Everything a command needs: config, where files live, the item catalog
pub struct AppContext {
    pub config: SocConfig,
    pub data_dir: PathBuf,
    pub catalog: Catalog,
}

impl AppContext {
    pub fn new(config: SocConfig, data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir_override {
            Some(dir) => dir,
            None => config.data_dir()?,
        };
        Ok(Self {
            config,
            data_dir,
            catalog: Catalog::default(),
        })
    }

    pub fn session(&self) -> Result<FormSession> {
        FormSession::load(&self.data_dir, self.catalog.len())
    }

    pub fn client(&self) -> Result<ProxyClient> {
        Ok(ProxyClient::new(
            self.config.client.endpoint.clone(),
            self.config.client.timeout(),
        )?)
    }

    /// Local store, plus the remote mirror unless disabled in config or by flag
    pub fn synchronizer(&self, local_only: bool) -> Result<DraftSynchronizer> {
        let local = LocalDraftStore::new(&self.data_dir);
        let remote = if local_only || !self.config.client.remote_drafts {
            None
        } else {
            Some(Arc::new(RemoteDraftStore::new(self.client()?)) as Arc<dyn DraftStore>)
        };
        Ok(DraftSynchronizer::new(local, remote))
    }
}

/// Spinner shown while waiting on the network
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .map(|s| s.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "))
    {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

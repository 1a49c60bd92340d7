use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::ClientResult;
use crate::api::ApiClient;
use crate::config::{ClientConfig, ensure_client_directory};
use crate::http::{ReqwestTransport, Transport};
use crate::import::ImportWizard;
use crate::session::{ActivitySink, SessionStore};
use crate::transfers::TransferManager;

/// What an open client screen holds: configuration, the authenticated API and
/// the state of the transfer and import views.
///
/// One-shot commands build a fresh page; the interactive shell keeps one.
pub struct Page {
    config: ClientConfig,
    pub(crate) api: ApiClient,
    pub transfers: TransferManager,
    pub import: ImportWizard,
}

impl Page {
    pub fn open() -> ClientResult<Self> {
        Self::open_with_home_override(None)
    }

    #[doc(hidden)]
    pub fn open_with_home_override(home_override: Option<&Path>) -> ClientResult<Self> {
        let config = ClientConfig::load_with_home_override(home_override)?;
        let transport = ReqwestTransport::new(&config.api_url)?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> ClientResult<Self> {
        ensure_client_directory(&config.home)?;
        let session = SessionStore::load(&config.session_path())?;
        debug!(
            api_url = %config.api_url,
            authenticated = session.is_authenticated(),
            "page opened"
        );
        Ok(Self {
            api: ApiClient::new(transport, session),
            config,
            transfers: TransferManager::new(),
            import: ImportWizard::new(),
        })
    }

    /// Routes request activity to an inactivity guard.
    pub fn with_activity(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.api = self.api.with_activity(sink);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

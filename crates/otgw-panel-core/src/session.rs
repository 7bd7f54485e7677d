//! Per-panel session state
//!
//! The gateway definitions are fetched the first time a tab needs them and
//! shared read-only afterwards. A failed fetch leaves the session unloaded,
//! so the next visit tries again.

use crate::catalog::{HardwareCatalog, MessageCatalog};
use crate::controller::{DeviceId, RequestKind};
use crate::panels::PanelError;
use crate::variables::VariableAccessor;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// State shared by the tabs of one gateway device's control panel
pub struct Session {
    device: DeviceId,
    vars: VariableAccessor,
    messages: OnceCell<Arc<MessageCatalog>>,
    hardware: OnceCell<Arc<HardwareCatalog>>,
}

impl Session {
    /// New, unloaded session for `device`
    pub fn new(vars: VariableAccessor, device: DeviceId) -> Self {
        Self {
            device,
            vars,
            messages: OnceCell::new(),
            hardware: OnceCell::new(),
        }
    }

    /// Gateway device number
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Variable access for the gateway device
    pub fn variables(&self) -> &VariableAccessor {
        &self.vars
    }

    /// Message definitions, if already loaded
    pub fn messages(&self) -> Option<Arc<MessageCatalog>> {
        self.messages.get().cloned()
    }

    /// Hardware tables, if already loaded
    pub fn hardware(&self) -> Option<Arc<HardwareCatalog>> {
        self.hardware.get().cloned()
    }

    /// Message definitions, fetching them on first use
    pub async fn load_messages(&self) -> Result<Arc<MessageCatalog>, PanelError> {
        let catalog = self
            .messages
            .get_or_try_init(|| async {
                let json = self.fetch(RequestKind::GetMessages).await?;
                let catalog = MessageCatalog::from_json(&json)?;
                tracing::info!(device = %self.device, messages = catalog.len(), "message definitions loaded");
                Ok::<_, PanelError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// Hardware tables, fetching them on first use
    pub async fn load_hardware(&self) -> Result<Arc<HardwareCatalog>, PanelError> {
        let catalog = self
            .hardware
            .get_or_try_init(|| async {
                let json = self.fetch(RequestKind::GetConfiguration).await?;
                let catalog = HardwareCatalog::from_json(&json)?;
                tracing::info!(
                    device = %self.device,
                    categories = catalog.categories().len(),
                    "hardware configuration loaded"
                );
                Ok::<_, PanelError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    async fn fetch(&self, kind: RequestKind) -> Result<serde_json::Value, PanelError> {
        let json = self
            .vars
            .controller()
            .fetch_json(kind, self.device, self.vars.service())
            .await?;
        Ok(json)
    }
}

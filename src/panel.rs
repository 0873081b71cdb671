//! Registry enforcing at most one open board panel and bridge controller.

use std::sync::{Arc, Mutex};
use thiserror::Error;
use wrike_api::{WrikeClient, WrikeConfig, WrikeError};

use crate::controller::{BridgeController, HostNotifier, MessageSink};

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Wrike token not found. Please run \"Set Token\" first.")]
    MissingToken,
    #[error(transparent)]
    Client(#[from] WrikeError),
}

/// What `open` did with the slot.
pub enum PanelHandle {
    /// A panel was already open and should be revealed.
    Existing(Arc<BridgeController>),
    /// A new controller was bound; the caller must create its window.
    Created(Arc<BridgeController>),
}

#[derive(Default)]
pub struct PanelRegistry {
    slot: Mutex<Option<Arc<BridgeController>>>,
}

impl PanelRegistry {
    pub fn current(&self) -> Option<Arc<BridgeController>> {
        self.slot.lock().unwrap().clone()
    }

    /// Returns the open controller, or binds a new one to `token`. Without a
    /// token nothing is created.
    pub fn open(
        &self,
        token: Option<String>,
        config: &WrikeConfig,
        sink: Arc<dyn MessageSink>,
        notifier: Arc<dyn HostNotifier>,
    ) -> Result<PanelHandle, OpenError> {
        let mut slot = self.slot.lock().unwrap();
        if let Some(existing) = slot.as_ref() {
            return Ok(PanelHandle::Existing(existing.clone()));
        }

        let token = token
            .filter(|value| !value.trim().is_empty())
            .ok_or(OpenError::MissingToken)?;
        let client = WrikeClient::new(config.clone().with_token(token))?;
        let controller = Arc::new(BridgeController::new(client, sink, notifier));
        *slot = Some(controller.clone());
        Ok(PanelHandle::Created(controller))
    }

    /// Rebinds the open controller, if any, to a new token.
    pub fn rebind(&self, config: &WrikeConfig, token: &str) -> Result<bool, WrikeError> {
        let Some(controller) = self.current() else {
            return Ok(false);
        };
        let client = WrikeClient::new(config.clone().with_token(token))?;
        controller.rebind(client);
        Ok(true)
    }

    pub fn close(&self) -> Option<Arc<BridgeController>> {
        self.slot.lock().unwrap().take()
    }
}

//! Browser integrations: `localStorage` session store and `confirm()` prompts

use std::sync::Arc;

use sensor_client::config::SessionConfig;
use sensor_client::session::SessionStore;
use sensor_client::view::Confirm;

/// Session store backed by `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageSessionStore {
    key: String,
}

impl LocalStorageSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> sensor_client::Result<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| sensor_client::DashboardError::Session("no window".to_string()))?
        .local_storage()
        .map_err(|e| sensor_client::DashboardError::Session(format!("{:?}", e)))?
        .ok_or_else(|| {
            sensor_client::DashboardError::Session("localStorage unavailable".to_string())
        })
}

#[cfg(feature = "csr")]
impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> sensor_client::Result<Option<String>> {
        local_storage()?
            .get_item(&self.key)
            .map_err(|e| sensor_client::DashboardError::Session(format!("{:?}", e)))
    }

    fn save(&self, token: &str) -> sensor_client::Result<()> {
        local_storage()?
            .set_item(&self.key, token)
            .map_err(|e| sensor_client::DashboardError::Session(format!("{:?}", e)))
    }

    fn clear(&self) -> sensor_client::Result<()> {
        local_storage()?
            .remove_item(&self.key)
            .map_err(|e| sensor_client::DashboardError::Session(format!("{:?}", e)))
    }
}

/// `localStorage` in the browser, memory elsewhere
pub fn session_store(config: &SessionConfig) -> Arc<dyn SessionStore> {
    #[cfg(feature = "csr")]
    {
        Arc::new(LocalStorageSessionStore::new(config.storage_key.clone()))
    }

    #[cfg(not(feature = "csr"))]
    {
        tracing::debug!(
            "No browser storage, keeping {:?} in memory",
            config.storage_key
        );
        Arc::new(sensor_client::session::MemorySessionStore::default())
    }
}

/// Asks through `window.confirm()`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, message: &str) -> bool {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|window| window.confirm_with_message(message).ok())
                .unwrap_or(false)
        }

        #[cfg(not(feature = "csr"))]
        {
            tracing::debug!("No browser to confirm {:?}, declining", message);
            false
        }
    }
}

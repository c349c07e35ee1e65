//! Session context holding the current bearer token
//!
//! The token is persisted through a [`SessionStore`] so a reload keeps the
//! user logged in. Views receive an `Arc<Session>` instead of reaching for
//! global state, which lets tests substitute an in-memory store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Key the token is persisted under
pub const TOKEN_KEY: &str = "token";

/// Persistent storage for the session token
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Read the persisted token, if any
    fn load(&self) -> crate::Result<Option<String>>;

    /// Persist a token, replacing any previous one
    fn save(&self, token: &str) -> crate::Result<()>;

    /// Remove the persisted token
    fn clear(&self) -> crate::Result<()>;
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> crate::Result<Option<String>> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, token: &str) -> crate::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Store backed by a small JSON object on disk, e.g. `{"token": "..."}`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> crate::Result<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(crate::DashboardError::Session(format!(
                "Failed to read {:?}: {}",
                self.path, e
            ))),
        }
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> crate::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?).map_err(|e| {
            crate::DashboardError::Session(format!("Failed to write {:?}: {}", self.path, e))
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> crate::Result<Option<String>> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    fn save(&self, token: &str) -> crate::Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> crate::Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// File store when `token_file` is configured, otherwise an in-memory one
pub fn store_from_config(config: &crate::config::SessionConfig) -> Arc<dyn SessionStore> {
    match &config.token_file {
        Some(path) => Arc::new(FileSessionStore::new(path, config.storage_key.clone())),
        None => Arc::new(MemorySessionStore::default()),
    }
}

/// The process-wide session
pub struct Session {
    store: Arc<dyn SessionStore>,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Build a session from whatever token the store holds
    pub fn restore(store: Arc<dyn SessionStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Could not read persisted session, starting logged out: {}", e);
                None
            }
        };
        tracing::debug!("Session restored (authenticated: {})", token.is_some());
        Self {
            store,
            token: RwLock::new(token),
        }
    }

    /// Session with no persistence, for tests and non-browser callers
    pub fn in_memory(token: Option<&str>) -> Self {
        let store = match token {
            Some(token) => MemorySessionStore::with_token(token),
            None => MemorySessionStore::default(),
        };
        Self::restore(Arc::new(store))
    }

    /// Persist the token and mark the session authenticated
    pub fn login(&self, token: impl Into<String>) -> crate::Result<()> {
        let token = token.into();
        self.store.save(&token)?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
        tracing::info!("Logged in");
        Ok(())
    }

    /// Forget the token. The in-memory state is cleared even if the store fails.
    pub fn logout(&self) -> crate::Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        tracing::info!("Logged out");
        self.store.clear()
    }

    pub fn current(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

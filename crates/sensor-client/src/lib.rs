//! Sensor Dashboard client
//!
//! Form validation, session handling, a typed client for the sensor REST API
//! and the list/detail view state that the dashboard pages render.

pub mod api;
pub mod auth;
pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod io;
pub mod models;
pub mod route;
pub mod sensor_detail;
pub mod sensor_list;
pub mod session;
pub mod validation;
pub mod view;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::path::Path;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::io::HttpClient;
use crate::models::SensorId;
use crate::route::{guard, Navigation, Route};
use crate::sensor_detail::SensorDetailView;
use crate::sensor_list::SensorListView;
use crate::session::{store_from_config, Session, SessionStore};

/// Everything a page needs: configuration, the API client and the session
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: Config,
    api: ApiClient,
    session: Arc<Session>,
}

impl Dashboard {
    pub fn new(config: Config, http: Arc<dyn HttpClient>, store: Arc<dyn SessionStore>) -> Self {
        let api = ApiClient::new(&config.api, http);
        let session = Arc::new(Session::restore(store));
        tracing::debug!(
            "Dashboard ready for {} (authenticated: {})",
            api.base_url(),
            session.is_authenticated()
        );
        Self {
            config,
            api,
            session,
        }
    }

    /// Native setup: config file plus environment, with the session kept in
    /// `session.token_file` when one is configured
    pub fn from_config_file(path: &Path, http: Arc<dyn HttpClient>) -> Result<Self> {
        let config = load_config(path)?;
        let store = store_from_config(&config.session);
        Ok(Self::new(config, http, store))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Resolve a path against the current session
    pub fn navigate(&self, path: &str) -> Option<Navigation> {
        Route::parse(path).map(|route| guard(route, self.session.is_authenticated()))
    }

    pub fn sensor_list(&self) -> SensorListView {
        SensorListView::new(
            self.api.clone(),
            Arc::clone(&self.session),
            &self.config.sensors,
        )
    }

    pub fn sensor_detail(&self, sensor_id: SensorId) -> SensorDetailView {
        SensorDetailView::new(self.api.clone(), Arc::clone(&self.session), sensor_id)
    }
}

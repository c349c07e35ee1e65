//! BDD test world for the sensor dashboard client

use std::sync::Arc;

use cucumber::World;
use sensor_client::auth::AuthForm;
use sensor_client::route::Navigation;
use sensor_client::sensor_detail::SensorDetailView;
use sensor_client::sensor_list::SensorListView;
use sensor_client::session::MemorySessionStore;
use sensor_client::view::Outcome;
use sensor_client::{Config, Dashboard};

use crate::backend::FakeBackend;

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    pub backend: Arc<FakeBackend>,
    pub dashboard: Option<Dashboard>,
    pub config: Config,

    // Auth forms
    pub auth_form: Option<AuthForm>,

    // Views
    pub list: Option<SensorListView>,
    pub detail: Option<SensorDetailView>,

    pub last_outcome: Option<Outcome>,
    pub navigation: Option<Navigation>,
}

impl DashboardWorld {
    /// The dashboard, built on first use against the fake backend
    pub fn dashboard(&mut self) -> &Dashboard {
        if self.dashboard.is_none() {
            self.dashboard = Some(Dashboard::new(
                self.config.clone(),
                self.backend.clone(),
                Arc::new(MemorySessionStore::default()),
            ));
        }
        self.dashboard.as_ref().expect("dashboard just built")
    }

    pub fn list(&mut self) -> &mut SensorListView {
        self.list.as_mut().expect("sensor list not opened")
    }

    pub fn detail(&mut self) -> &mut SensorDetailView {
        self.detail.as_mut().expect("sensor detail not opened")
    }

    /// Messages shown by whichever form was submitted last
    pub fn form_errors(&self) -> Vec<String> {
        if let Some(Outcome::Rejected(errors)) = &self.last_outcome {
            return errors.clone();
        }
        self.auth_form
            .as_ref()
            .map(|form| form.errors.clone())
            .unwrap_or_default()
    }
}

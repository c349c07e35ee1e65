//! Sensor list view: paging, search and sensor mutations
//!
//! [`SensorListState`] is the synchronous state machine; it can be driven by
//! any executor (the browser front end keeps it in a signal).
//! [`SensorListView`] pairs it with an [`ApiClient`] and a [`Session`] and
//! runs each step to completion.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::SensorListConfig;
use crate::error::messages;
use crate::fetch::{FetchTracker, Ticket};
use crate::models::{NewSensor, Sensor, SensorId, SensorPage, SensorQuery, SensorUpdate};
use crate::session::Session;
use crate::validation::{validate_new_sensor, validate_sensor_update};
use crate::view::{Confirm, Outcome};

/// What the list should currently show
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub page: u32,
    pub search: String,
}

impl From<&ListKey> for SensorQuery {
    fn from(key: &ListKey) -> Self {
        SensorQuery {
            page: key.page,
            search: key.search.clone(),
        }
    }
}

/// Number of pages needed for `count` items, never less than one
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// State of the sensor list page
#[derive(Debug, Clone)]
pub struct SensorListState {
    pub sensors: Vec<Sensor>,
    pub page: u32,
    pub total_pages: u32,
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
    pub create_form_open: bool,
    /// Sensor whose edit form is open
    pub editing: Option<SensorId>,
    page_size: u32,
    reset_page_on_search: bool,
    tracker: FetchTracker<ListKey>,
}

impl Default for SensorListState {
    fn default() -> Self {
        Self::new(&SensorListConfig::default())
    }
}

impl SensorListState {
    pub fn new(config: &SensorListConfig) -> Self {
        Self {
            sensors: Vec::new(),
            page: 1,
            total_pages: 1,
            search: String::new(),
            loading: false,
            error: None,
            create_form_open: false,
            editing: None,
            page_size: config.page_size.max(1),
            reset_page_on_search: config.reset_page_on_search,
            tracker: FetchTracker::new(),
        }
    }

    pub fn key(&self) -> ListKey {
        ListKey {
            page: self.page,
            search: self.search.clone(),
        }
    }

    /// Move to `page`, clamped to `[1, total_pages]`. Returns true if the key changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let clamped = page.clamp(1, self.total_pages.max(1));
        if clamped == self.page {
            return false;
        }
        self.page = clamped;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Change the search term. Returns true if the key changed.
    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if search == self.search {
            return false;
        }
        self.search = search;
        if self.reset_page_on_search {
            self.page = 1;
        }
        true
    }

    /// Start fetching the current key
    pub fn begin_refresh(&mut self) -> Ticket<ListKey> {
        self.loading = true;
        self.tracker.begin(self.key())
    }

    /// Apply a fetch result. Returns true if it was for the current key.
    pub fn complete_refresh(
        &mut self,
        ticket: &Ticket<ListKey>,
        result: crate::Result<SensorPage>,
    ) -> bool {
        let current = self.key();
        let applies = self.tracker.finish(ticket, &current);
        self.loading = self.tracker.is_pending();
        if !applies {
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!(
                    "Loaded {} sensors (count {}) for {:?}",
                    page.items.len(),
                    page.count,
                    current
                );
                self.total_pages = total_pages(page.count, self.page_size);
                self.sensors = page.items;
            }
            Err(e) => {
                tracing::warn!("Failed to load sensors for {:?}: {}", current, e);
                self.fail(messages::LOAD_SENSORS_FAILED);
            }
        }
        true
    }

    /// Record a failure, replacing any earlier message
    pub fn fail(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn open_create_form(&mut self) {
        self.create_form_open = true;
    }

    pub fn close_create_form(&mut self) {
        self.create_form_open = false;
    }

    pub fn start_editing(&mut self, id: SensorId) {
        self.editing = Some(id);
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    /// Check a new sensor before it is sent
    pub fn prepare_create(&self, sensor: &NewSensor) -> Result<(), Outcome> {
        let errors = validate_new_sensor(sensor);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Outcome::Rejected(errors))
        }
    }

    /// Apply the server's answer to a create. `Applied` means refresh next.
    pub fn complete_create(&mut self, result: crate::Result<Sensor>) -> Outcome {
        match result {
            Ok(created) => {
                tracing::debug!("Created sensor {} ({})", created.id, created.name);
                self.close_create_form();
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to create sensor: {}", e);
                self.fail(messages::CREATE_SENSOR_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Check an update before it is sent. Nothing to change is `Cancelled`.
    pub fn prepare_update(&self, changes: &SensorUpdate) -> Result<(), Outcome> {
        if changes.is_empty() {
            return Err(Outcome::Cancelled);
        }
        let errors = validate_sensor_update(changes);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Outcome::Rejected(errors))
        }
    }

    /// Apply the server's answer to an update. `Applied` means refresh next.
    pub fn complete_update(&mut self, id: SensorId, result: crate::Result<Sensor>) -> Outcome {
        match result {
            Ok(_) => {
                tracing::debug!("Updated sensor {}", id);
                if self.editing == Some(id) {
                    self.stop_editing();
                }
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to update sensor {}: {}", id, e);
                self.fail(messages::UPDATE_SENSOR_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Ask before deleting. A declined prompt is `Cancelled`.
    pub fn prepare_delete(&self, id: SensorId, confirm: &impl Confirm) -> Result<(), Outcome> {
        if confirm.confirm(messages::DELETE_CONFIRMATION) {
            Ok(())
        } else {
            tracing::debug!("Deletion of sensor {} cancelled", id);
            Err(Outcome::Cancelled)
        }
    }

    /// Apply the server's answer to a delete. `Applied` means refresh next.
    pub fn complete_delete(&mut self, id: SensorId, result: crate::Result<()>) -> Outcome {
        match result {
            Ok(()) => {
                tracing::debug!("Deleted sensor {}", id);
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to delete sensor {}: {}", id, e);
                self.fail(messages::DELETE_SENSOR_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Nothing fetched yet and a fetch is running
    pub fn is_initial_load(&self) -> bool {
        self.loading && self.sensors.is_empty()
    }

    /// A fetch finished and returned no sensors
    pub fn is_empty(&self) -> bool {
        !self.loading && self.sensors.is_empty()
    }

    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

/// Sensor list state wired to the API
#[derive(Debug)]
pub struct SensorListView {
    state: SensorListState,
    api: ApiClient,
    session: Arc<Session>,
}

impl SensorListView {
    pub fn new(api: ApiClient, session: Arc<Session>, config: &SensorListConfig) -> Self {
        Self {
            state: SensorListState::new(config),
            api,
            session,
        }
    }

    pub fn state(&self) -> &SensorListState {
        &self.state
    }

    /// Fetch the current page and search. Every mutation ends here.
    pub async fn refresh(&mut self) {
        let ticket = self.state.begin_refresh();
        let token = self.session.current();
        let result = self
            .api
            .list_sensors(token.as_deref(), &SensorQuery::from(ticket.key()))
            .await;
        self.state.complete_refresh(&ticket, result);
    }

    pub async fn set_page(&mut self, page: u32) {
        if self.state.set_page(page) {
            self.refresh().await;
        }
    }

    pub async fn next_page(&mut self) {
        if self.state.next_page() {
            self.refresh().await;
        }
    }

    pub async fn previous_page(&mut self) {
        if self.state.previous_page() {
            self.refresh().await;
        }
    }

    pub async fn set_search(&mut self, search: impl Into<String>) {
        if self.state.set_search(search) {
            self.refresh().await;
        }
    }

    pub fn open_create_form(&mut self) {
        self.state.open_create_form();
    }

    pub fn close_create_form(&mut self) {
        self.state.close_create_form();
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }

    pub fn start_editing(&mut self, id: SensorId) {
        self.state.start_editing(id);
    }

    pub fn stop_editing(&mut self) {
        self.state.stop_editing();
    }

    async fn refresh_if_applied(&mut self, outcome: Outcome) -> Outcome {
        if outcome.is_applied() {
            self.refresh().await;
        }
        outcome
    }

    /// Create a sensor, then close the form and refresh
    pub async fn create(&mut self, sensor: NewSensor) -> Outcome {
        if let Err(outcome) = self.state.prepare_create(&sensor) {
            return outcome;
        }
        let token = self.session.current();
        let result = self.api.create_sensor(token.as_deref(), &sensor).await;
        let outcome = self.state.complete_create(result);
        self.refresh_if_applied(outcome).await
    }

    /// Change some fields of a sensor, then refresh
    pub async fn update(&mut self, id: SensorId, changes: SensorUpdate) -> Outcome {
        if let Err(outcome) = self.state.prepare_update(&changes) {
            return outcome;
        }
        let token = self.session.current();
        let result = self.api.update_sensor(token.as_deref(), id, &changes).await;
        let outcome = self.state.complete_update(id, result);
        self.refresh_if_applied(outcome).await
    }

    /// Delete a sensor after confirmation, then refresh the same page and search
    pub async fn delete(&mut self, id: SensorId, confirm: &impl Confirm) -> Outcome {
        if let Err(outcome) = self.state.prepare_delete(id, confirm) {
            return outcome;
        }
        let token = self.session.current();
        let result = self.api.delete_sensor(token.as_deref(), id).await;
        let outcome = self.state.complete_delete(id, result);
        self.refresh_if_applied(outcome).await
    }
}

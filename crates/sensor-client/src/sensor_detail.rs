//! Sensor detail view: one sensor, its readings and the add-reading form
//!
//! The fetch key is the sensor id plus the date range. Changing either
//! refetches the sensor record and the filtered readings; adding a reading
//! refetches the readings only.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::api::ApiClient;
use crate::chart::{chart_series, ChartPoint};
use crate::error::messages;
use crate::fetch::{FetchTracker, Ticket};
use crate::models::{parse_naive, NewReading, Reading, Sensor, SensorId};
use crate::session::Session;
use crate::view::Outcome;

pub const TEMPERATURE_INVALID: &str = "Temperature must be a number.";
pub const HUMIDITY_INVALID: &str = "Humidity must be a number.";
pub const TIMESTAMP_INVALID: &str = "Timestamp must be a valid date and time.";

/// Format of a `datetime-local` input value
pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Inclusive timestamp filter. An empty bound is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.from.trim().is_empty() && self.to.trim().is_empty()
    }

    /// Query parameters for the readings endpoint, skipping empty bounds
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.from.trim().is_empty() {
            pairs.push(("timestamp_from", self.from.trim().to_string()));
        }
        if !self.to.trim().is_empty() {
            pairs.push(("timestamp_to", self.to.trim().to_string()));
        }
        pairs
    }
}

/// What the detail view should currently show
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailKey {
    pub sensor_id: SensorId,
    pub range: DateRange,
}

/// Load state of the sensor record
#[derive(Debug, Clone, PartialEq)]
pub enum SensorRecord {
    Pending,
    Loaded(Sensor),
    /// The record could not be fetched (missing, forbidden or unreachable)
    Unavailable,
}

/// Convert a local `YYYY-MM-DDTHH:MM[:SS]` value to UTC.
///
/// Values that already carry an offset are converted directly. A local time
/// that does not exist in `tz` (skipped by a DST change) is an error; an
/// ambiguous one resolves to the earlier instant.
pub fn normalize_local_timestamp<Tz: TimeZone>(
    input: &str,
    tz: &Tz,
) -> crate::Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive =
        parse_naive(input).map_err(|_| crate::DashboardError::Timestamp(input.to_string()))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| crate::DashboardError::Timestamp(input.to_string()))
}

/// Raw inputs of the add-reading form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingForm {
    pub temperature: String,
    pub humidity: String,
    pub timestamp: String,
}

impl Default for ReadingForm {
    fn default() -> Self {
        Self::starting_at(Local::now())
    }
}

impl ReadingForm {
    /// Empty numbers and `now` as the timestamp
    pub fn starting_at<Tz: TimeZone>(now: DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            temperature: String::new(),
            humidity: String::new(),
            timestamp: now.format(LOCAL_INPUT_FORMAT).to_string(),
        }
    }

    /// Coerce the inputs into a request body, reading the timestamp in `tz`
    pub fn parse_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewReading, Vec<String>> {
        let temperature = parse_number(&self.temperature);
        let humidity = parse_number(&self.humidity);
        let timestamp = normalize_local_timestamp(&self.timestamp, tz);

        match (temperature, humidity, timestamp) {
            (Some(temperature), Some(humidity), Ok(timestamp)) => Ok(NewReading {
                temperature,
                humidity,
                timestamp,
            }),
            (temperature, humidity, timestamp) => {
                let mut errors = Vec::new();
                if temperature.is_none() {
                    errors.push(TEMPERATURE_INVALID.to_string());
                }
                if humidity.is_none() {
                    errors.push(HUMIDITY_INVALID.to_string());
                }
                if timestamp.is_err() {
                    errors.push(TIMESTAMP_INVALID.to_string());
                }
                Err(errors)
            }
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// State of the sensor detail page
#[derive(Debug, Clone)]
pub struct SensorDetailState {
    pub sensor_id: SensorId,
    pub sensor: SensorRecord,
    pub readings: Vec<Reading>,
    pub date_range: DateRange,
    pub loading: bool,
    pub error: Option<String>,
    pub reading_form_open: bool,
    pub reading_form: ReadingForm,
    sensor_tracker: FetchTracker<SensorId>,
    readings_tracker: FetchTracker<DetailKey>,
}

impl SensorDetailState {
    pub fn new(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            sensor: SensorRecord::Pending,
            readings: Vec::new(),
            date_range: DateRange::default(),
            loading: false,
            error: None,
            reading_form_open: false,
            reading_form: ReadingForm::default(),
            sensor_tracker: FetchTracker::new(),
            readings_tracker: FetchTracker::new(),
        }
    }

    pub fn key(&self) -> DetailKey {
        DetailKey {
            sensor_id: self.sensor_id,
            range: self.date_range.clone(),
        }
    }

    pub fn sensor(&self) -> Option<&Sensor> {
        match &self.sensor {
            SensorRecord::Loaded(sensor) => Some(sensor),
            _ => None,
        }
    }

    /// Switch to another sensor. Returns true if the key changed.
    pub fn set_sensor(&mut self, sensor_id: SensorId) -> bool {
        if sensor_id == self.sensor_id {
            return false;
        }
        self.sensor_id = sensor_id;
        self.sensor = SensorRecord::Pending;
        self.readings.clear();
        self.error = None;
        true
    }

    /// Partially update the range; `None` leaves a bound as it is.
    /// Returns true if the key changed.
    pub fn set_date_range(&mut self, from: Option<&str>, to: Option<&str>) -> bool {
        let mut range = self.date_range.clone();
        if let Some(from) = from {
            range.from = from.to_string();
        }
        if let Some(to) = to {
            range.to = to.to_string();
        }
        if range == self.date_range {
            return false;
        }
        self.date_range = range;
        true
    }

    /// Remove both bounds. Returns true if the key changed.
    pub fn clear_date_range(&mut self) -> bool {
        self.set_date_range(Some(""), Some(""))
    }

    pub fn begin_sensor_fetch(&mut self) -> Ticket<SensorId> {
        self.sensor_tracker.begin(self.sensor_id)
    }

    pub fn complete_sensor_fetch(
        &mut self,
        ticket: &Ticket<SensorId>,
        result: crate::Result<Sensor>,
    ) -> bool {
        if !self.sensor_tracker.finish(ticket, &self.sensor_id) {
            return false;
        }
        match result {
            Ok(sensor) => self.sensor = SensorRecord::Loaded(sensor),
            Err(e) => {
                tracing::warn!("Failed to load sensor {}: {}", self.sensor_id, e);
                if self.sensor == SensorRecord::Pending {
                    self.sensor = SensorRecord::Unavailable;
                }
                self.fail(messages::LOAD_SENSOR_FAILED);
            }
        }
        true
    }

    pub fn begin_readings_fetch(&mut self) -> Ticket<DetailKey> {
        self.loading = true;
        self.readings_tracker.begin(self.key())
    }

    pub fn complete_readings_fetch(
        &mut self,
        ticket: &Ticket<DetailKey>,
        result: crate::Result<Vec<Reading>>,
    ) -> bool {
        let current = self.key();
        let applies = self.readings_tracker.finish(ticket, &current);
        self.loading = self.readings_tracker.is_pending();
        if !applies {
            return false;
        }
        match result {
            Ok(readings) => {
                tracing::debug!("Loaded {} readings for {:?}", readings.len(), current);
                self.readings = readings;
            }
            Err(e) => {
                tracing::warn!("Failed to load readings for {:?}: {}", current, e);
                self.fail(messages::LOAD_READINGS_FAILED);
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

    pub fn open_reading_form(&mut self) {
        self.reading_form_open = true;
    }

    pub fn close_reading_form(&mut self) {
        self.reading_form_open = false;
    }

    /// Close the form and reset it after a successful submission
    pub fn reading_added<Tz: TimeZone>(&mut self, now: DateTime<Tz>)
    where
        Tz::Offset: Display,
    {
        self.reading_form_open = false;
        self.reading_form = ReadingForm::starting_at(now);
    }

    /// Parse the reading form in `tz` before it is sent
    pub fn prepare_reading_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewReading, Outcome> {
        self.reading_form.parse_in(tz).map_err(Outcome::Rejected)
    }

    /// Apply the server's answer to a new reading. `Applied` means refresh
    /// the readings next; `now` restarts the form.
    pub fn complete_add_reading<Tz: TimeZone>(
        &mut self,
        result: crate::Result<Reading>,
        now: DateTime<Tz>,
    ) -> Outcome
    where
        Tz::Offset: Display,
    {
        match result {
            Ok(reading) => {
                tracing::debug!(
                    "Added reading at {} to sensor {}",
                    reading.timestamp,
                    self.sensor_id
                );
                self.reading_added(now);
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to add reading to sensor {}: {}", self.sensor_id, e);
                self.fail(messages::CREATE_READING_FAILED);
                Outcome::Failed
            }
        }
    }

    pub fn has_readings(&self) -> bool {
        !self.readings.is_empty()
    }

    /// Readings in chronological order, labelled in `tz`
    pub fn chart_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<ChartPoint>
    where
        Tz::Offset: Display,
    {
        chart_series(&self.readings, tz)
    }

    /// Readings in chronological order, labelled in local time
    pub fn chart(&self) -> Vec<ChartPoint> {
        self.chart_in(&Local)
    }
}

/// Sensor detail state wired to the API
#[derive(Debug)]
pub struct SensorDetailView {
    state: SensorDetailState,
    api: ApiClient,
    session: Arc<Session>,
}

impl SensorDetailView {
    pub fn new(api: ApiClient, session: Arc<Session>, sensor_id: SensorId) -> Self {
        Self {
            state: SensorDetailState::new(sensor_id),
            api,
            session,
        }
    }

    pub fn state(&self) -> &SensorDetailState {
        &self.state
    }

    pub fn reading_form_mut(&mut self) -> &mut ReadingForm {
        &mut self.state.reading_form
    }

    pub fn open_reading_form(&mut self) {
        self.state.open_reading_form();
    }

    pub fn close_reading_form(&mut self) {
        self.state.close_reading_form();
    }

    pub fn dismiss_error(&mut self) {
        self.state.dismiss_error();
    }

    /// Fetch the sensor record and its readings for the current key
    pub async fn refresh(&mut self) {
        let token = self.session.current();

        let ticket = self.state.begin_sensor_fetch();
        let result = self.api.get_sensor(token.as_deref(), *ticket.key()).await;
        self.state.complete_sensor_fetch(&ticket, result);

        if self.state.sensor == SensorRecord::Unavailable {
            tracing::debug!("Sensor {} unavailable, not loading readings", self.state.sensor_id);
            return;
        }
        self.refresh_readings().await;
    }

    /// Fetch the readings for the current key
    pub async fn refresh_readings(&mut self) {
        let token = self.session.current();
        let ticket = self.state.begin_readings_fetch();
        let key = ticket.key();
        let result = self
            .api
            .list_readings(token.as_deref(), key.sensor_id, &key.range)
            .await;
        self.state.complete_readings_fetch(&ticket, result);
    }

    pub async fn show_sensor(&mut self, sensor_id: SensorId) {
        if self.state.set_sensor(sensor_id) {
            self.refresh().await;
        }
    }

    pub async fn set_date_range(&mut self, from: Option<&str>, to: Option<&str>) {
        if self.state.set_date_range(from, to) {
            self.refresh().await;
        }
    }

    pub async fn clear_date_range(&mut self) {
        if self.state.clear_date_range() {
            self.refresh().await;
        }
    }

    /// Submit the reading form, reading its timestamp as local time
    pub async fn add_reading(&mut self) -> Outcome {
        self.add_reading_in(&Local).await
    }

    /// Submit the reading form, reading its timestamp in `tz`
    pub async fn add_reading_in<Tz: TimeZone>(&mut self, tz: &Tz) -> Outcome
    where
        Tz::Offset: Display,
    {
        let reading = match self.state.prepare_reading_in(tz) {
            Ok(reading) => reading,
            Err(outcome) => return outcome,
        };

        let token = self.session.current();
        let result = self
            .api
            .create_reading(token.as_deref(), self.state.sensor_id, &reading)
            .await;
        let outcome = self
            .state
            .complete_add_reading(result, Utc::now().with_timezone(tz));
        if outcome.is_applied() {
            self.refresh_readings().await;
        }
        outcome
    }
}

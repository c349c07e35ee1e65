//! BDD step definitions for the sensor detail page

use chrono::{NaiveDateTime, Utc};
use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use sensor_client::sensor_detail::SensorRecord;

use crate::world::DashboardWorld;

#[given(expr = "the server has a sensor {int} named {string} with readings:")]
fn sensor_with_readings(world: &mut DashboardWorld, id: i64, name: String, step: &Step) {
    world.backend.add_sensor(id, &name, "DHT22");
    let table = step.table.as_ref().expect("readings table");
    for row in table.rows.iter().skip(1) {
        let timestamp = NaiveDateTime::parse_from_str(&row[0], "%Y-%m-%dT%H:%M")
            .expect("timestamp column")
            .and_utc();
        let temperature: f64 = row[1].parse().expect("temperature column");
        let humidity: f64 = row[2].parse().expect("humidity column");
        world
            .backend
            .add_reading(id, timestamp, temperature, humidity);
    }
}

#[when(expr = "I open sensor {int}")]
async fn open_sensor(world: &mut DashboardWorld, id: i64) {
    let mut view = world.dashboard().sensor_detail(id);
    view.refresh().await;
    world.detail = Some(view);
}

#[when(expr = "I switch to sensor {int}")]
async fn switch_sensor(world: &mut DashboardWorld, id: i64) {
    world.detail().show_sensor(id).await;
}

#[when(expr = "I set the date range from {string} to {string}")]
async fn set_range(world: &mut DashboardWorld, from: String, to: String) {
    world.detail().set_date_range(Some(&from), Some(&to)).await;
}

#[when("I clear the date range")]
async fn clear_range(world: &mut DashboardWorld) {
    world.detail().clear_date_range().await;
}

#[when(expr = "I add a reading of {string} degrees and {string} percent at {string}")]
async fn add_reading(
    world: &mut DashboardWorld,
    temperature: String,
    humidity: String,
    timestamp: String,
) {
    let detail = world.detail();
    detail.open_reading_form();
    let form = detail.reading_form_mut();
    form.temperature = temperature;
    form.humidity = humidity;
    form.timestamp = timestamp;
    let outcome = detail.add_reading_in(&Utc).await;
    world.last_outcome = Some(outcome);
}

#[then(expr = "the sensor name should be {string}")]
fn sensor_name(world: &mut DashboardWorld, name: String) {
    let sensor = world.detail().state().sensor().cloned();
    assert_eq!(sensor.map(|s| s.name), Some(name));
}

#[then("the sensor should be unavailable")]
fn sensor_unavailable(world: &mut DashboardWorld) {
    assert_eq!(world.detail().state().sensor, SensorRecord::Unavailable);
}

#[then(expr = "the chart temperatures should be {string}")]
fn chart_temperatures(world: &mut DashboardWorld, expected: String) {
    let temperatures: Vec<String> = world
        .detail()
        .state()
        .chart_in(&Utc)
        .iter()
        .map(|point| point.temperature.to_string())
        .collect();
    assert_eq!(temperatures.join(", "), expected);
}

#[then(expr = "I should see {int} readings")]
fn should_see_readings(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.detail().state().readings.len(), count);
}

#[then(expr = "the server should have stored a reading at {string} with temperature {float}")]
fn stored_reading(world: &mut DashboardWorld, timestamp: String, temperature: f64) {
    let sensor_id = world.detail().state().sensor_id;
    let stored = world.backend.readings_for(sensor_id);
    assert!(
        stored.iter().any(|r| {
            r.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string() == timestamp
                && r.temperature == temperature
        }),
        "no reading at {} with temperature {} in {:?}",
        timestamp,
        temperature,
        stored
    );
}

#[then("the reading form should be closed")]
fn reading_form_closed(world: &mut DashboardWorld) {
    assert!(!world.detail().state().reading_form_open);
}

#[then("the reading form should be open")]
fn reading_form_open(world: &mut DashboardWorld) {
    assert!(world.detail().state().reading_form_open);
}

//! BDD step definitions for the sensor list

use std::collections::HashMap;
use std::sync::Arc;

use cucumber::{given, then, when};
use reqwest::Url;

use sensor_client::io::Method;
use sensor_client::models::{NewSensor, SensorUpdate};
use sensor_client::sensor_list::SensorListView;

use crate::world::DashboardWorld;

#[given(expr = "the server has {int} sensors")]
fn server_has_sensors(world: &mut DashboardWorld, count: i64) {
    for id in 1..=count {
        world
            .backend
            .add_sensor(id, &format!("Sensor {}", id), "DHT22");
    }
}

#[given("searching resets the page")]
fn searching_resets_page(world: &mut DashboardWorld) {
    world.config.sensors.reset_page_on_search = true;
}

#[when("I open the sensor list")]
async fn open_list(world: &mut DashboardWorld) {
    let dashboard = world.dashboard().clone();
    let mut view = SensorListView::new(
        dashboard.api().clone(),
        Arc::clone(dashboard.session()),
        &world.config.sensors,
    );
    view.refresh().await;
    world.list = Some(view);
}

#[when(expr = "I go to page {int}")]
async fn go_to_page(world: &mut DashboardWorld, page: u32) {
    world.list().set_page(page).await;
}

#[when("I go to the next page")]
async fn next_page(world: &mut DashboardWorld) {
    world.list().next_page().await;
}

#[when("I go to the previous page")]
async fn previous_page(world: &mut DashboardWorld) {
    world.list().previous_page().await;
}

#[when(expr = "I search for {string}")]
async fn search(world: &mut DashboardWorld, query: String) {
    world.list().set_search(query).await;
}

#[when(expr = "I create a sensor named {string} with model {string}")]
async fn create_sensor(world: &mut DashboardWorld, name: String, model: String) {
    let list = world.list();
    list.open_create_form();
    let outcome = list
        .create(NewSensor {
            name,
            model,
            description: String::new(),
        })
        .await;
    world.last_outcome = Some(outcome);
}

#[when(expr = "I rename sensor {int} to {string}")]
async fn rename_sensor(world: &mut DashboardWorld, id: i64, name: String) {
    let list = world.list();
    let original = list
        .state()
        .sensors
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .expect("sensor is on the current page");
    list.start_editing(id);
    let mut edited = NewSensor::from(&original);
    edited.name = name;
    let outcome = list
        .update(id, SensorUpdate::between(&original, &edited))
        .await;
    world.last_outcome = Some(outcome);
}

#[when(expr = "I delete sensor {int} and confirm")]
async fn delete_confirmed(world: &mut DashboardWorld, id: i64) {
    let outcome = world.list().delete(id, &|_: &str| true).await;
    world.last_outcome = Some(outcome);
}

#[when(expr = "I delete sensor {int} and decline")]
async fn delete_declined(world: &mut DashboardWorld, id: i64) {
    let outcome = world.list().delete(id, &|_: &str| false).await;
    world.last_outcome = Some(outcome);
}

#[when("the server starts failing")]
fn server_failing(world: &mut DashboardWorld) {
    world.backend.set_failing(true);
}

#[when("the server recovers")]
fn server_recovers(world: &mut DashboardWorld) {
    world.backend.set_failing(false);
}

#[then(expr = "I should see {int} sensors")]
fn should_see_sensors(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.list().state().sensors.len(), count);
}

#[then(expr = "there should be {int} pages")]
fn should_have_pages(world: &mut DashboardWorld, pages: u32) {
    assert_eq!(world.list().state().total_pages, pages);
}

#[then(expr = "the current page should be {int}")]
fn current_page(world: &mut DashboardWorld, page: u32) {
    assert_eq!(world.list().state().page, page);
}

#[then(expr = "the server should have {int} sensors")]
fn server_sensor_count(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.backend.sensors().len(), count);
}

#[then(expr = "the last request should ask for page {int} with query {string}")]
fn last_list_request(world: &mut DashboardWorld, page: u32, query: String) {
    let request = world
        .backend
        .requests()
        .into_iter()
        .rev()
        .find(|r| r.method == Method::Get && r.url.contains("/api/sensors/?"))
        .expect("no sensor list request was sent");
    let url = Url::parse(&request.url).expect("request URL parses");
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params.get("page"), Some(&page.to_string()));
    assert_eq!(params.get("q"), Some(&query));
}

#[then(expr = "sensor {int} on the server should be named {string}")]
fn server_sensor_name(world: &mut DashboardWorld, id: i64, name: String) {
    let sensor = world
        .backend
        .sensors()
        .into_iter()
        .find(|s| s.id == id)
        .expect("sensor exists on the server");
    assert_eq!(sensor.name, name);
}

#[then("the edit form should be closed")]
fn edit_form_closed(world: &mut DashboardWorld) {
    assert_eq!(world.list().state().editing, None);
}

#[then("the edit form should be open")]
fn edit_form_open(world: &mut DashboardWorld) {
    assert!(world.list().state().editing.is_some());
}

#[then("the create form should be closed")]
fn create_form_closed(world: &mut DashboardWorld) {
    assert!(!world.list().state().create_form_open);
}

#[then("the create form should be open")]
fn create_form_open(world: &mut DashboardWorld) {
    assert!(world.list().state().create_form_open);
}

#[then(expr = "the error should be {string}")]
fn error_should_be(world: &mut DashboardWorld, message: String) {
    let error = match (&world.detail, &world.list) {
        (Some(detail), _) => detail.state().error.clone(),
        (None, Some(list)) => list.state().error.clone(),
        (None, None) => panic!("no view opened"),
    };
    assert_eq!(error, Some(message));
}

#[then("nothing should be loading")]
fn nothing_loading(world: &mut DashboardWorld) {
    if let Some(list) = &world.list {
        assert!(!list.state().loading);
    }
    if let Some(detail) = &world.detail {
        assert!(!detail.state().loading);
    }
}

//! Sensor Dashboard - Leptos frontend
//!
//! Login, registration, sensor list and sensor detail pages rendered in the
//! browser on top of `sensor-client`.

pub mod app;
pub mod browser;
pub mod components;

pub use app::App;

use sensor_client::Config;

/// Client configuration. The API URL can be baked in at build time.
pub fn app_config() -> Config {
    config_with_api_url(option_env!("SENSOR_DASHBOARD_API_URL"))
}

fn config_with_api_url(url: Option<&str>) -> Config {
    let mut config = Config::default();
    config.apply_api_url(url);
    if let Err(e) = config.validate() {
        tracing::warn!("Invalid dashboard configuration: {}", e);
    }
    config
}

/// Browser entry point
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    leptos::mount::mount_to_body(App);
}

//! Typed client for the sensor REST API
//!
//! One method per endpoint. Every call is a single attempt: transport
//! failures, non-2xx statuses and undecodable bodies all come back as
//! [`DashboardError`](crate::DashboardError) for the calling view to collapse
//! into its own message.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::io::{HttpClient, HttpRequest, HttpResponse, Method};
use crate::models::{
    AuthResponse, LoginRequest, NewReading, NewSensor, Reading, RegisterRequest, Sensor, SensorId,
    SensorPage, SensorQuery, SensorUpdate,
};
use crate::sensor_detail::DateRange;

/// Client for the sensor API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, http: Arc<dyn HttpClient>) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created ApiClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url_with_query(&self, path: &str, query: &[(&str, String)]) -> crate::Result<String> {
        let raw = self.url(path);
        if query.is_empty() {
            return Ok(raw);
        }
        let url = Url::parse_with_params(&raw, query)
            .map_err(|e| crate::DashboardError::Config(format!("Invalid URL {}: {}", raw, e)))?;
        Ok(url.to_string())
    }

    async fn execute(&self, request: HttpRequest) -> crate::Result<HttpResponse> {
        let response = self.http.send(&request).await?;
        if !response.is_success() {
            tracing::debug!(
                "{} {} rejected with status {}",
                request.method,
                request.url,
                response.status
            );
            return Err(crate::DashboardError::Status {
                status: response.status,
                url: request.url,
            });
        }
        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: HttpRequest) -> crate::Result<T> {
        let response = self.execute(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    fn body<T: Serialize>(value: &T) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(value)?)
    }

    /// POST /api/auth/token/
    pub async fn login(&self, credentials: &LoginRequest) -> crate::Result<AuthResponse> {
        let request =
            HttpRequest::new(Method::Post, self.url("/api/auth/token/")).json(Self::body(credentials)?);
        self.execute_json(request).await
    }

    /// POST /api/auth/register/
    pub async fn register(&self, registration: &RegisterRequest) -> crate::Result<AuthResponse> {
        let request = HttpRequest::new(Method::Post, self.url("/api/auth/register/"))
            .json(Self::body(registration)?);
        self.execute_json(request).await
    }

    /// GET /api/sensors/?page=&q=
    pub async fn list_sensors(
        &self,
        token: Option<&str>,
        query: &SensorQuery,
    ) -> crate::Result<SensorPage> {
        let url = self.url_with_query(
            "/api/sensors/",
            &[("page", query.page.to_string()), ("q", query.search.clone())],
        )?;
        self.execute_json(HttpRequest::new(Method::Get, url).bearer(token))
            .await
    }

    /// POST /api/sensors/
    pub async fn create_sensor(&self, token: Option<&str>, sensor: &NewSensor) -> crate::Result<Sensor> {
        let request = HttpRequest::new(Method::Post, self.url("/api/sensors/"))
            .bearer(token)
            .json(Self::body(sensor)?);
        self.execute_json(request).await
    }

    /// PUT /api/sensors/{id}/
    pub async fn update_sensor(
        &self,
        token: Option<&str>,
        id: SensorId,
        changes: &SensorUpdate,
    ) -> crate::Result<Sensor> {
        let request = HttpRequest::new(Method::Put, self.url(&format!("/api/sensors/{}/", id)))
            .bearer(token)
            .json(Self::body(changes)?);
        self.execute_json(request).await
    }

    /// DELETE /api/sensors/{id}/
    pub async fn delete_sensor(&self, token: Option<&str>, id: SensorId) -> crate::Result<()> {
        let request = HttpRequest::new(Method::Delete, self.url(&format!("/api/sensors/{}/", id)))
            .bearer(token);
        self.execute(request).await?;
        Ok(())
    }

    /// GET /api/sensors/{id}/
    pub async fn get_sensor(&self, token: Option<&str>, id: SensorId) -> crate::Result<Sensor> {
        let request = HttpRequest::new(Method::Get, self.url(&format!("/api/sensors/{}/", id)))
            .bearer(token);
        self.execute_json(request).await
    }

    /// GET /api/sensors/{id}/readings/?timestamp_from=&timestamp_to=
    pub async fn list_readings(
        &self,
        token: Option<&str>,
        id: SensorId,
        range: &DateRange,
    ) -> crate::Result<Vec<Reading>> {
        let url = self.url_with_query(
            &format!("/api/sensors/{}/readings/", id),
            &range.query_pairs(),
        )?;
        self.execute_json(HttpRequest::new(Method::Get, url).bearer(token))
            .await
    }

    /// POST /api/sensors/{id}/readings/
    pub async fn create_reading(
        &self,
        token: Option<&str>,
        id: SensorId,
        reading: &NewReading,
    ) -> crate::Result<Reading> {
        let request =
            HttpRequest::new(Method::Post, self.url(&format!("/api/sensors/{}/readings/", id)))
                .bearer(token)
                .json(Self::body(reading)?);
        self.execute_json(request).await
    }
}

//! Wire types for the sensor REST API

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned sensor identifier
pub type SensorId = i64;

/// Body of POST /api/auth/token/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of POST /api/auth/register/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Account details returned alongside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Response of both auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

/// A sensor owned by the authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of POST /api/sensors/
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewSensor {
    pub name: String,
    pub model: String,
    pub description: String,
}

/// Body of PUT /api/sensors/{id}/. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SensorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Sensor> for NewSensor {
    fn from(sensor: &Sensor) -> Self {
        Self {
            name: sensor.name.clone(),
            model: sensor.model.clone(),
            description: sensor.description.clone().unwrap_or_default(),
        }
    }
}

impl SensorUpdate {
    /// The fields of `edited` that differ from `original`
    pub fn between(original: &Sensor, edited: &NewSensor) -> Self {
        let changed = |before: &str, after: &String| (before != after).then(|| after.clone());
        Self {
            name: changed(&original.name, &edited.name),
            model: changed(&original.model, &edited.model),
            description: changed(
                original.description.as_deref().unwrap_or_default(),
                &edited.description,
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.model.is_none() && self.description.is_none()
    }
}

/// One page of GET /api/sensors/
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorPage {
    pub items: Vec<Sensor>,
    pub count: u64,
}

/// Query parameters of GET /api/sensors/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorQuery {
    pub page: u32,
    pub search: String,
}

/// A temperature/humidity observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub sensor_id: Option<SensorId>,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of POST /api/sensors/{id}/readings/
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

/// Parse a server timestamp.
///
/// Accepts RFC 3339, RFC 3339 without seconds (`2024-01-02T10:00Z`) and naive
/// date-times, which are taken to be UTC.
pub fn parse_server_timestamp(value: &str) -> crate::Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%#z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Some(without_z) = value.strip_suffix('Z') {
        if let Ok(naive) = parse_naive(without_z) {
            return Ok(naive.and_utc());
        }
    }
    parse_naive(value)
        .map(|naive| naive.and_utc())
        .map_err(|_| crate::DashboardError::Timestamp(value.to_string()))
}

/// Parse `YYYY-MM-DDTHH:MM[:SS[.fff]]`, also accepting a space separator
pub(crate) fn parse_naive(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_server_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|value| parse_server_timestamp(&value).map_err(serde::de::Error::custom))
        .transpose()
}

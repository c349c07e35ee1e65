//! In-memory stand-in for the sensor REST API

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Url;
use serde_json::{json, Value};

use sensor_client::io::{HttpClient, HttpRequest, HttpResponse, Method};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct StoredSensor {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub description: String,
}

impl StoredSensor {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "model": self.model,
            "description": self.description,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StoredReading {
    pub id: i64,
    pub sensor_id: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

impl StoredReading {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "sensor_id": self.sensor_id,
            "temperature": self.temperature,
            "humidity": self.humidity,
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, String>,
    tokens: Vec<String>,
    sensors: Vec<StoredSensor>,
    readings: Vec<StoredReading>,
    failing: bool,
    requests: Vec<HttpRequest>,
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn not_found() -> HttpResponse {
    respond(404, json!({"detail": "Not found."}))
}

fn parse_bound(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

fn text(body: &Value, field: &str) -> Option<String> {
    body.get(field).and_then(Value::as_str).map(str::to_string)
}

impl State {
    fn authorized(&self, bearer: Option<&str>) -> bool {
        bearer.is_some_and(|token| self.tokens.iter().any(|t| t == token))
    }

    fn issue_token(&mut self, email: &str) -> String {
        let token = format!("token-{}", email);
        self.tokens.push(token.clone());
        token
    }

    fn login(&mut self, body: &Value) -> HttpResponse {
        let email = text(body, "email").unwrap_or_default();
        let password = text(body, "password").unwrap_or_default();
        if self.users.get(&email) != Some(&password) {
            return respond(401, json!({"detail": "Invalid credentials"}));
        }
        let token = self.issue_token(&email);
        respond(200, json!({"token": token}))
    }

    fn register(&mut self, body: &Value) -> HttpResponse {
        let email = text(body, "email").unwrap_or_default();
        let username = text(body, "username").unwrap_or_default();
        let password = text(body, "password").unwrap_or_default();
        if self.users.contains_key(&email) {
            return respond(400, json!({"detail": "Email already registered"}));
        }
        self.users.insert(email.clone(), password);
        let id = self.users.len();
        let token = self.issue_token(&email);
        respond(
            201,
            json!({"token": token, "user": {"id": id, "email": email, "username": username}}),
        )
    }

    fn list(&self, query: &HashMap<String, String>) -> HttpResponse {
        let search = query.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
        let page = query
            .get("page")
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let matching: Vec<&StoredSensor> = self
            .sensors
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&search) || s.model.to_lowercase().contains(&search)
            })
            .collect();
        let items: Vec<Value> = matching
            .iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|s| s.to_json())
            .collect();
        respond(200, json!({"items": items, "count": matching.len()}))
    }

    fn create(&mut self, body: &Value) -> HttpResponse {
        let sensor = StoredSensor {
            id: self.sensors.iter().map(|s| s.id).max().unwrap_or(0) + 1,
            name: text(body, "name").unwrap_or_default(),
            model: text(body, "model").unwrap_or_default(),
            description: text(body, "description").unwrap_or_default(),
        };
        let response = respond(201, sensor.to_json());
        self.sensors.push(sensor);
        response
    }

    fn sensor(&mut self, method: Method, id: i64, body: &Value) -> HttpResponse {
        let Some(index) = self.sensors.iter().position(|s| s.id == id) else {
            return not_found();
        };
        match method {
            Method::Get => respond(200, self.sensors[index].to_json()),
            Method::Put => {
                let sensor = &mut self.sensors[index];
                if let Some(name) = text(body, "name") {
                    sensor.name = name;
                }
                if let Some(model) = text(body, "model") {
                    sensor.model = model;
                }
                if let Some(description) = text(body, "description") {
                    sensor.description = description;
                }
                respond(200, sensor.to_json())
            }
            Method::Delete => {
                self.sensors.remove(index);
                self.readings.retain(|r| r.sensor_id != id);
                HttpResponse {
                    status: 204,
                    body: String::new(),
                }
            }
            Method::Post => respond(405, json!({"detail": "Method not allowed"})),
        }
    }

    fn readings(
        &mut self,
        method: Method,
        sensor_id: i64,
        query: &HashMap<String, String>,
        body: &Value,
    ) -> HttpResponse {
        if !self.sensors.iter().any(|s| s.id == sensor_id) {
            return not_found();
        }
        match method {
            Method::Get => {
                let from = query.get("timestamp_from").and_then(|v| parse_bound(v));
                let to = query.get("timestamp_to").and_then(|v| parse_bound(v));
                let mut readings: Vec<&StoredReading> = self
                    .readings
                    .iter()
                    .filter(|r| r.sensor_id == sensor_id)
                    .filter(|r| from.is_none_or(|from| r.timestamp >= from))
                    .filter(|r| to.is_none_or(|to| r.timestamp <= to))
                    .collect();
                readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                let items: Vec<Value> = readings.iter().map(|r| r.to_json()).collect();
                respond(200, Value::Array(items))
            }
            Method::Post => {
                let timestamp = text(body, "timestamp")
                    .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
                    .map(|t| t.with_timezone(&Utc));
                let temperature = body.get("temperature").and_then(Value::as_f64);
                let humidity = body.get("humidity").and_then(Value::as_f64);
                let (Some(timestamp), Some(temperature), Some(humidity)) =
                    (timestamp, temperature, humidity)
                else {
                    return respond(422, json!({"detail": "Invalid reading"}));
                };
                let reading = StoredReading {
                    id: self.readings.len() as i64 + 1,
                    sensor_id,
                    temperature,
                    humidity,
                    timestamp,
                };
                let response = respond(201, reading.to_json());
                self.readings.push(reading);
                response
            }
            _ => respond(405, json!({"detail": "Method not allowed"})),
        }
    }
}

/// Sensor API backed by in-memory collections, recording every request
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, email: &str, password: &str) {
        self.lock()
            .users
            .insert(email.to_string(), password.to_string());
    }

    /// Register a user and hand back a valid token for them
    pub fn signed_in_user(&self, email: &str) -> String {
        let mut state = self.lock();
        state.users.insert(email.to_string(), "secret1".to_string());
        state.issue_token(email)
    }

    pub fn add_sensor(&self, id: i64, name: &str, model: &str) {
        self.lock().sensors.push(StoredSensor {
            id,
            name: name.to_string(),
            model: model.to_string(),
            description: String::new(),
        });
    }

    pub fn add_reading(&self, sensor_id: i64, timestamp: DateTime<Utc>, temperature: f64, humidity: f64) {
        let mut state = self.lock();
        let id = state.readings.len() as i64 + 1;
        state.readings.push(StoredReading {
            id,
            sensor_id,
            temperature,
            humidity,
            timestamp,
        });
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn sensors(&self) -> Vec<StoredSensor> {
        self.lock().sensors.clone()
    }

    pub fn readings_for(&self, sensor_id: i64) -> Vec<StoredReading> {
        self.lock()
            .readings
            .iter()
            .filter(|r| r.sensor_id == sensor_id)
            .cloned()
            .collect()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if state.failing {
            return respond(500, json!({"detail": "Internal server error"}));
        }

        let Ok(url) = Url::parse(&request.url) else {
            return respond(400, json!({"detail": "Bad URL"}));
        };
        let segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method, segments.as_slice()) {
            (Method::Post, ["api", "auth", "token"]) => state.login(&body),
            (Method::Post, ["api", "auth", "register"]) => state.register(&body),
            _ if !state.authorized(request.bearer.as_deref()) => {
                respond(401, json!({"detail": "Authentication credentials were not provided."}))
            }
            (Method::Get, ["api", "sensors"]) => state.list(&query),
            (Method::Post, ["api", "sensors"]) => state.create(&body),
            (method, ["api", "sensors", id]) => match id.parse() {
                Ok(id) => state.sensor(method, id, &body),
                Err(_) => not_found(),
            },
            (method, ["api", "sensors", id, "readings"]) => match id.parse() {
                Ok(id) => state.readings(method, id, &query, &body),
                Err(_) => not_found(),
            },
            _ => not_found(),
        }
    }
}

#[async_trait]
impl HttpClient for FakeBackend {
    async fn send(&self, request: &HttpRequest) -> sensor_client::Result<HttpResponse> {
        Ok(self.handle(request))
    }
}

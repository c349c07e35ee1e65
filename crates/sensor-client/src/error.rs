//! Error types for the sensor dashboard client

/// Errors that can occur while talking to the sensor API or managing client state
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Session storage error: {0}")]
    Session(String),
}

/// Result type alias for sensor client operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// User-visible messages. Views collapse every remote failure into one of these.
pub mod messages {
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
    pub const LOAD_SENSORS_FAILED: &str = "Failed to load sensors";
    pub const CREATE_SENSOR_FAILED: &str = "Failed to create sensor";
    pub const UPDATE_SENSOR_FAILED: &str = "Failed to update sensor";
    pub const DELETE_SENSOR_FAILED: &str = "Failed to delete sensor";
    pub const LOAD_SENSOR_FAILED: &str = "Failed to load sensor";
    pub const LOAD_READINGS_FAILED: &str = "Failed to load readings";
    pub const CREATE_READING_FAILED: &str = "Failed to create reading";
    pub const DELETE_CONFIRMATION: &str = "Delete this sensor and all its readings?";
}

//! BDD step definitions for the sensor dashboard client

pub mod auth_steps;
pub mod detail_steps;
pub mod list_steps;

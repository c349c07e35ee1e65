//! UI components

pub mod error_list;
pub mod login;
pub mod reading_chart;
pub mod register;
pub mod sensor_detail;
pub mod sensor_list;

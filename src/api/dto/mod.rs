//! Request and response bodies for the REST API.

pub mod dashboard;
pub mod health;
pub mod stats;
pub mod urls;

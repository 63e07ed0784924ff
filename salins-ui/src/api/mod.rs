//! HTTP API handlers for salins-ui

pub mod dashboard;
pub mod health;

pub use dashboard::dashboard_routes;
pub use health::health_routes;

//! Verdance HTTP API.
//!
//! Garden persistence, the weather proxy and the planner endpoints, served
//! by axum. [`router::build_app_router`] assembles the full middleware stack
//! for both the binary and the integration tests.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

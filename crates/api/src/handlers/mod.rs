//! Request handlers.
//!
//! Each submodule provides async handler functions for one area of the API.
//! Handlers validate input, delegate to `verdance_core`, `verdance_store` or
//! `verdance_weather`, and map errors via [`AppError`](crate::error::AppError).

pub mod garden;
pub mod planner;
pub mod weather;

//! Estate SDK - client library for the estate patrol server
//!
//! Wraps the REST API for creating estates, planting trees and reading
//! statistics and drone patrol plans.

pub mod client;

pub use client::{ApiError, EstateClient};
pub use estate_core::models::{DronePlanResponse, EstateStatsResponse, RouteResponse};

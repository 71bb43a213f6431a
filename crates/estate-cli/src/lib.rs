//! Estate CLI - command line tools for the estate patrol system.
//!
//! - patrol_plan: run the patrol planner offline over an estate file
//! - seed_estate: create an estate and plant its trees on a running server

pub mod layouts;
pub mod report;

pub use layouts::{load_layout, sample_layout};

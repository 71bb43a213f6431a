//! Shared library surface for the estate server and its tests.

pub mod api;
pub mod config;
pub mod patrol_service;
pub mod persistence;
pub mod state;

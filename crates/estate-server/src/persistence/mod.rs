//! Persistence layer for the estate server.
//!
//! Provides SQLite-backed storage for estates and trees.
//! Estate records are cached write-through in the application state.

pub mod db;
pub mod estates;
pub mod trees;

pub use db::{init_database, Database};

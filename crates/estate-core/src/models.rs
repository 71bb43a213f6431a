//! Core data models for estates, trees and their API payloads.

use crate::patrol::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width (columns) and length (rows) of an estate. Coordinates are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstateDimensions {
    pub width: u32,
    pub length: u32,
}

impl EstateDimensions {
    pub fn new(width: u32, length: u32) -> Self {
        Self { width, length }
    }

    pub fn plot_count(&self) -> u64 {
        self.width as u64 * self.length as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (1..=self.width).contains(&x) && (1..=self.length).contains(&y)
    }

    /// Plot where a full serpentine scan finishes.
    pub fn final_plot(&self) -> PlotPosition {
        if self.length % 2 == 0 {
            PlotPosition { x: 1, y: self.length }
        } else {
            PlotPosition {
                x: self.width,
                y: self.length,
            }
        }
    }
}

/// A tree placed on a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub x: u32,
    pub y: u32,
    pub height: u32,
}

impl Tree {
    pub fn new(x: u32, y: u32, height: u32) -> Self {
        Self { x, y, height }
    }
}

/// A single plot coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotPosition {
    pub x: u32,
    pub y: u32,
}

/// Stored estate with its last computed statistics and patrol route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateRecord {
    pub id: String,
    pub width: u32,
    pub length: u32,
    pub tree_count: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub median_height: u32,
    pub patrol_distance: u64,
    /// Encoded route trace; empty until the first tree is planted.
    pub patrol_route: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EstateRecord {
    pub fn new(id: String, dimensions: EstateDimensions, now: DateTime<Utc>) -> Self {
        Self {
            id,
            width: dimensions.width,
            length: dimensions.length,
            tree_count: 0,
            min_height: 0,
            max_height: 0,
            median_height: 0,
            patrol_distance: 0,
            patrol_route: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn dimensions(&self) -> EstateDimensions {
        EstateDimensions::new(self.width, self.length)
    }

    pub fn stats(&self) -> EstateStatsResponse {
        EstateStatsResponse {
            count: self.tree_count,
            max: self.max_height,
            min: self.min_height,
            median: self.median_height,
        }
    }
}

/// Stored tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id: String,
    pub estate_id: String,
    pub x: u32,
    pub y: u32,
    pub height: u32,
    pub created_at: DateTime<Utc>,
}

impl TreeRecord {
    pub fn placement(&self) -> Tree {
        Tree::new(self.x, self.y, self.height)
    }
}

// === Request/Response types ===

/// Signed so out-of-range input reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEstateRequest {
    pub width: i64,
    pub length: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTreeRequest {
    pub x: i64,
    pub y: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstateStatsResponse {
    pub count: u32,
    pub max: u32,
    pub min: u32,
    pub median: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DronePlanResponse {
    pub distance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<PlotPosition>,
}

/// Stored patrol route, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub distance: u64,
    pub final_descent: u64,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// An estate and its trees as one document, used by the CLI tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateLayout {
    pub width: u32,
    pub length: u32,
    #[serde(default)]
    pub trees: Vec<Tree>,
}

impl EstateLayout {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn dimensions(&self) -> EstateDimensions {
        EstateDimensions::new(self.width, self.length)
    }
}

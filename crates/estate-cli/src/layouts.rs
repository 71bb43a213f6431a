//! Estate layout files and built-in samples.

use anyhow::{Context, Result};
use estate_core::models::{EstateLayout, Tree};
use std::path::Path;

/// Read an estate layout JSON file.
pub fn load_layout(path: &Path) -> Result<EstateLayout> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    EstateLayout::from_json(&raw).with_context(|| format!("invalid estate file {}", path.display()))
}

/// Named sample layouts.
///
/// - `strip`: 5x1 with three trees, patrol distance 64
/// - `grove`: 4x3 with a tree on every other plot
pub fn sample_layout(name: &str) -> Option<EstateLayout> {
    match name {
        "strip" => Some(EstateLayout {
            width: 5,
            length: 1,
            trees: vec![Tree::new(2, 1, 5), Tree::new(3, 1, 3), Tree::new(4, 1, 4)],
        }),
        "grove" => {
            let trees = (1..=3u32)
                .flat_map(|y| (1..=4u32).map(move |x| (x, y)))
                .filter(|(x, y)| (x + y) % 2 == 0)
                .map(|(x, y)| Tree::new(x, y, 5 + x * y))
                .collect();
            Some(EstateLayout {
                width: 4,
                length: 3,
                trees,
            })
        }
        _ => None,
    }
}

//! Height map construction and tree height statistics.

use crate::error::PatrolError;
use crate::models::{EstateDimensions, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Estates with at most this many cells (including the unused row/column 0) use a dense map.
pub const DEFAULT_DENSE_CELL_LIMIT: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightStats {
    pub min: u32,
    pub max: u32,
    pub median: u32,
}

#[derive(Debug, Clone)]
enum Cells {
    /// Row-major, `(length + 1) * (width + 1)` entries, 0 = no tree.
    Dense(Vec<u32>),
    Sparse(HashMap<(u32, u32), u32>),
}

/// Tree heights addressable by 1-based `(x, y)`.
#[derive(Debug, Clone)]
pub struct HeightMap {
    dimensions: EstateDimensions,
    cells: Cells,
}

impl HeightMap {
    pub fn dimensions(&self) -> EstateDimensions {
        self.dimensions
    }

    pub fn is_dense(&self) -> bool {
        matches!(self.cells, Cells::Dense(_))
    }

    /// Height of the tree on `(x, y)`, or `None` for an empty or out-of-range plot.
    pub fn height_at(&self, x: u32, y: u32) -> Option<u32> {
        if !self.dimensions.contains(x, y) {
            return None;
        }
        let height = match &self.cells {
            Cells::Dense(cells) => cells[self.index(x, y)],
            Cells::Sparse(cells) => cells.get(&(x, y)).copied().unwrap_or(0),
        };
        (height > 0).then_some(height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * (self.dimensions.width as usize + 1) + x as usize
    }

    fn set(&mut self, tree: &Tree) {
        let index = self.index(tree.x, tree.y);
        match &mut self.cells {
            Cells::Dense(cells) => cells[index] = tree.height,
            Cells::Sparse(cells) => {
                cells.insert((tree.x, tree.y), tree.height);
            }
        }
    }
}

/// Height map plus statistics for one planning call.
#[derive(Debug, Clone)]
pub struct Grid {
    pub map: HeightMap,
    pub stats: HeightStats,
}

/// Build the height map for an estate and compute min/max/median over its trees.
pub fn build_grid(
    dimensions: EstateDimensions,
    trees: &[Tree],
    dense_cell_limit: usize,
) -> Result<Grid, PatrolError> {
    if dimensions.width < 1 || dimensions.length < 1 {
        return Err(PatrolError::InvalidEstate {
            width: dimensions.width,
            length: dimensions.length,
        });
    }
    if trees.is_empty() {
        return Err(PatrolError::NoTrees);
    }

    let cell_count = (dimensions.width as u64 + 1) * (dimensions.length as u64 + 1);
    let cells = if cell_count <= dense_cell_limit as u64 {
        Cells::Dense(vec![0; cell_count as usize])
    } else {
        Cells::Sparse(HashMap::with_capacity(trees.len()))
    };
    let mut map = HeightMap { dimensions, cells };

    let mut heights = Vec::with_capacity(trees.len());
    for tree in trees {
        if !dimensions.contains(tree.x, tree.y) {
            return Err(PatrolError::TreeOutOfBounds {
                x: tree.x,
                y: tree.y,
                width: dimensions.width,
                length: dimensions.length,
            });
        }
        map.set(tree);
        heights.push(tree.height);
    }

    let stats = height_stats(&mut heights).ok_or(PatrolError::NoTrees)?;
    Ok(Grid { map, stats })
}

/// Min, max and median of `heights`; sorts the slice in place. `None` when empty.
///
/// Even counts take the truncated mean of the two middle values.
pub fn height_stats(heights: &mut [u32]) -> Option<HeightStats> {
    let (&first, rest) = heights.split_first()?;
    let (mut min, mut max) = (first, first);
    for &height in rest {
        min = min.min(height);
        max = max.max(height);
    }

    heights.sort_unstable();
    let n = heights.len();
    let median = if n % 2 == 0 {
        ((heights[n / 2 - 1] as u64 + heights[n / 2] as u64) / 2) as u32
    } else {
        heights[n / 2]
    };

    Some(HeightStats { min, max, median })
}

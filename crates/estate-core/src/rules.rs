//! Planting rules and input bounds for estates and trees.

use crate::error::ValidationError;
use crate::models::{EstateDimensions, Tree};
use crate::patrol::DEFAULT_MAX_PLOT_COUNT;
use serde::{Deserialize, Serialize};

/// Configuration for estate and tree input bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantingRules {
    /// Shortest tree accepted, in distance units
    pub min_tree_height: u32,
    /// Tallest tree accepted, in distance units
    pub max_tree_height: u32,
    /// Upper bound for both estate width and length
    pub max_estate_dimension: u32,
    /// Upper bound for `width * length`
    pub max_plot_count: u64,
}

impl Default for PlantingRules {
    fn default() -> Self {
        Self {
            min_tree_height: 1,
            max_tree_height: 30,
            max_estate_dimension: 50_000,
            max_plot_count: DEFAULT_MAX_PLOT_COUNT,
        }
    }
}

impl PlantingRules {
    /// Each side must lie in `1..=max_estate_dimension` and the area within
    /// `max_plot_count`.
    pub fn validate_estate(
        &self,
        width: i64,
        length: i64,
    ) -> Result<EstateDimensions, ValidationError> {
        let max = self.max_estate_dimension;
        let width = in_range(width, 1, max).ok_or(ValidationError::Width { value: width, max })?;
        let length =
            in_range(length, 1, max).ok_or(ValidationError::Length { value: length, max })?;

        let dimensions = EstateDimensions::new(width, length);
        if dimensions.plot_count() > self.max_plot_count {
            return Err(ValidationError::Area {
                width,
                length,
                max: self.max_plot_count,
            });
        }
        Ok(dimensions)
    }

    /// Height is checked first, then the coordinates against the estate.
    pub fn validate_tree(
        &self,
        estate: EstateDimensions,
        x: i64,
        y: i64,
        height: i64,
    ) -> Result<Tree, ValidationError> {
        let height = in_range(height, self.min_tree_height, self.max_tree_height).ok_or(
            ValidationError::Height {
                value: height,
                min: self.min_tree_height,
                max: self.max_tree_height,
            },
        )?;
        let x = in_range(x, 1, estate.width).ok_or(ValidationError::X {
            value: x,
            max: estate.width,
        })?;
        let y = in_range(y, 1, estate.length).ok_or(ValidationError::Y {
            value: y,
            max: estate.length,
        })?;
        Ok(Tree::new(x, y, height))
    }
}

fn in_range(value: i64, min: u32, max: u32) -> Option<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estate_bounds() {
        let rules = PlantingRules::default();
        assert_eq!(rules.validate_estate(5, 1), Ok(EstateDimensions::new(5, 1)));
        assert_eq!(
            rules.validate_estate(50_000, 200),
            Ok(EstateDimensions::new(50_000, 200))
        );
        assert_eq!(
            rules.validate_estate(0, 1),
            Err(ValidationError::Width { value: 0, max: 50_000 })
        );
        assert_eq!(
            rules.validate_estate(5, 50_001),
            Err(ValidationError::Length { value: 50_001, max: 50_000 })
        );
        assert!(rules.validate_estate(-3, 1).is_err());
    }

    #[test]
    fn estate_area_is_capped() {
        let rules = PlantingRules::default();
        assert_eq!(
            rules.validate_estate(50_000, 50_000),
            Err(ValidationError::Area {
                width: 50_000,
                length: 50_000,
                max: DEFAULT_MAX_PLOT_COUNT,
            })
        );
        assert!(rules.validate_estate(50_000, 201).is_err());

        let small = PlantingRules {
            max_plot_count: 6,
            ..PlantingRules::default()
        };
        assert!(small.validate_estate(3, 2).is_ok());
        assert!(small.validate_estate(7, 1).is_err());
    }

    #[test]
    fn tree_checks_height_before_position() {
        let rules = PlantingRules::default();
        let estate = EstateDimensions::new(5, 2);

        assert_eq!(rules.validate_tree(estate, 5, 2, 30), Ok(Tree::new(5, 2, 30)));
        assert_eq!(
            rules.validate_tree(estate, 9, 9, 31),
            Err(ValidationError::Height { value: 31, min: 1, max: 30 })
        );
        assert_eq!(
            rules.validate_tree(estate, 6, 1, 10),
            Err(ValidationError::X { value: 6, max: 5 })
        );
        assert_eq!(
            rules.validate_tree(estate, 1, 0, 10),
            Err(ValidationError::Y { value: 0, max: 2 })
        );
    }

    #[test]
    fn custom_height_window() {
        let rules = PlantingRules {
            min_tree_height: 5,
            max_tree_height: 8,
            ..PlantingRules::default()
        };
        let estate = EstateDimensions::new(1, 1);
        assert!(rules.validate_tree(estate, 1, 1, 4).is_err());
        assert!(rules.validate_tree(estate, 1, 1, 8).is_ok());
    }
}

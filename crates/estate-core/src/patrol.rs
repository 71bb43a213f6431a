//! Serpentine patrol planner.
//!
//! The drone scans odd rows west to east and even rows east to west, climbing
//! or descending to stay `monitor_clearance` above each tree before advancing
//! to the next plot. Every movement is recorded as one [`Step`].

use crate::error::PatrolError;
use crate::grid::{build_grid, HeightMap, HeightStats, DEFAULT_DENSE_CELL_LIMIT};
use crate::models::{EstateDimensions, Tree};
use crate::trace::encode_route;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest estate, in plots, the planner will trace. Each plot costs at least
/// one step and roughly 20 bytes of encoded route.
pub const DEFAULT_MAX_PLOT_COUNT: u64 = 10_000_000;

/// Which distance a step reports in its `distance` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDistance {
    /// Horizontal legs repeat the most recent vertical leg's distance (0 before any
    /// vertical leg). Matches previously stored routes.
    #[default]
    CarryVertical,
    /// Every step reports its own cost.
    Leg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolConfig {
    /// Height kept above each tree canopy
    pub monitor_clearance: u32,
    /// Cost of advancing one plot or one row
    pub plot_distance: u32,
    pub step_distance: StepDistance,
    /// Largest cell count backed by a dense height map
    pub dense_cell_limit: usize,
    /// Largest `width * length` accepted for planning
    pub max_plot_count: u64,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            monitor_clearance: 1,
            plot_distance: 10,
            step_distance: StepDistance::CarryVertical,
            dense_cell_limit: DEFAULT_DENSE_CELL_LIMIT,
            max_plot_count: DEFAULT_MAX_PLOT_COUNT,
        }
    }
}

/// Movement direction of a leg, with its two-character route code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Odd rows, increasing x (`ew`)
    WestToEast,
    /// Even rows, decreasing x (`we`)
    EastToWest,
    /// Row transition (`sn`)
    SouthToNorth,
    /// Climb over a taller canopy (`vu`)
    Ascend,
    /// Drop to a lower canopy (`vd`)
    Descend,
    /// Canopy at the current flight height (`--`)
    Level,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::WestToEast,
        Direction::EastToWest,
        Direction::SouthToNorth,
        Direction::Ascend,
        Direction::Descend,
        Direction::Level,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Direction::WestToEast => "ew",
            Direction::EastToWest => "we",
            Direction::SouthToNorth => "sn",
            Direction::Ascend => "vu",
            Direction::Descend => "vd",
            Direction::Level => "--",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Ascend | Direction::Descend | Direction::Level)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

/// One leg of the patrol route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based, contiguous
    pub number: u64,
    pub x: u32,
    pub y: u32,
    pub direction: Direction,
    pub distance: u64,
    /// Running total including this leg
    pub cumulative: u64,
}

/// Result of one planning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolPlan {
    pub stats: HeightStats,
    pub tree_count: usize,
    /// Includes the final descent to ground.
    pub total_distance: u64,
    /// Landing cost after the scan; counted in `total_distance`, not traced.
    pub final_descent: u64,
    pub steps: Vec<Step>,
}

impl PatrolPlan {
    /// `step,x,y,direction,distance,cumulative;` per leg.
    pub fn encoded_route(&self) -> String {
        encode_route(&self.steps)
    }

    /// Cumulative distance at the last traced step.
    pub fn traced_distance(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.cumulative)
    }
}

/// Plan the patrol of an estate.
///
/// Fails with [`PatrolError::InvalidEstate`] for a zero dimension,
/// [`PatrolError::TooManyPlots`] above `config.max_plot_count` and
/// [`PatrolError::NoTrees`] for an empty tree list. Nothing is allocated for
/// an estate over the ceiling.
pub fn plan_patrol(
    dimensions: EstateDimensions,
    trees: &[Tree],
    config: &PatrolConfig,
) -> Result<PatrolPlan, PatrolError> {
    let plots = dimensions.plot_count();
    if plots > config.max_plot_count {
        return Err(PatrolError::TooManyPlots {
            plots,
            max: config.max_plot_count,
        });
    }

    let grid = build_grid(dimensions, trees, config.dense_cell_limit)?;
    let mut flight = Flight::new(config, step_capacity(dimensions, trees.len()));
    flight.scan(&grid.map);

    let final_descent = flight.height as u64;
    Ok(PatrolPlan {
        stats: grid.stats,
        tree_count: trees.len(),
        total_distance: flight.distance + final_descent,
        final_descent,
        steps: flight.steps,
    })
}

/// One step per plot, one per row transition and at most one vertical leg per tree.
fn step_capacity(dimensions: EstateDimensions, trees: usize) -> usize {
    let plots = usize::try_from(dimensions.plot_count()).unwrap_or(usize::MAX);
    let transitions = dimensions.length.saturating_sub(1) as usize;
    plots.saturating_add(transitions).saturating_add(trees)
}

/// Drone state while walking the height map.
struct Flight<'a> {
    config: &'a PatrolConfig,
    height: u32,
    distance: u64,
    last_vertical: u64,
    steps: Vec<Step>,
}

impl<'a> Flight<'a> {
    fn new(config: &'a PatrolConfig, capacity: usize) -> Self {
        Self {
            config,
            height: 0,
            distance: 0,
            last_vertical: 0,
            steps: Vec::with_capacity(capacity),
        }
    }

    fn scan(&mut self, map: &HeightMap) {
        let EstateDimensions { width, length } = map.dimensions();
        for y in 1..=length {
            if y > 1 {
                self.advance(width, y, Direction::SouthToNorth);
            }

            let eastbound = y % 2 == 1;
            let heading = if eastbound {
                Direction::WestToEast
            } else {
                Direction::EastToWest
            };
            for i in 0..width {
                let x = if eastbound { i + 1 } else { width - i };
                if let Some(tree_height) = map.height_at(x, y) {
                    self.clear_canopy(x, y, tree_height);
                }
                self.advance(x, y, heading);
            }
        }
    }

    fn clear_canopy(&mut self, x: u32, y: u32, tree_height: u32) {
        let required = tree_height + self.config.monitor_clearance;
        let direction = match required.cmp(&self.height) {
            std::cmp::Ordering::Equal => Direction::Level,
            std::cmp::Ordering::Greater => Direction::Ascend,
            std::cmp::Ordering::Less => Direction::Descend,
        };
        let cost = required.abs_diff(self.height) as u64;
        self.height = required;
        self.last_vertical = cost;
        self.record(x, y, direction, cost, cost);
    }

    fn advance(&mut self, x: u32, y: u32, direction: Direction) {
        let cost = self.config.plot_distance as u64;
        let reported = match (self.config.step_distance, direction) {
            (StepDistance::CarryVertical, Direction::WestToEast | Direction::EastToWest) => {
                self.last_vertical
            }
            _ => cost,
        };
        self.record(x, y, direction, cost, reported);
    }

    fn record(&mut self, x: u32, y: u32, direction: Direction, cost: u64, reported: u64) {
        self.distance += cost;
        self.steps.push(Step {
            number: self.steps.len() as u64 + 1,
            x,
            y,
            direction,
            distance: reported,
            cumulative: self.distance,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REFERENCE_ROUTE: &str = "1,1,1,ew,0,10;2,2,1,vu,6,16;3,2,1,ew,6,26;4,3,1,vd,2,28;\
        5,3,1,ew,2,38;6,4,1,vu,1,39;7,4,1,ew,1,49;8,5,1,ew,1,59;";

    fn reference_trees() -> Vec<Tree> {
        vec![Tree::new(2, 1, 5), Tree::new(3, 1, 3), Tree::new(4, 1, 4)]
    }

    #[test]
    fn reference_estate_route() {
        let plan = plan_patrol(
            EstateDimensions::new(5, 1),
            &reference_trees(),
            &PatrolConfig::default(),
        )
        .unwrap();

        assert_eq!(plan.stats, HeightStats { min: 3, max: 5, median: 4 });
        assert_eq!(plan.tree_count, 3);
        assert_eq!(plan.total_distance, 64);
        assert_eq!(plan.final_descent, 5);
        assert_eq!(plan.encoded_route(), REFERENCE_ROUTE);
    }

    #[test]
    fn leg_distances_report_actual_costs() {
        let config = PatrolConfig {
            step_distance: StepDistance::Leg,
            ..PatrolConfig::default()
        };
        let plan = plan_patrol(EstateDimensions::new(5, 1), &reference_trees(), &config).unwrap();

        let distances: Vec<u64> = plan.steps.iter().map(|s| s.distance).collect();
        assert_eq!(distances, vec![10, 6, 10, 2, 10, 1, 10, 10]);
        assert_eq!(plan.total_distance, 64);
    }

    #[test]
    fn invalid_input_fails_before_planning() {
        let config = PatrolConfig::default();
        assert_eq!(
            plan_patrol(EstateDimensions::new(0, 1), &reference_trees(), &config),
            Err(PatrolError::InvalidEstate { width: 0, length: 1 })
        );
        assert_eq!(
            plan_patrol(EstateDimensions::new(5, 0), &reference_trees(), &config),
            Err(PatrolError::InvalidEstate { width: 5, length: 0 })
        );
        assert_eq!(
            plan_patrol(EstateDimensions::new(0, 0), &[], &config),
            Err(PatrolError::InvalidEstate { width: 0, length: 0 })
        );
        assert_eq!(
            plan_patrol(EstateDimensions::new(5, 1), &[], &config),
            Err(PatrolError::NoTrees)
        );
    }

    #[test]
    fn oversized_estate_is_rejected_before_allocating() {
        assert_eq!(
            plan_patrol(
                EstateDimensions::new(50_000, 50_000),
                &[Tree::new(1, 1, 5)],
                &PatrolConfig::default(),
            ),
            Err(PatrolError::TooManyPlots {
                plots: 2_500_000_000,
                max: DEFAULT_MAX_PLOT_COUNT,
            })
        );

        let config = PatrolConfig {
            max_plot_count: 5,
            ..PatrolConfig::default()
        };
        assert!(plan_patrol(EstateDimensions::new(5, 1), &reference_trees(), &config).is_ok());
        assert_eq!(
            plan_patrol(EstateDimensions::new(3, 2), &[Tree::new(1, 1, 5)], &config),
            Err(PatrolError::TooManyPlots { plots: 6, max: 5 })
        );
    }

    #[test]
    fn reference_estate_fills_step_capacity_exactly() {
        let trees = reference_trees();
        let plan =
            plan_patrol(EstateDimensions::new(5, 1), &trees, &PatrolConfig::default()).unwrap();
        assert_eq!(plan.steps.len(), step_capacity(EstateDimensions::new(5, 1), trees.len()));
    }

    #[test]
    fn single_plot_estate() {
        let plan = plan_patrol(
            EstateDimensions::new(1, 1),
            &[Tree::new(1, 1, 7)],
            &PatrolConfig::default(),
        )
        .unwrap();

        assert_eq!(plan.encoded_route(), "1,1,1,vu,8,8;2,1,1,ew,8,18;");
        assert_eq!(plan.final_descent, 8);
        assert_eq!(plan.total_distance, 26);
    }

    #[test]
    fn serpentine_rows_and_transitions() {
        let plan = plan_patrol(
            EstateDimensions::new(3, 2),
            &[Tree::new(3, 2, 2), Tree::new(2, 2, 2)],
            &PatrolConfig::default(),
        )
        .unwrap();

        let legs: Vec<(u32, u32, Direction)> =
            plan.steps.iter().map(|s| (s.x, s.y, s.direction)).collect();
        assert_eq!(
            legs,
            vec![
                (1, 1, Direction::WestToEast),
                (2, 1, Direction::WestToEast),
                (3, 1, Direction::WestToEast),
                (3, 2, Direction::SouthToNorth),
                (3, 2, Direction::Ascend),
                (3, 2, Direction::EastToWest),
                (2, 2, Direction::Level),
                (2, 2, Direction::EastToWest),
                (1, 2, Direction::EastToWest),
            ]
        );
        // 3 plots + row change + climb 3 + 3 plots, then land from 3
        assert_eq!(plan.traced_distance(), 73);
        assert_eq!(plan.total_distance, 76);
        assert_eq!(plan.steps[3].distance, 10);
    }

    #[test]
    fn clearance_and_plot_distance_are_configurable() {
        let config = PatrolConfig {
            monitor_clearance: 3,
            plot_distance: 1,
            ..PatrolConfig::default()
        };
        let plan =
            plan_patrol(EstateDimensions::new(2, 1), &[Tree::new(2, 1, 4)], &config).unwrap();
        assert_eq!(plan.encoded_route(), "1,1,1,ew,0,1;2,2,1,vu,7,8;3,2,1,ew,7,9;");
        assert_eq!(plan.total_distance, 16);
    }

    #[test]
    fn sparse_map_produces_identical_plan() {
        let dense = plan_patrol(
            EstateDimensions::new(5, 1),
            &reference_trees(),
            &PatrolConfig::default(),
        )
        .unwrap();
        let sparse = plan_patrol(
            EstateDimensions::new(5, 1),
            &reference_trees(),
            &PatrolConfig {
                dense_cell_limit: 0,
                ..PatrolConfig::default()
            },
        )
        .unwrap();
        assert_eq!(dense, sparse);
    }

    #[test]
    fn direction_codes_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_code(direction.code()), Some(direction));
        }
        assert_eq!(Direction::from_code("ns"), None);
    }

    fn estate_with_trees() -> impl Strategy<Value = (EstateDimensions, Vec<Tree>)> {
        (1u32..8, 1u32..8).prop_flat_map(|(width, length)| {
            let plots: Vec<(u32, u32)> = (1..=length)
                .flat_map(|y| (1..=width).map(move |x| (x, y)))
                .collect();
            let count = plots.len();
            (
                Just(EstateDimensions::new(width, length)),
                prop::sample::subsequence(plots, 1..=count),
                prop::collection::vec(1u32..=30, count),
            )
                .prop_map(|(dims, plots, heights)| {
                    let trees = plots
                        .into_iter()
                        .zip(heights)
                        .map(|((x, y), h)| Tree::new(x, y, h))
                        .collect();
                    (dims, trees)
                })
        })
    }

    proptest! {
        #[test]
        fn steps_are_contiguous_and_sum_to_total((dims, trees) in estate_with_trees()) {
            let plan = plan_patrol(dims, &trees, &PatrolConfig::default()).unwrap();
            prop_assert!(plan.steps.len() <= step_capacity(dims, trees.len()));
            for (i, step) in plan.steps.iter().enumerate() {
                prop_assert_eq!(step.number, i as u64 + 1);
            }
            prop_assert_eq!(plan.traced_distance() + plan.final_descent, plan.total_distance);

            let horizontal = plan.steps.iter().filter(|s| !s.direction.is_vertical()).count();
            prop_assert_eq!(horizontal, (dims.width * dims.length + dims.length - 1) as usize);
        }

        #[test]
        fn tree_order_does_not_matter(
            (dims, trees) in estate_with_trees(),
            seed in any::<u64>(),
        ) {
            let mut shuffled = trees.clone();
            let len = shuffled.len();
            for i in (1..len).rev() {
                let j = (seed.wrapping_mul(i as u64 + 7) % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }
            let config = PatrolConfig::default();
            let first = plan_patrol(dims, &trees, &config).unwrap();
            prop_assert_eq!(&first, &plan_patrol(dims, &trees, &config).unwrap());
            prop_assert_eq!(first, plan_patrol(dims, &shuffled, &config).unwrap());
        }
    }
}

//! Server configuration from environment.

use estate_core::grid::DEFAULT_DENSE_CELL_LIMIT;
use estate_core::{PatrolConfig, PlantingRules, DEFAULT_MAX_PLOT_COUNT};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    pub patrol: PatrolConfig,
    pub rules: PlantingRules,
}

impl Config {
    pub fn from_env() -> Self {
        let patrol_defaults = PatrolConfig::default();
        let rule_defaults = PlantingRules::default();
        let max_plot_count = env_or("ESTATE_MAX_PLOTS", DEFAULT_MAX_PLOT_COUNT);

        Self {
            server_port: env_or("ESTATE_PORT", 1323),
            database_path: env::var("ESTATE_DATABASE_PATH")
                .unwrap_or_else(|_| "data/estate.db".to_string()),
            database_max_connections: env_or("ESTATE_DATABASE_MAX_CONNECTIONS", 5),
            patrol: PatrolConfig {
                monitor_clearance: env_or(
                    "ESTATE_MONITOR_CLEARANCE",
                    patrol_defaults.monitor_clearance,
                ),
                plot_distance: env_or("ESTATE_PLOT_DISTANCE", patrol_defaults.plot_distance),
                dense_cell_limit: env_or("ESTATE_DENSE_CELL_LIMIT", DEFAULT_DENSE_CELL_LIMIT),
                max_plot_count,
                ..patrol_defaults
            },
            rules: PlantingRules {
                min_tree_height: env_or("ESTATE_TREE_HEIGHT_MIN", rule_defaults.min_tree_height),
                max_tree_height: env_or("ESTATE_TREE_HEIGHT_MAX", rule_defaults.max_tree_height),
                max_estate_dimension: env_or(
                    "ESTATE_MAX_DIMENSION",
                    rule_defaults.max_estate_dimension,
                ),
                max_plot_count,
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

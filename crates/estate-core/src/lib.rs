pub mod error;
pub mod grid;
pub mod models;
pub mod patrol;
pub mod rules;
pub mod trace;

pub use error::{PatrolError, TraceParseError, ValidationError};
pub use grid::{build_grid, height_stats, Grid, HeightMap, HeightStats};
pub use models::{
    CreateEstateRequest, CreateTreeRequest, CreatedResponse, DronePlanResponse, ErrorResponse,
    EstateDimensions, EstateLayout, EstateRecord, EstateStatsResponse, PlotPosition,
    RouteResponse, Tree, TreeRecord,
};
pub use patrol::{
    plan_patrol, Direction, PatrolConfig, PatrolPlan, Step, StepDistance, DEFAULT_MAX_PLOT_COUNT,
};
pub use rules::PlantingRules;
pub use trace::{decode_route, encode_route, rest_position};

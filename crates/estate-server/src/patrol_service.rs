//! Tree planting and patrol recomputation on top of the core planner.

use chrono::Utc;
use estate_core::{
    decode_route, plan_patrol, rest_position, CreateTreeRequest, DronePlanResponse, EstateRecord,
    PatrolConfig, PatrolError, RouteResponse, TraceParseError, Tree, TreeRecord, ValidationError,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::persistence::{estates, trees};
use crate::persistence::trees::InsertTreeOutcome;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum PlantTreeError {
    #[error("estate {0} not found")]
    EstateNotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("plot ({x}, {y}) already has a tree")]
    Occupied { x: u32, y: u32 },

    #[error("failed to calculate stats and distance: {0}")]
    Patrol(#[from] PatrolError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Plant a tree and recompute the estate's statistics and patrol route.
///
/// Insert and recompute commit together; any failure leaves the estate unchanged.
pub async fn plant_tree(
    state: &AppState,
    estate_id: &str,
    request: CreateTreeRequest,
) -> Result<TreeRecord, PlantTreeError> {
    let lock = state.recompute_lock(estate_id);
    let result = {
        let _guard = lock.lock().await;
        plant_tree_locked(state, estate_id, request).await
    };
    drop(lock);
    state.release_recompute_lock(estate_id);
    result
}

async fn plant_tree_locked(
    state: &AppState,
    estate_id: &str,
    request: CreateTreeRequest,
) -> Result<TreeRecord, PlantTreeError> {
    let estate = state
        .get_estate(estate_id)
        .await?
        .ok_or_else(|| PlantTreeError::EstateNotFound(estate_id.to_string()))?;

    let placement = state.config().rules.validate_tree(
        estate.dimensions(),
        request.x,
        request.y,
        request.height,
    )?;

    let tree = TreeRecord {
        id: uuid::Uuid::new_v4().to_string(),
        estate_id: estate.id.clone(),
        x: placement.x,
        y: placement.y,
        height: placement.height,
        created_at: Utc::now(),
    };

    let mut tx = state.pool().begin().await.map_err(anyhow::Error::from)?;
    if trees::insert_tree_tx(&mut tx, &tree).await? == InsertTreeOutcome::Occupied {
        return Err(PlantTreeError::Occupied {
            x: tree.x,
            y: tree.y,
        });
    }

    let planted: Vec<Tree> = trees::load_trees_tx(&mut tx, &estate.id)
        .await?
        .iter()
        .map(TreeRecord::placement)
        .collect();
    let updated = summarize(&estate, &planted, &state.config().patrol)?;

    estates::update_estate_summary_tx(&mut tx, &updated).await?;
    tx.commit().await.map_err(anyhow::Error::from)?;

    info!(
        "Planted tree {} at ({}, {}) in estate {}: {} trees, patrol distance {}",
        tree.id, tree.x, tree.y, updated.id, updated.tree_count, updated.patrol_distance
    );
    state.cache_estate(updated);
    Ok(tree)
}

/// Estate record carrying fresh statistics and route for `trees`.
pub fn summarize(
    estate: &EstateRecord,
    trees: &[Tree],
    config: &PatrolConfig,
) -> Result<EstateRecord, PatrolError> {
    let plan = plan_patrol(estate.dimensions(), trees, config)?;
    debug!(
        "Planned patrol for estate {}: {} steps, {} distance",
        estate.id,
        plan.steps.len(),
        plan.total_distance
    );

    Ok(EstateRecord {
        tree_count: u32::try_from(plan.tree_count).unwrap_or(u32::MAX),
        min_height: plan.stats.min,
        max_height: plan.stats.max,
        median_height: plan.stats.median,
        patrol_distance: plan.total_distance,
        patrol_route: plan.encoded_route(),
        updated_at: Utc::now(),
        ..estate.clone()
    })
}

/// Patrol distance, plus the rest plot when the drone's range is limited.
pub fn drone_plan(
    estate: &EstateRecord,
    max_distance: Option<u64>,
) -> Result<DronePlanResponse, TraceParseError> {
    let rest = match max_distance {
        Some(max_distance) => {
            let steps = decode_route(&estate.patrol_route)?;
            Some(rest_position(
                &steps,
                estate.dimensions(),
                estate.patrol_distance,
                max_distance,
            ))
        }
        None => None,
    };

    Ok(DronePlanResponse {
        distance: estate.patrol_distance,
        rest,
    })
}

pub fn route(estate: &EstateRecord) -> Result<RouteResponse, TraceParseError> {
    let steps = decode_route(&estate.patrol_route)?;
    let traced = steps.last().map_or(0, |step| step.cumulative);
    Ok(RouteResponse {
        distance: estate.patrol_distance,
        final_descent: estate.patrol_distance.saturating_sub(traced),
        steps,
    })
}

//! Estate persistence operations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use estate_core::models::EstateRecord;
use sqlx::{Sqlite, SqlitePool};

/// Insert a new estate.
pub async fn insert_estate(pool: &SqlitePool, estate: &EstateRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO estates (estate_id, width, length, tree_count, min_height, max_height,
                             median_height, patrol_distance, patrol_route, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&estate.id)
    .bind(estate.width as i64)
    .bind(estate.length as i64)
    .bind(estate.tree_count as i64)
    .bind(estate.min_height as i64)
    .bind(estate.max_height as i64)
    .bind(estate.median_height as i64)
    .bind(patrol_distance_column(estate.patrol_distance)?)
    .bind(&estate.patrol_route)
    .bind(estate.created_at.to_rfc3339())
    .bind(estate.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load an estate by ID.
pub async fn get_estate(pool: &SqlitePool, estate_id: &str) -> Result<Option<EstateRecord>> {
    let row = sqlx::query_as::<_, EstateRow>(SELECT_ESTATE)
        .bind(estate_id)
        .fetch_optional(pool)
        .await?;

    row.map(EstateRecord::try_from).transpose()
}

/// Store recomputed statistics and route within an existing transaction.
pub async fn update_estate_summary_tx(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    estate: &EstateRecord,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE estates SET
            tree_count = ?2, min_height = ?3, max_height = ?4, median_height = ?5,
            patrol_distance = ?6, patrol_route = ?7, updated_at = ?8
        WHERE estate_id = ?1
        "#,
    )
    .bind(&estate.id)
    .bind(estate.tree_count as i64)
    .bind(estate.min_height as i64)
    .bind(estate.max_height as i64)
    .bind(estate.median_height as i64)
    .bind(patrol_distance_column(estate.patrol_distance)?)
    .bind(&estate.patrol_route)
    .bind(estate.updated_at.to_rfc3339())
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("estate {} disappeared during update", estate.id);
    }
    Ok(())
}

fn patrol_distance_column(distance: u64) -> Result<i64> {
    i64::try_from(distance).context("patrol distance exceeds storage range")
}

const SELECT_ESTATE: &str = r#"
    SELECT estate_id, width, length, tree_count, min_height, max_height, median_height,
           patrol_distance, patrol_route, created_at, updated_at
    FROM estates WHERE estate_id = ?1
"#;

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct EstateRow {
    estate_id: String,
    width: i64,
    length: i64,
    tree_count: i64,
    min_height: i64,
    max_height: i64,
    median_height: i64,
    patrol_distance: i64,
    patrol_route: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<EstateRow> for EstateRecord {
    type Error = anyhow::Error;

    fn try_from(row: EstateRow) -> Result<Self> {
        Ok(EstateRecord {
            width: u32::try_from(row.width).context("width column")?,
            length: u32::try_from(row.length).context("length column")?,
            tree_count: u32::try_from(row.tree_count).context("tree_count column")?,
            min_height: u32::try_from(row.min_height).context("min_height column")?,
            max_height: u32::try_from(row.max_height).context("max_height column")?,
            median_height: u32::try_from(row.median_height).context("median_height column")?,
            patrol_distance: u64::try_from(row.patrol_distance).context("patrol_distance column")?,
            patrol_route: row.patrol_route,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
            id: row.estate_id,
        })
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

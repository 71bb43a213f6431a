//! Tree persistence operations.

use anyhow::{Context, Result};
use estate_core::models::TreeRecord;
use sqlx::Sqlite;

use super::estates::parse_timestamp;

/// Outcome of planting a tree on a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTreeOutcome {
    Inserted,
    /// Another tree already stands on the plot.
    Occupied,
}

/// Insert a tree within an existing transaction.
pub async fn insert_tree_tx(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    tree: &TreeRecord,
) -> Result<InsertTreeOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO trees (tree_id, estate_id, x, y, height, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&tree.id)
    .bind(&tree.estate_id)
    .bind(tree.x as i64)
    .bind(tree.y as i64)
    .bind(tree.height as i64)
    .bind(tree.created_at.to_rfc3339())
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(InsertTreeOutcome::Inserted),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            Ok(InsertTreeOutcome::Occupied)
        }
        Err(err) => Err(err.into()),
    }
}

/// Load all trees of an estate within an existing transaction.
pub async fn load_trees_tx(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    estate_id: &str,
) -> Result<Vec<TreeRecord>> {
    let rows = sqlx::query_as::<_, TreeRow>(SELECT_TREES)
        .bind(estate_id)
        .fetch_all(&mut **tx)
        .await?;

    rows.into_iter().map(TreeRecord::try_from).collect()
}

const SELECT_TREES: &str =
    "SELECT tree_id, estate_id, x, y, height, created_at FROM trees WHERE estate_id = ?1";

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct TreeRow {
    tree_id: String,
    estate_id: String,
    x: i64,
    y: i64,
    height: i64,
    created_at: String,
}

impl TryFrom<TreeRow> for TreeRecord {
    type Error = anyhow::Error;

    fn try_from(row: TreeRow) -> Result<Self> {
        Ok(TreeRecord {
            x: u32::try_from(row.x).context("x column")?,
            y: u32::try_from(row.y).context("y column")?,
            height: u32::try_from(row.height).context("height column")?,
            created_at: parse_timestamp(&row.created_at),
            id: row.tree_id,
            estate_id: row.estate_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{estates, init_database};
    use chrono::Utc;
    use estate_core::{EstateDimensions, EstateRecord};

    fn tree(id: &str, x: u32, y: u32, height: u32) -> TreeRecord {
        TreeRecord {
            id: id.to_string(),
            estate_id: "estate-1".to_string(),
            x,
            y,
            height,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn occupied_plot_is_reported() {
        let db = init_database(":memory:", 1).await.unwrap();
        let estate = EstateRecord::new(
            "estate-1".to_string(),
            EstateDimensions::new(5, 1),
            Utc::now(),
        );
        estates::insert_estate(db.pool(), &estate).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(
            insert_tree_tx(&mut tx, &tree("t1", 2, 1, 5)).await.unwrap(),
            InsertTreeOutcome::Inserted
        );
        assert_eq!(
            insert_tree_tx(&mut tx, &tree("t2", 2, 1, 9)).await.unwrap(),
            InsertTreeOutcome::Occupied
        );
        assert_eq!(
            insert_tree_tx(&mut tx, &tree("t3", 3, 1, 3)).await.unwrap(),
            InsertTreeOutcome::Inserted
        );
        let trees = load_trees_tx(&mut tx, "estate-1").await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(trees.len(), 2);
        assert!(trees.iter().any(|t| t.placement() == estate_core::Tree::new(2, 1, 5)));
    }
}

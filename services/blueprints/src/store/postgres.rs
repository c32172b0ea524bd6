//! Postgres-backed implementation of the blueprint store.
//!
//! # Data model
//! - `blueprints` holds one row per `(author, name)`; the primary key enforces
//!   uniqueness, so concurrent creates of the same key resolve to one winner.
//! - `blueprint_points` holds the point sequence, ordered by a per-blueprint
//!   `seq` starting at 0.
//!
//! # Consistency
//! - `save_blueprint` inserts the header row and all points in one transaction.
//! - Listings read headers and points inside one `REPEATABLE READ`
//!   transaction, so both queries see the same snapshot.
//! - `add_point` locks the header row with `SELECT ... FOR UPDATE` before
//!   computing the next `seq`, which serializes appends to the same blueprint
//!   while leaving other blueprints unaffected.
//!
//! # Operational notes
//! - Migrations run at connect time via `sqlx::migrate!("./migrations")`.
//! - Database URLs may contain credentials; they are never logged.
use super::{BlueprintStore, StoreError, StoreResult};
use crate::config::PostgresConfig;
use crate::model::{Blueprint, BlueprintKey, Point};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Durable blueprint store backed by Postgres.
///
/// # Example
/// ```rust,no_run
/// use blueprints::config::PostgresConfig;
/// use blueprints::store::postgres::PostgresStore;
///
/// async fn open(pg: PostgresConfig) {
///     let _ = PostgresStore::connect(&pg).await;
/// }
/// ```
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DbBlueprint {
    author: String,
    name: String,
}

#[derive(FromRow)]
struct DbPoint {
    author: String,
    name: String,
    x: i32,
    y: i32,
}

impl PostgresStore {
    /// Connect, size the pool and apply pending migrations.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let pool = tokio::time::timeout(
            Duration::from_millis(pg.connect_timeout_ms),
            PgPoolOptions::new()
                .max_connections(pg.max_connections)
                .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
                .connect_with(connect_options),
        )
        .await
        .map_err(|_| StoreError::Unexpected(anyhow::anyhow!("postgres connect timed out")))??;

        sqlx::migrate!("./migrations").run(&pool).await?;
        let store = Self { pool };
        store.refresh_stored_gauge().await;
        Ok(store)
    }

    async fn refresh_stored_gauge(&self) {
        match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blueprints")
            .fetch_one(&self.pool)
            .await
        {
            Ok(count) => metrics::gauge!("blueprints_stored").set(count as f64),
            Err(err) => tracing::debug!(error = %err, "failed to refresh blueprint count"),
        }
    }

    async fn lock_header(
        tx: &mut Transaction<'_, Postgres>,
        key: &BlueprintKey,
    ) -> StoreResult<()> {
        let found = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM blueprints WHERE author = $1 AND name = $2 FOR UPDATE",
        )
        .bind(&key.author)
        .bind(&key.name)
        .fetch_optional(&mut **tx)
        .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("blueprint {key}"))),
        }
    }

    /// Read headers and points from one snapshot so a concurrent create
    /// cannot appear in one result set but not the other.
    async fn load_listing(&self, author: Option<&str>) -> StoreResult<Vec<Blueprint>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        let headers = sqlx::query_as::<_, DbBlueprint>(
            r#"SELECT author, name FROM blueprints
               WHERE $1::TEXT IS NULL OR author = $1
               ORDER BY author COLLATE "C", name COLLATE "C""#,
        )
        .bind(author)
        .fetch_all(&mut *tx)
        .await?;
        let points = sqlx::query_as::<_, DbPoint>(
            r#"SELECT author, name, x, y FROM blueprint_points
               WHERE $1::TEXT IS NULL OR author = $1
               ORDER BY author, name, seq"#,
        )
        .bind(author)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(assemble(headers, points))
    }

    async fn load_points(&self, key: &BlueprintKey) -> StoreResult<Vec<Point>> {
        let rows = sqlx::query_as::<_, DbPoint>(
            "SELECT author, name, x, y FROM blueprint_points WHERE author = $1 AND name = $2 ORDER BY seq",
        )
        .bind(&key.author)
        .bind(&key.name)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| Point::new(row.x, row.y)).collect())
    }
}

/// Attach point rows (already in `seq` order) to their header rows.
///
/// Point rows whose blueprint is not among `headers` are ignored.
fn assemble(headers: Vec<DbBlueprint>, points: Vec<DbPoint>) -> Vec<Blueprint> {
    let mut grouped: HashMap<(String, String), Vec<Point>> = HashMap::new();
    for row in points {
        grouped
            .entry((row.author, row.name))
            .or_default()
            .push(Point::new(row.x, row.y));
    }
    headers
        .into_iter()
        .map(|header| {
            let points = grouped
                .remove(&(header.author.clone(), header.name.clone()))
                .unwrap_or_default();
            Blueprint::new(header.author, header.name, points)
        })
        .collect()
}

#[async_trait]
impl BlueprintStore for PostgresStore {
    async fn save_blueprint(&self, blueprint: Blueprint) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let insert = sqlx::query("INSERT INTO blueprints (author, name) VALUES ($1, $2)")
            .bind(&blueprint.author)
            .bind(&blueprint.name)
            .execute(&mut *tx)
            .await;
        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(StoreError::AlreadyExists(format!(
                    "blueprint {}",
                    blueprint.key()
                )));
            }
            return Err(StoreError::Unexpected(err.into()));
        }

        for (seq, point) in blueprint.points.iter().enumerate() {
            sqlx::query(
                "INSERT INTO blueprint_points (author, name, seq, x, y) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&blueprint.author)
            .bind(&blueprint.name)
            .bind(seq as i32)
            .bind(point.x)
            .bind(point.y)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.refresh_stored_gauge().await;
        Ok(())
    }

    async fn get_blueprint(&self, key: &BlueprintKey) -> StoreResult<Blueprint> {
        let header = sqlx::query_as::<_, DbBlueprint>(
            "SELECT author, name FROM blueprints WHERE author = $1 AND name = $2",
        )
        .bind(&key.author)
        .bind(&key.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("blueprint {key}")))?;
        let points = self.load_points(key).await?;
        Ok(Blueprint::new(header.author, header.name, points))
    }

    async fn blueprints_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>> {
        let items = self.load_listing(Some(author)).await?;
        if items.is_empty() {
            return Err(StoreError::NotFound(format!("author {author}")));
        }
        Ok(items)
    }

    async fn all_blueprints(&self) -> StoreResult<Vec<Blueprint>> {
        self.load_listing(None).await
    }

    async fn add_point(&self, key: &BlueprintKey, point: Point) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_header(&mut tx, key).await?;
        sqlx::query(
            r#"INSERT INTO blueprint_points (author, name, seq, x, y)
               SELECT $1, $2, COALESCE(MAX(seq) + 1, 0), $3, $4
               FROM blueprint_points WHERE author = $1 AND name = $2"#,
        )
        .bind(&key.author)
        .bind(&key.name)
        .bind(point.x)
        .bind(point.y)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

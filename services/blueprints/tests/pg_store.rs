#![cfg(feature = "pg-tests")]

use blueprints::config::PostgresConfig;
use blueprints::model::{Blueprint, BlueprintKey, Point};
use blueprints::store::postgres::PostgresStore;
use blueprints::store::{BlueprintStore, StoreError};
use serial_test::serial;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

async fn reset_postgres(url: &str) -> Result<(), sqlx::Error> {
    let pool = match tokio::time::timeout(
        std::time::Duration::from_secs(2),
        PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect(url),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => return Err(sqlx::Error::PoolTimedOut),
    };
    // The tables may not exist before the first migration run.
    let _ = sqlx::query("TRUNCATE blueprint_points, blueprints")
        .execute(&pool)
        .await;
    Ok(())
}

async fn pg_store() -> Option<Arc<PostgresStore>> {
    let url = match std::env::var("BLUEPRINTS_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("BLUEPRINTS_POSTGRES_URL"))
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping pg-tests: set BLUEPRINTS_TEST_DATABASE_URL or DATABASE_URL");
            return None;
        }
    };
    if let Err(err) = reset_postgres(&url).await {
        eprintln!("skipping pg-tests: cannot connect to postgres: {err}");
        return None;
    }
    let config = PostgresConfig {
        url: url.clone(),
        max_connections: 5,
        connect_timeout_ms: 5_000,
        acquire_timeout_ms: 5_000,
    };
    let store = PostgresStore::connect(&config).await.expect("connect");
    reset_postgres(&url).await.expect("reset after migrate");
    Some(Arc::new(store))
}

#[tokio::test]
#[serial]
async fn create_get_and_duplicate() {
    let Some(store) = pg_store().await else {
        return;
    };
    let bp = Blueprint::new("john", "house", vec![Point::new(1, 1), Point::new(2, 2)]);
    store.save_blueprint(bp.clone()).await.expect("save");
    assert_eq!(store.get_blueprint(&bp.key()).await.expect("get"), bp);

    let err = store
        .save_blueprint(Blueprint::new("john", "house", vec![]))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(store.get_blueprint(&bp.key()).await.expect("get"), bp);
    assert!(store.is_durable());
    assert_eq!(store.backend_name(), "postgres");
    store.health_check().await.expect("health");
}

#[tokio::test]
#[serial]
async fn append_and_listings() {
    let Some(store) = pg_store().await else {
        return;
    };
    store
        .save_blueprint(Blueprint::new("john", "house", vec![Point::new(1, 1)]))
        .await
        .expect("save");
    store
        .save_blueprint(Blueprint::new("john", "garage", vec![]))
        .await
        .expect("save");
    store
        .save_blueprint(Blueprint::new("jane", "garden", vec![Point::new(5, 5)]))
        .await
        .expect("save");

    let key = BlueprintKey::new("john", "house");
    store.add_point(&key, Point::new(3, 4)).await.expect("append");
    assert_eq!(
        store.get_blueprint(&key).await.expect("get").points,
        vec![Point::new(1, 1), Point::new(3, 4)]
    );

    let garage = BlueprintKey::new("john", "garage");
    store.add_point(&garage, Point::new(7, 7)).await.expect("append to empty");
    assert_eq!(
        store.get_blueprint(&garage).await.expect("get").points,
        vec![Point::new(7, 7)]
    );

    let err = store
        .add_point(&BlueprintKey::new("ghost", "none"), Point::new(0, 0))
        .await
        .expect_err("missing");
    assert!(matches!(err, StoreError::NotFound(_)));

    let johns = store.blueprints_by_author("john").await.expect("john");
    assert_eq!(johns.len(), 2);
    assert!(matches!(
        store.blueprints_by_author("nobody").await,
        Err(StoreError::NotFound(_))
    ));

    let all: Vec<String> = store
        .all_blueprints()
        .await
        .expect("all")
        .iter()
        .map(|bp| bp.key().to_string())
        .collect();
    assert_eq!(all, vec!["jane/garden", "john/garage", "john/house"]);
}

#[tokio::test]
#[serial]
async fn concurrent_appends_keep_every_point() {
    let Some(store) = pg_store().await else {
        return;
    };
    store
        .save_blueprint(Blueprint::new("john", "house", vec![]))
        .await
        .expect("save");
    let key = BlueprintKey::new("john", "house");
    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            store.add_point(&key, Point::new(i, i)).await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("append");
    }
    assert_eq!(store.get_blueprint(&key).await.expect("get").points.len(), 20);
}

#[tokio::test]
#[serial]
async fn listings_during_creates_keep_points_intact() {
    let Some(store) = pg_store().await else {
        return;
    };
    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for i in 0..40 {
                let name = format!("plan-{i:02}");
                store
                    .save_blueprint(Blueprint::new(
                        "john",
                        name,
                        vec![Point::new(i, i), Point::new(i + 1, i + 1)],
                    ))
                    .await
                    .expect("save");
            }
        })
    };
    let mut listings = 0;
    while !writer.is_finished() || listings == 0 {
        for bp in store.all_blueprints().await.expect("all") {
            assert_eq!(bp.points.len(), 2, "{} lost points", bp.key());
        }
        if let Ok(johns) = store.blueprints_by_author("john").await {
            assert!(johns.iter().all(|bp| bp.points.len() == 2));
        }
        listings += 1;
    }
    writer.await.expect("join");
    assert_eq!(store.all_blueprints().await.expect("all").len(), 40);
}

//! In-memory implementation of the blueprint store.
//!
//! # Purpose
//! Implements [`BlueprintStore`] with a `BTreeMap` guarded by a
//! `tokio::sync::RwLock`. Used for local development, tests, and deployments
//! where durability is not required.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Mutations take the write lock, so the uniqueness check and insert of
//!   `save_blueprint` (and the lookup and push of `add_point`) happen as one
//!   step. Reads proceed concurrently under the read lock.
//! - The map is ordered by `(author, name)`, so listings come back sorted.
use super::{BlueprintStore, StoreError, StoreResult};
use crate::model::{Blueprint, BlueprintKey, Point};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryStore {
    blueprints: Arc<RwLock<BTreeMap<BlueprintKey, Blueprint>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            blueprints: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Store pre-populated with a few sample blueprints for demos.
    pub fn with_sample_data() -> Self {
        let samples = [
            Blueprint::new("john", "house", vec![Point::new(0, 0), Point::new(10, 10)]),
            Blueprint::new("john", "garage", vec![Point::new(5, 5), Point::new(15, 15)]),
            Blueprint::new("jane", "garden", vec![Point::new(2, 2), Point::new(20, 20)]),
        ];
        let map = samples
            .into_iter()
            .map(|bp| (bp.key(), bp))
            .collect::<BTreeMap<_, _>>();
        metrics::gauge!("blueprints_stored").set(map.len() as f64);
        Self {
            blueprints: Arc::new(RwLock::new(map)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlueprintStore for InMemoryStore {
    async fn save_blueprint(&self, blueprint: Blueprint) -> StoreResult<()> {
        let mut blueprints = self.blueprints.write().await;
        let key = blueprint.key();
        if blueprints.contains_key(&key) {
            return Err(StoreError::AlreadyExists(format!("blueprint {key}")));
        }
        blueprints.insert(key, blueprint);
        metrics::gauge!("blueprints_stored").set(blueprints.len() as f64);
        Ok(())
    }

    async fn get_blueprint(&self, key: &BlueprintKey) -> StoreResult<Blueprint> {
        self.blueprints
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("blueprint {key}")))
    }

    async fn blueprints_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>> {
        let items: Vec<Blueprint> = self
            .blueprints
            .read()
            .await
            .values()
            .filter(|bp| bp.author == author)
            .cloned()
            .collect();
        if items.is_empty() {
            return Err(StoreError::NotFound(format!("author {author}")));
        }
        Ok(items)
    }

    async fn all_blueprints(&self) -> StoreResult<Vec<Blueprint>> {
        Ok(self.blueprints.read().await.values().cloned().collect())
    }

    async fn add_point(&self, key: &BlueprintKey, point: Point) -> StoreResult<()> {
        let mut blueprints = self.blueprints.write().await;
        let blueprint = blueprints
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(format!("blueprint {key}")))?;
        blueprint.points.push(point);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

//! Resource service over the blueprint store.
//!
//! Forwards to the configured [`BlueprintStore`] and applies the configured
//! [`BlueprintFilter`] to single-item reads. Listings are returned unfiltered.
use crate::filter::BlueprintFilter;
use crate::model::{Blueprint, BlueprintKey, Point};
use crate::store::{BlueprintStore, StoreResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct BlueprintService {
    store: Arc<dyn BlueprintStore>,
    filter: Arc<dyn BlueprintFilter>,
}

impl BlueprintService {
    pub fn new(store: Arc<dyn BlueprintStore>, filter: Arc<dyn BlueprintFilter>) -> Self {
        Self { store, filter }
    }

    pub fn store(&self) -> &Arc<dyn BlueprintStore> {
        &self.store
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Blueprint>> {
        self.store.all_blueprints().await
    }

    pub async fn list_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>> {
        self.store.blueprints_by_author(author).await
    }

    pub async fn get(&self, author: &str, name: &str) -> StoreResult<Blueprint> {
        let blueprint = self
            .store
            .get_blueprint(&BlueprintKey::new(author, name))
            .await?;
        Ok(self.filter.apply(blueprint))
    }

    pub async fn create(&self, blueprint: Blueprint) -> StoreResult<()> {
        let key = blueprint.key();
        self.store.save_blueprint(blueprint).await?;
        metrics::counter!("blueprints_created_total").increment(1);
        tracing::info!(blueprint = %key, "blueprint created");
        Ok(())
    }

    pub async fn append_point(&self, author: &str, name: &str, point: Point) -> StoreResult<()> {
        self.store
            .add_point(&BlueprintKey::new(author, name), point)
            .await?;
        metrics::counter!("blueprints_points_appended_total").increment(1);
        Ok(())
    }
}

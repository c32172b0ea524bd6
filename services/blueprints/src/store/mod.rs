//! Persistence contract for blueprints.
//!
//! # Purpose
//! Defines the [`BlueprintStore`] trait the service layer depends on, plus the
//! error kinds every backend must map its failures onto.
//!
//! # Contract
//! - `save_blueprint` is atomic with respect to `(author, name)` uniqueness:
//!   two concurrent saves of the same key never both succeed.
//! - `add_point` is atomic with respect to one blueprint's point sequence:
//!   concurrent appends are neither lost nor interleaved.
//! - Operations on different keys are independent.
use crate::model::{Blueprint, BlueprintKey, Point};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::Unexpected(value.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(value.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BlueprintStore: Send + Sync {
    async fn save_blueprint(&self, blueprint: Blueprint) -> StoreResult<()>;
    async fn get_blueprint(&self, key: &BlueprintKey) -> StoreResult<Blueprint>;
    /// Fails with `NotFound` when the author owns no blueprints.
    async fn blueprints_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>>;
    async fn all_blueprints(&self) -> StoreResult<Vec<Blueprint>>;
    async fn add_point(&self, key: &BlueprintKey, point: Point) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

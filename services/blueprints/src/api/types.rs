//! Request and response DTOs for the blueprint HTTP API.
use crate::model::Point;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Single-field error body shared by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct NewBlueprintRequest {
    pub author: String,
    pub name: String,
    #[serde(default)]
    pub points: Vec<Point>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub storage: String,
    pub durable: bool,
}

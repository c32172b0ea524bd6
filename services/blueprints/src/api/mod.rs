//! Blueprints HTTP API module.
pub mod blueprints;
pub mod error;
pub mod openapi;
pub mod system;
pub mod types;

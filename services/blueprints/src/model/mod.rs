//! Blueprint data model.
//!
//! # Purpose
//! Re-exports the blueprint, point and key types shared by the store, service
//! and HTTP layers.
mod blueprint;

pub use blueprint::{Blueprint, BlueprintKey, Point};

//! Post-read transformations applied to single blueprint reads.
//!
//! A filter is chosen once at startup from [`FilterKind`] and shared by the
//! service as `Arc<dyn BlueprintFilter>`. Filters never touch stored data.
use crate::model::Blueprint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub trait BlueprintFilter: Send + Sync {
    fn apply(&self, blueprint: Blueprint) -> Blueprint;
}

/// Returns the blueprint unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityFilter;

impl BlueprintFilter for IdentityFilter {
    fn apply(&self, blueprint: Blueprint) -> Blueprint {
        blueprint
    }
}

/// Drops points equal to the point immediately before them.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedundancyFilter;

impl BlueprintFilter for RedundancyFilter {
    fn apply(&self, mut blueprint: Blueprint) -> Blueprint {
        blueprint.points.dedup();
        blueprint
    }
}

/// Keeps the points at even positions (0, 2, 4, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct UndersamplingFilter;

impl BlueprintFilter for UndersamplingFilter {
    fn apply(&self, mut blueprint: Blueprint) -> Blueprint {
        blueprint.points = blueprint.points.into_iter().step_by(2).collect();
        blueprint
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Identity,
    Redundancy,
    Undersampling,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Identity => "identity",
            FilterKind::Redundancy => "redundancy",
            FilterKind::Undersampling => "undersampling",
        }
    }

    pub fn build(self) -> Arc<dyn BlueprintFilter> {
        match self {
            FilterKind::Identity => Arc::new(IdentityFilter),
            FilterKind::Redundancy => Arc::new(RedundancyFilter),
            FilterKind::Undersampling => Arc::new(UndersamplingFilter),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(FilterKind::Identity),
            "redundancy" => Ok(FilterKind::Redundancy),
            "undersampling" => Ok(FilterKind::Undersampling),
            other => Err(format!("unknown filter {other}")),
        }
    }
}

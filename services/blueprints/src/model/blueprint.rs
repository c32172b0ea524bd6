//! Blueprint records and their identifying key.
//!
//! # Purpose
//! A blueprint is an ordered path of integer points owned by an author. The
//! `(author, name)` pair is unique across storage.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlueprintKey {
    pub author: String,
    pub name: String,
}

impl BlueprintKey {
    pub fn new(author: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for BlueprintKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.author, self.name)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub author: String,
    pub name: String,
    /// Drawing order; insertion order is preserved.
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Blueprint {
    pub fn new(author: impl Into<String>, name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
            points,
        }
    }

    pub fn key(&self) -> BlueprintKey {
        BlueprintKey::new(self.author.clone(), self.name.clone())
    }
}

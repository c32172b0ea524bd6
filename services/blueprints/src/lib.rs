//! Blueprints service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, authentication, configuration, filters and storage
//! backends for use by the binary and tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod filter;
pub mod model;
pub mod observability;
pub mod service;
pub mod store;

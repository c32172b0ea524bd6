//! Authentication for the blueprints service.
//!
//! # Purpose
//! Groups the user directory, the login endpoint, bearer checks for the
//! blueprint routes and JWKS publication.
pub mod bearer;
pub mod jwks;
pub mod login;
pub mod users;

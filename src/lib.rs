//! # Average Calculator Service Library
//!
//! Fetches number sequences from an authenticated upstream, keeps a
//! bounded window of unique values seen so far and serves its average.
//!
//! Modules:
//! - `config` — YAML configuration, defaults and validation
//! - `auth` — bearer token slot and its refresh against the auth endpoint
//! - `sources` — categories and the upstream numbers fetcher
//! - `window` — bounded deduplicated window and its shared aggregator
//! - `server` — HTTP routes and the per-request handler

pub mod auth;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod sources;
pub mod tests;
pub mod utils;
pub mod window;


pub use crate::config::settings::ServiceConfig;
pub use crate::errors::{ServiceError, ServiceResult};

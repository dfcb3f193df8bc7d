//! # audionest common library
//!
//! Shared code for the audionest service crates:
//! - Domain models (sources, artifacts, library entries, accounts)
//! - Configuration loading
//! - Database initialization and persisted settings

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};

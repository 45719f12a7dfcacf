//! Shared utilities, configuration, and error handling for Stagelink
//!
//! This crate provides common functionality used across the Stagelink application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Axum extractors shared by domain APIs

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;

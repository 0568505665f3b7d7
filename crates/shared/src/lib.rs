//! Shared types, errors, and configuration for Saldo.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency-code validation and minor-unit rounding helpers
//! - Application-wide error types
//! - Configuration management (tolerances, account resolution)

pub mod config;
pub mod error;
pub mod types;

pub use config::CoreConfig;
pub use error::{AppError, AppResult};

//! Shared types, errors, and configuration for Riska.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Amount and date parsing for externally supplied input
//! - Application-wide error types and the error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig, LoggingConfig};
pub use error::{AppError, AppResult, ErrorKind, InputError};

//! Chart of accounts.
//!
//! This module implements the account registry's domain rules:
//! - The closed classification taxonomy and its reporting families
//! - Normal-balance polarity, derived from classification only
//! - The account entity and its cached balance
//! - Error types for registry operations

pub mod error;
pub mod types;

pub use error::AccountError;
pub use types::{Account, AccountClass, AccountFamily, Polarity};

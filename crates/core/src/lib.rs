//! Core business logic for Riska.
//!
//! This crate contains pure ledger logic with ZERO storage dependencies.
//! All domain types, validation rules, and calculations live here; the
//! `riska-store` crate owns state and concurrency.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts, classifications and polarity
//! - `ledger` - Double-entry bookkeeping and the posting engine
//! - `reports` - Trial balance, income statement, balance sheet, account ledger
//! - `budget` - Budget tracking and variance analysis
//! - `reconciliation` - Bank statement matching

pub mod accounts;
pub mod budget;
pub mod ledger;
pub mod reconciliation;
pub mod reports;

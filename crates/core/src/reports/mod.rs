//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports
//! from a [`LedgerSnapshot`]:
//! - Trial Balance
//! - Income Statement
//! - Balance Sheet
//! - Account Ledger
//! - Custom Ledger (several accounts, selected by id or classification)

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;

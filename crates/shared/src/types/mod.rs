//! Common types used across the application.

pub mod date;
pub mod id;
pub mod money;

pub use date::{DateRange, parse_date, parse_statement_date};
pub use id::*;
pub use money::{parse_amount, parse_statement_amount};

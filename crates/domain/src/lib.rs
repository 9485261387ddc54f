//! # Casebridge Domain
//!
//! Business domain types and models for the Casebridge ERP integration.
//!
//! This crate contains:
//! - Domain data types (vendors, ledger accounts, purchase-order inputs
//!   and results, attachment outcomes)
//! - Domain error types and `Result` definitions
//! - The ERP credential structure
//!
//! ## Architecture
//! - No dependencies on other Casebridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::ErpCredentials;
pub use errors::{CasebridgeError, Result};
pub use types::*;

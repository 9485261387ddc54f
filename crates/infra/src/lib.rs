//! # Casebridge Infrastructure
//!
//! Infrastructure implementations of the core domain ports.
//!
//! This crate contains:
//! - HTTP client wrapper (reqwest with explicit timeout and redirect
//!   control)
//! - The NetSuite integration (request signing, paged SuiteQL queries,
//!   lookup caches, purchase-order and attachment workflows)
//! - The credentials loader
//!
//! ## Architecture
//! - Implements traits defined in `casebridge-core`
//! - Contains all "impure" code (network I/O, environment access)

pub mod config;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use http::HttpClient;
pub use integrations::netsuite::NetSuiteClient;

//! # Casebridge Common
//!
//! Side-effect-free utilities shared across the workspace.
//!
//! This crate contains:
//! - Time abstraction (`Clock`, `SystemClock`, `MockClock`) for
//!   deterministic testing of time-based behavior
//! - A generic expiring value holder (`TtlCell`) backing the ERP lookup
//!   caches
//!
//! ## Architecture
//! - No dependencies on other Casebridge crates
//! - No I/O; everything here is testable without a network or a runtime

pub mod cache;
pub mod time;

pub use cache::TtlCell;
pub use time::{Clock, MockClock, SystemClock};

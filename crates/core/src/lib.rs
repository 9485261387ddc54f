//! # Casebridge Core
//!
//! Port interfaces implemented by the infrastructure crate and consumed
//! by the HTTP layer. Keeping the traits here lets callers depend on the
//! operations without pulling in the HTTP client stack.

pub mod ports;

pub use ports::ErpGateway;

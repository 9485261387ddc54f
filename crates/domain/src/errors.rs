//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Casebridge
///
/// The ERP integration distinguishes four situations: configuration
/// errors (fatal, caught before any network call), transport errors
/// (connection or parse failures), protocol errors (the ERP answered
/// with a non-2xx status) and invalid caller input. Partial failures in
/// the attachment batch are not errors at all; they are accumulated in
/// `AttachmentOutcome`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CasebridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("ERP protocol error: {0}")]
    Protocol(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Casebridge operations
pub type Result<T> = std::result::Result<T, CasebridgeError>;

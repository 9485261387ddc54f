//! NetSuite-specific error classification
//!
//! Non-2xx ERP statuses carry distinct meanings (401/403 authentication,
//! 404 missing record, 4xx bad payload, 5xx outage). This module keeps
//! the classification in one place and converts it to the domain error
//! at the boundary. Nothing here retries; retry policy belongs to the
//! caller.

use std::fmt;

use casebridge_domain::CasebridgeError;

/// Number of response-body characters surfaced in error messages.
/// Keeps ERP error payloads out of logs without hiding the reason.
const BODY_SNIPPET_CHARS: usize = 300;

/// ERP error category derived from an HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErpErrorCategory {
    /// Credentials rejected (401, 403)
    Authentication,

    /// Record or endpoint missing (404)
    NotFound,

    /// Invalid request or payload (other 4xx)
    Validation,

    /// ERP outage (5xx)
    ServerUnavailable,

    /// Anything else
    Unknown,
}

impl ErpErrorCategory {
    fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            404 => Self::NotFound,
            400..=499 => Self::Validation,
            500..=599 => Self::ServerUnavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErpErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication rejected"),
            Self::NotFound => write!(f, "not found"),
            Self::Validation => write!(f, "request rejected"),
            Self::ServerUnavailable => write!(f, "ERP unavailable"),
            Self::Unknown => write!(f, "unexpected response"),
        }
    }
}

/// Classified protocol error with status and a truncated body snippet
#[derive(Debug, Clone)]
pub struct ErpError {
    category: ErpErrorCategory,
    status: u16,
    body_snippet: String,
}

impl ErpError {
    /// Classify a non-2xx response
    pub fn from_status(status: u16, body: &str) -> Self {
        Self {
            category: ErpErrorCategory::from_status(status),
            status,
            body_snippet: truncate_body(body),
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErpErrorCategory {
        self.category
    }

    /// Convert to the domain error type
    ///
    /// Everything status-derived is a protocol error except 404, which
    /// callers may want to treat as an absence rather than a fault.
    pub fn into_domain_error(self) -> CasebridgeError {
        match self.category {
            ErpErrorCategory::NotFound => CasebridgeError::NotFound(self.to_string()),
            _ => CasebridgeError::Protocol(self.to_string()),
        }
    }
}

impl fmt::Display for ErpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.category, self.status)?;
        if !self.body_snippet.is_empty() {
            write!(f, ": {}", self.body_snippet)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErpError {}

impl From<ErpError> for CasebridgeError {
    fn from(err: ErpError) -> Self {
        err.into_domain_error()
    }
}

/// First ~300 characters of a response body, with a marker when cut
pub fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let mut snippet: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        snippet.push_str("...");
        snippet
    }
}

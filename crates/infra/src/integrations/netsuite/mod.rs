//! NetSuite integration module
//!
//! REST client for the NetSuite account, authenticated with OAuth 1.0
//! token-based authentication (TBA, RFC 5849 with HMAC-SHA256).
//!
//! # Architecture
//!
//! - **Signer**: `TbaSigner` - builds the per-request `Authorization` header
//! - **Executor**: `NetSuiteClient::send_*` - issues signed calls and
//!   normalizes responses into `ErpResponse`
//! - **Query**: paged SuiteQL execution plus the cached vendor and
//!   ledger-account lookups
//! - **Workflows**: purchase-order creation (dry-run by default) and the
//!   best-effort file attachment batch
//!
//! # Error Handling
//!
//! - Missing credentials: fails fast with `CasebridgeError::Config`
//!   before any network call
//! - Transport errors: surfaced as `CasebridgeError::Network` by the
//!   lookups, folded into structured results by the workflows
//! - Non-2xx ERP statuses: classified by `ErpError` with the response
//!   body truncated to keep logs sane; never retried automatically
pub mod attachments;
pub mod auth;
pub mod cache;
pub mod client;
pub mod errors;
pub mod purchase_order;
pub mod query;

pub use auth::TbaSigner;
pub use cache::LookupCacheConfig;
pub use client::{ErpResponse, NetSuiteClient};
pub use errors::{ErpError, ErpErrorCategory};

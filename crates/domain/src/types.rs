//! ERP-facing domain types
//!
//! Denormalized projections of ERP records plus the input and result
//! shapes of the purchase-order and attachment workflows. Everything
//! here crosses the boundary to the HTTP layer, so the serialized field
//! names are camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CasebridgeError, Result};

/// Vendor projection, identified by the ERP's immutable internal id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub entity_id: String,
    pub company_name: String,
}

/// General-ledger account projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccount {
    pub id: String,
    pub number: String,
    pub name: String,
}

/// One expense line of a purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    /// General-ledger account to post against; the expense sublist is
    /// the only reliable way to force this per line
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Caller input for purchase-order creation
///
/// The vendor reference by internal id is strongly preferred; free-text
/// name resolution is unreliable for automated creation. Line amounts
/// should sum to `amount` but this is the caller's responsibility, the
/// ERP does not enforce it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Custom header field ids; omitted from the payload when not supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistance_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistance_month_id: Option<String>,
    pub amount: f64,
    pub line_items: Vec<LineItem>,
}

impl PurchaseOrderInput {
    /// Check the invariants the workflow relies on
    ///
    /// # Errors
    /// Returns `CasebridgeError::InvalidInput` when no vendor reference
    /// or no line item is present.
    pub fn validate(&self) -> Result<()> {
        let has_vendor = self.vendor_id.as_deref().is_some_and(|v| !v.trim().is_empty())
            || self.vendor_name.as_deref().is_some_and(|v| !v.trim().is_empty());
        if !has_vendor {
            return Err(CasebridgeError::InvalidInput(
                "purchase order needs a vendor id or vendor name".to_string(),
            ));
        }
        if self.line_items.is_empty() {
            return Err(CasebridgeError::InvalidInput(
                "purchase order needs at least one line item".to_string(),
            ));
        }
        Ok(())
    }
}

/// Detail block of a live purchase-order creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponseDetails {
    pub status: u16,
    pub raw_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_header: Option<String>,
    /// The ERP's numeric identity of the created record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    /// Human-facing transaction number, resolved best-effort
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_number: Option<String>,
}

/// Outcome of a purchase-order creation attempt
///
/// Never raised as an error: transport and protocol failures are folded
/// into `success: false` with a descriptive message so callers can react
/// to "order failed" and "order succeeded, attachment degraded"
/// differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<OrderResponseDetails>,
}

impl CreatedOrderResult {
    /// Failure result with no response details
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), payload: None, response: None }
    }

    /// Append an attachment summary without touching the success flag
    ///
    /// The purchase order is already committed by the time attachments
    /// run, so a degraded attachment batch must never flip `success`.
    pub fn merge_attachment_summary(&mut self, outcome: &AttachmentOutcome) {
        self.message.push_str(". ");
        self.message.push_str(&outcome.summary());
    }
}

/// A source file already retrieved as bytes by an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub name: String,
    pub content: Vec<u8>,
}

/// Per-invocation result of the attachment workflow
///
/// Kept even on total failure, since the purchase order already exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentOutcome {
    pub attached_count: usize,
    pub failed_count: usize,
    /// One entry per failed file, in processing order
    pub errors: Vec<String>,
}

impl AttachmentOutcome {
    /// Human-readable one-liner for merging into the order message
    pub fn summary(&self) -> String {
        if self.failed_count == 0 {
            format!("{} attachment(s) uploaded", self.attached_count)
        } else {
            format!(
                "{} attachment(s) uploaded, {} failed: {}",
                self.attached_count,
                self.failed_count,
                self.errors.join("; ")
            )
        }
    }
}

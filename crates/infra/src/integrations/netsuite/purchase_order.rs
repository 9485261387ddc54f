//! Purchase-order creation workflow
//!
//! Builds the record payload, posts it (unless dry-running, which is the
//! default posture for callers) and resolves the created record's
//! identity. This workflow never returns an error: every failure is
//! folded into a `CreatedOrderResult` with `success: false` so the
//! calling layer always has one shape to render.

use casebridge_domain::{CreatedOrderResult, OrderResponseDetails, PurchaseOrderInput};
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::client::NetSuiteClient;
use super::errors::ErpError;
use super::query::field_str;

const PURCHASE_ORDER_PATH: &str = "/services/rest/record/v1/purchaseorder";

/// Form and subsidiary are fixed for this account; the ERP rejects
/// records created without them
const CUSTOM_FORM_ID: &str = "98";
const SUBSIDIARY_ID: &str = "1";

/// Script ids of the custom header fields
const FIELD_CLIENT_TYPE: &str = "custbody_cb_client_type";
const FIELD_CLIENT_CATEGORY: &str = "custbody_cb_client_category";
const FIELD_ASSISTANCE_TYPE: &str = "custbody_cb_assistance_type";
const FIELD_ASSISTANCE_MONTH: &str = "custbody_cb_assistance_month";

impl NetSuiteClient {
    /// Create a purchase order, or preview the payload when `dry_run`
    ///
    /// Dry-run is the safe default for callers: it validates the input
    /// and returns the exact payload a live post would send, without any
    /// network traffic.
    pub async fn create_purchase_order(
        &self,
        input: &PurchaseOrderInput,
        dry_run: bool,
    ) -> CreatedOrderResult {
        if let Err(err) = input.validate() {
            return CreatedOrderResult::failure(err.to_string());
        }

        let payload = build_payload(input);

        if dry_run {
            return CreatedOrderResult {
                success: true,
                message: "Dry run: payload built, no network call was made".to_string(),
                payload: Some(payload),
                response: None,
            };
        }

        match self.post_purchase_order(&payload).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "purchase order creation failed");
                CreatedOrderResult::failure(format!("Purchase order creation failed: {err}"))
            }
        }
    }

    async fn post_purchase_order(
        &self,
        payload: &Value,
    ) -> casebridge_domain::Result<CreatedOrderResult> {
        let url = self.url(PURCHASE_ORDER_PATH);
        let response = self.send_no_redirect(Method::POST, &url, Some(payload)).await?;

        if !matches!(response.status, 200 | 201 | 204) {
            let err = ErpError::from_status(response.status, &response.body_text());
            return Ok(CreatedOrderResult {
                success: false,
                message: format!("Purchase order rejected: {err}"),
                payload: Some(payload.clone()),
                response: Some(OrderResponseDetails {
                    status: response.status,
                    raw_data: response.body,
                    location_header: response.location,
                    internal_id: None,
                    display_number: None,
                }),
            });
        }

        let internal_id = resolve_internal_id(response.location.as_deref(), &response.body);
        let display_number = match &internal_id {
            Some(id) => self.lookup_display_number(id).await,
            None => None,
        };

        let message = match (&internal_id, &display_number) {
            (Some(id), Some(number)) => format!("Purchase Order created (id {id}, number {number})"),
            (Some(id), None) => format!("Purchase Order created (id {id})"),
            (None, _) => "Purchase Order created".to_string(),
        };
        info!(internal_id = ?internal_id, display_number = ?display_number, "purchase order created");

        Ok(CreatedOrderResult {
            success: true,
            message,
            payload: Some(payload.clone()),
            response: Some(OrderResponseDetails {
                status: response.status,
                raw_data: response.body,
                location_header: response.location,
                internal_id,
                display_number,
            }),
        })
    }

    /// Best-effort resolution of the human-facing transaction number
    ///
    /// A failure here never downgrades the creation result; the order
    /// already exists.
    pub(crate) async fn lookup_display_number(&self, internal_id: &str) -> Option<String> {
        if !internal_id.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let query = format!("SELECT tranid FROM transaction WHERE id = {internal_id}");
        self.lookup_scalar(&query, "tranid").await
    }
}

/// Assemble the REST record payload from the caller input
///
/// Optional fields are left out entirely rather than sent as null, and
/// the expense sublist (not the item sublist) carries the lines so each
/// one posts against its stated ledger account.
pub(crate) fn build_payload(input: &PurchaseOrderInput) -> Value {
    let mut record = Map::new();
    record.insert("customForm".to_string(), json!({ "id": CUSTOM_FORM_ID }));
    record.insert("subsidiary".to_string(), json!({ "id": SUBSIDIARY_ID }));

    match input.vendor_id.as_deref().filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            record.insert("entity".to_string(), json!({ "id": id }));
        }
        None => {
            // Free-text resolution is unreliable; validate() guarantees
            // the name exists when the id is absent
            let name = input.vendor_name.clone().unwrap_or_default();
            warn!(vendor_name = %name, "creating purchase order by vendor name, not id");
            record.insert("entity".to_string(), json!({ "refName": name }));
        }
    }

    if let Some(memo) = compose_memo(input) {
        record.insert("memo".to_string(), Value::String(memo));
    }

    for (field, value) in [
        (FIELD_CLIENT_TYPE, &input.client_type_id),
        (FIELD_CLIENT_CATEGORY, &input.client_category_id),
        (FIELD_ASSISTANCE_TYPE, &input.assistance_type_id),
        (FIELD_ASSISTANCE_MONTH, &input.assistance_month_id),
    ] {
        if let Some(id) = value.as_deref().filter(|id| !id.trim().is_empty()) {
            record.insert(field.to_string(), json!({ "id": id }));
        }
    }

    let lines: Vec<Value> = input
        .line_items
        .iter()
        .map(|line| {
            let mut item = Map::new();
            item.insert("account".to_string(), json!({ "id": line.account_id }));
            if let Some(department) = &line.department_id {
                item.insert("department".to_string(), json!({ "id": department }));
            }
            if let Some(class) = &line.class_id {
                item.insert("class".to_string(), json!({ "id": class }));
            }
            item.insert("quantity".to_string(), json!(line.quantity));
            item.insert("rate".to_string(), json!(line.rate));
            item.insert("amount".to_string(), json!(line.amount));
            item.insert("memo".to_string(), Value::String(line_memo(line, input)));
            Value::Object(item)
        })
        .collect();
    record.insert("expense".to_string(), json!({ "items": lines }));

    Value::Object(record)
}

/// Header memo: region / program / client, then the caller's notes
fn compose_memo(input: &PurchaseOrderInput) -> Option<String> {
    let parts: Vec<&str> = [&input.region, &input.program, &input.client_name]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.trim().is_empty())
        .collect();

    let mut memo = parts.join(" / ");
    if let Some(notes) = input.memo.as_deref().filter(|notes| !notes.trim().is_empty()) {
        if memo.is_empty() {
            memo = notes.to_string();
        } else {
            memo.push_str(" - ");
            memo.push_str(notes);
        }
    }

    if memo.is_empty() {
        None
    } else {
        Some(memo)
    }
}

/// Line memo: the description, suffixed with the caller's notes
fn line_memo(line: &casebridge_domain::LineItem, input: &PurchaseOrderInput) -> String {
    match input.memo.as_deref().filter(|notes| !notes.trim().is_empty()) {
        Some(notes) => format!("{} - {}", line.description, notes),
        None => line.description.clone(),
    }
}

/// Internal id from the `Location` header, falling back to the body
///
/// The ERP signals creation with a redirect whose trailing path segment
/// is the numeric record id. Some responses instead (or additionally)
/// carry `id`/`internalId` in the body.
pub(crate) fn resolve_internal_id(location: Option<&str>, body: &Value) -> Option<String> {
    if let Some(location) = location {
        if let Some(segment) = location.trim_end_matches('/').rsplit('/').next() {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                return Some(segment.to_string());
            }
        }
    }

    field_str(body, "id").or_else(|| field_str(body, "internalId"))
}

//! Shared helpers for the infra integration tests

#![allow(dead_code)]

use casebridge_domain::{ErpCredentials, LineItem, PurchaseOrderInput, SourceFile};
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
});

/// Initialize tracing once per test binary
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Complete sandbox-style credential set
pub fn credentials() -> ErpCredentials {
    ErpCredentials {
        account_id: "1234567_SB1".to_string(),
        consumer_key: "integration-ck".to_string(),
        consumer_secret: "integration-cs".to_string(),
        token_id: "integration-tk".to_string(),
        token_secret: "integration-ts".to_string(),
    }
}

/// A single-line rental assistance order
pub fn order_input() -> PurchaseOrderInput {
    PurchaseOrderInput {
        vendor_id: Some("42".to_string()),
        region: Some("North".to_string()),
        program: Some("Rental Assistance".to_string()),
        client_name: Some("J. Doe".to_string()),
        memo: Some("March rent".to_string()),
        amount: 1200.0,
        line_items: vec![LineItem {
            description: "Rent".to_string(),
            account_id: "615".to_string(),
            department_id: None,
            class_id: None,
            quantity: 1.0,
            rate: 1200.0,
            amount: 1200.0,
        }],
        ..PurchaseOrderInput::default()
    }
}

/// A small fake PDF buffer
pub fn pdf(name: &str) -> SourceFile {
    SourceFile { name: name.to_string(), content: b"%PDF-1.4 integration".to_vec() }
}

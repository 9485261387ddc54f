//! ERP integration port interfaces

use async_trait::async_trait;
use casebridge_domain::{
    AttachmentOutcome, CreatedOrderResult, LedgerAccount, PurchaseOrderInput, Result, SourceFile,
    Vendor,
};

/// Trait for ERP gateway operations
///
/// The lookup operations (`get_vendors`, `get_accounts`) let errors
/// propagate; they are read-only and safe to surface upstream as
/// 502-class failures. The two workflow operations never return `Err`:
/// they fold every failure into their structured result value because
/// the caller must distinguish "order failed" from "order succeeded,
/// attachment degraded".
#[async_trait]
pub trait ErpGateway: Send + Sync {
    /// Probe ERP connectivity with a lightweight metadata request
    async fn test_connection(&self) -> Result<bool>;

    /// Active vendors, served from a TTL cache backed by a full
    /// paginated scan
    async fn get_vendors(&self) -> Result<Vec<Vendor>>;

    /// Active expense accounts, served from a TTL cache backed by a
    /// full paginated scan
    async fn get_accounts(&self) -> Result<Vec<LedgerAccount>>;

    /// Build (and in live mode post) a purchase order
    ///
    /// With `dry_run` the payload is validated and echoed back without
    /// any network call; callers should default to dry-run and opt into
    /// live posting explicitly.
    async fn create_purchase_order(
        &self,
        input: &PurchaseOrderInput,
        dry_run: bool,
    ) -> CreatedOrderResult;

    /// Upload source files and link them to an already-created purchase
    /// order; best-effort per file, never all-or-nothing
    async fn upload_and_attach_files(
        &self,
        internal_id: &str,
        display_number: Option<&str>,
        files: &[SourceFile],
    ) -> AttachmentOutcome;
}

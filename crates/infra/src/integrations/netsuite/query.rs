//! SuiteQL execution and cached reference-data lookups
//!
//! SuiteQL is the ERP's SQL-ish query surface. Results come back in
//! pages of at most 1000 rows; `fetch_all_rows` walks the pages until
//! `hasMore` goes false. The vendor and ledger-account lists sit behind
//! the TTL cache cells owned by the client.

use casebridge_domain::{LedgerAccount, Result, Vendor};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::client::NetSuiteClient;
use super::errors::ErpError;

/// Maximum rows per SuiteQL page; the ERP caps requests at this size
pub const QUERY_PAGE_SIZE: usize = 1000;

const SUITEQL_PATH: &str = "/services/rest/query/v1/suiteql";

const VENDOR_QUERY: &str =
    "SELECT id, entityid, companyname FROM vendor WHERE isinactive = 'F' ORDER BY companyname";

const ACCOUNT_QUERY: &str =
    "SELECT id, acctnumber, fullname FROM account WHERE isinactive = 'F' ORDER BY acctnumber";

/// One page of SuiteQL results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub has_more: bool,
}

impl NetSuiteClient {
    /// Run one SuiteQL page
    ///
    /// # Errors
    /// Transport failures are `Network`; non-2xx statuses are classified
    /// by [`ErpError`] and surface as `Protocol` or `NotFound`.
    pub async fn run_suiteql(&self, query: &str, limit: usize, offset: usize) -> Result<QueryPage> {
        let url = format!("{}?limit={limit}&offset={offset}", self.url(SUITEQL_PATH));
        let body = json!({ "q": query });

        // The transient preference skips server-side result caching
        let response =
            self.send(Method::POST, &url, Some(&body), &[("Prefer", "transient")]).await?;

        if !response.is_success() {
            return Err(ErpError::from_status(response.status, &response.body_text()).into());
        }

        let page: QueryPage = serde_json::from_value(response.body).map_err(|err| {
            casebridge_domain::CasebridgeError::Protocol(format!(
                "malformed SuiteQL response: {err}"
            ))
        })?;
        Ok(page)
    }

    /// Run a query to exhaustion, concatenating the pages in order
    pub async fn fetch_all_rows(&self, query: &str) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.run_suiteql(query, QUERY_PAGE_SIZE, offset).await?;
            let fetched = page.items.len();
            rows.extend(page.items);

            debug!(offset, fetched, has_more = page.has_more, "SuiteQL page consumed");
            if !page.has_more || fetched == 0 {
                break;
            }
            offset += QUERY_PAGE_SIZE;
        }

        Ok(rows)
    }

    /// Active vendors, cached for the configured TTL
    pub async fn get_vendors(&self) -> Result<Vec<Vendor>> {
        self.caches
            .vendors
            .get_or_try_populate(self.caches.list_ttl(), || async {
                let rows = self.fetch_all_rows(VENDOR_QUERY).await?;
                let vendors: Vec<Vendor> = rows
                    .iter()
                    .filter_map(|row| {
                        let id = field_str(row, "id")?;
                        Some(Vendor {
                            id,
                            entity_id: field_str(row, "entityid").unwrap_or_default(),
                            company_name: field_str(row, "companyname").unwrap_or_default(),
                        })
                    })
                    .collect();
                debug!(count = vendors.len(), "vendor list refreshed");
                Ok(vendors)
            })
            .await
    }

    /// Active ledger accounts, cached for the configured TTL
    pub async fn get_accounts(&self) -> Result<Vec<LedgerAccount>> {
        self.caches
            .accounts
            .get_or_try_populate(self.caches.list_ttl(), || async {
                let rows = self.fetch_all_rows(ACCOUNT_QUERY).await?;
                let accounts: Vec<LedgerAccount> = rows
                    .iter()
                    .filter_map(|row| {
                        let id = field_str(row, "id")?;
                        Some(LedgerAccount {
                            id,
                            number: field_str(row, "acctnumber").unwrap_or_default(),
                            name: field_str(row, "fullname").unwrap_or_default(),
                        })
                    })
                    .collect();
                debug!(count = accounts.len(), "ledger account list refreshed");
                Ok(accounts)
            })
            .await
    }

    /// Best-effort single-value lookup; absence and failure both yield `None`
    pub(crate) async fn lookup_scalar(&self, query: &str, column: &str) -> Option<String> {
        match self.run_suiteql(query, 1, 0).await {
            Ok(page) => page.items.first().and_then(|row| field_str(row, column)),
            Err(err) => {
                warn!(error = %err, "scalar lookup failed");
                None
            }
        }
    }
}

/// Pull a field from a result row, tolerating numeric encodings
///
/// SuiteQL serializes ids as strings or numbers depending on column
/// type, so both are accepted.
pub(crate) fn field_str(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

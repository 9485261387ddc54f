//! Signed request executor for the NetSuite REST surface
//!
//! `NetSuiteClient` owns the credentials, the TBA signer, two HTTP
//! clients (record creation must not follow redirects, everything else
//! may) and the lookup caches. Every outgoing request is signed
//! immediately before dispatch so the timestamp and nonce are fresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use casebridge_common::time::SystemClock;
use casebridge_domain::{
    AttachmentOutcome, CasebridgeError, CreatedOrderResult, ErpCredentials, LedgerAccount,
    PurchaseOrderInput, Result, SourceFile, Vendor,
};
use casebridge_core::ErpGateway;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use super::auth::TbaSigner;
use super::cache::{LookupCacheConfig, LookupCaches};
use crate::http::HttpClient;

/// Path probed by `test_connection`; cheap and requires valid auth
const HEALTH_PROBE_PATH: &str = "/services/rest/record/v1/metadata-catalog/";

/// The probe answers a yes/no question; it gets a much tighter deadline
/// than the 30s the workflow calls ride on
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Normalized ERP response
///
/// The body is parsed JSON when the server declared a JSON content type,
/// otherwise the raw text wrapped as a JSON string. Empty bodies become
/// `Value::Null`.
#[derive(Debug, Clone)]
pub struct ErpResponse {
    pub status: u16,
    pub body: Value,
    pub location: Option<String>,
}

impl ErpResponse {
    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body rendered back to text, for error snippets
    pub fn body_text(&self) -> String {
        match &self.body {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// NetSuite REST client with TBA signing and cached lookups
pub struct NetSuiteClient {
    base_url: String,
    signer: TbaSigner<SystemClock>,
    http: HttpClient,
    record_http: HttpClient,
    pub(crate) caches: LookupCaches,
}

impl NetSuiteClient {
    /// Create a client for the account the credentials belong to
    ///
    /// # Errors
    /// Returns `CasebridgeError::Config` for incomplete credentials;
    /// nothing touches the network here.
    pub fn new(credentials: ErpCredentials) -> Result<Self> {
        let base_url = credentials.rest_base_url();
        Self::with_base_url(credentials, base_url)
    }

    /// Create a client pointed at an explicit base URL
    ///
    /// Lets tests aim the client at a local mock server while keeping
    /// the signing path identical to production.
    pub fn with_base_url(credentials: ErpCredentials, base_url: impl Into<String>) -> Result<Self> {
        let credentials = Arc::new(credentials);
        let signer = TbaSigner::new(Arc::clone(&credentials))?;
        let http = HttpClient::new()?;
        let record_http = HttpClient::builder().follow_redirects(false).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signer,
            http,
            record_http,
            caches: LookupCaches::new(LookupCacheConfig::default()),
        })
    }

    /// Override the lookup cache configuration
    pub fn with_cache_config(mut self, config: LookupCacheConfig) -> Self {
        self.caches = LookupCaches::new(config);
        self
    }

    /// Absolute URL for a path under the account's REST root
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a signed request, following redirects
    pub(crate) async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<ErpResponse> {
        self.dispatch(&self.http, method, url, body, extra_headers, None).await
    }

    /// Issue a signed request without following redirects
    ///
    /// Record creation answers with a 3xx whose `Location` header names
    /// the new record; that header must survive to the caller.
    pub(crate) async fn send_no_redirect(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ErpResponse> {
        self.dispatch(&self.record_http, method, url, body, &[], None).await
    }

    async fn dispatch(
        &self,
        client: &HttpClient,
        method: Method,
        url: &str,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<ErpResponse> {
        let authorization = self.signer.authorization_header(&method, url)?;

        let mut builder = client
            .request(method, url)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        if let Some(deadline) = timeout {
            builder = builder.timeout(deadline);
        }
        if let Some(json) = body {
            builder = builder.json(json);
        }

        let response = client.send(builder).await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get("Location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let is_json = response
            .headers()
            .get("Content-Type")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));

        let text = response
            .text()
            .await
            .map_err(|err| CasebridgeError::Network(format!("failed to read ERP response: {err}")))?;

        let body = if text.is_empty() {
            Value::Null
        } else if is_json {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };

        Ok(ErpResponse { status, body, location })
    }

    /// Probe the account with a signed metadata request
    ///
    /// `Ok(true)` means the credentials work, `Ok(false)` means they were
    /// rejected, the host was unreachable, or the probe deadline passed.
    /// Only non-network faults (bad config, signing failure) surface as
    /// errors.
    pub async fn test_connection(&self) -> Result<bool> {
        let url = self.url(HEALTH_PROBE_PATH);
        match self.dispatch(&self.http, Method::GET, &url, None, &[], Some(PROBE_TIMEOUT)).await {
            Ok(response) => {
                debug!(status = response.status, "connection probe answered");
                Ok(response.is_success())
            }
            Err(CasebridgeError::Network(detail)) => {
                warn!(%detail, "connection probe could not reach the ERP");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl ErpGateway for NetSuiteClient {
    async fn test_connection(&self) -> Result<bool> {
        NetSuiteClient::test_connection(self).await
    }

    async fn get_vendors(&self) -> Result<Vec<Vendor>> {
        NetSuiteClient::get_vendors(self).await
    }

    async fn get_accounts(&self) -> Result<Vec<LedgerAccount>> {
        NetSuiteClient::get_accounts(self).await
    }

    async fn create_purchase_order(
        &self,
        input: &PurchaseOrderInput,
        dry_run: bool,
    ) -> CreatedOrderResult {
        NetSuiteClient::create_purchase_order(self, input, dry_run).await
    }

    async fn upload_and_attach_files(
        &self,
        internal_id: &str,
        display_number: Option<&str>,
        files: &[SourceFile],
    ) -> AttachmentOutcome {
        NetSuiteClient::upload_and_attach_files(self, internal_id, display_number, files).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn credentials() -> ErpCredentials {
        ErpCredentials {
            account_id: "1234567_SB1".to_string(),
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            token_id: "tk".to_string(),
            token_secret: "ts".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> NetSuiteClient {
        NetSuiteClient::with_base_url(credentials(), server.uri()).expect("client")
    }

    #[test]
    fn base_url_is_derived_from_the_account_id() {
        let client = NetSuiteClient::new(credentials()).expect("client");
        assert_eq!(
            client.url("/services/rest/record/v1/purchaseorder"),
            "https://1234567-sb1.suitetalk.api.netsuite.com/services/rest/record/v1/purchaseorder"
        );
    }

    #[test]
    fn incomplete_credentials_fail_fast() {
        let mut creds = credentials();
        creds.token_secret = String::new();
        assert!(matches!(NetSuiteClient::new(creds), Err(CasebridgeError::Config(_))));
    }

    #[tokio::test]
    async fn requests_carry_an_oauth_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(HEALTH_PROBE_PATH))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.test_connection().await.expect("probe"));
    }

    #[tokio::test]
    async fn rejected_probe_reports_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid login attempt"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(!client.test_connection().await.expect("probe"));
    }

    #[tokio::test]
    async fn probe_gives_up_after_its_own_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(HEALTH_PROBE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_delay(PROBE_TIMEOUT + Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let started = std::time::Instant::now();
        assert!(!client.test_connection().await.expect("probe"));
        // Must cut off at the probe deadline, well before the 30s
        // general-purpose client timeout
        assert!(started.elapsed() < PROBE_TIMEOUT + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn unreachable_host_reports_false_instead_of_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server); // free the port so the request is refused

        let client = NetSuiteClient::with_base_url(credentials(), uri).expect("client");
        assert!(!client.test_connection().await.expect("probe"));
    }

    #[tokio::test]
    async fn non_json_bodies_are_wrapped_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500)
                    .insert_header("Content-Type", "text/html")
                    .set_body_string("<html>oops</html>"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .send(Method::GET, &client.url("/whatever"), None, &[])
            .await
            .expect("transport ok");

        assert_eq!(response.status, 500);
        assert_eq!(response.body, Value::String("<html>oops</html>".to_string()));
        assert_eq!(response.body_text(), "<html>oops</html>");
    }
}

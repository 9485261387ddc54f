//! OAuth 1.0 token-based authentication (TBA)
//!
//! Implements the RFC 5849 signature protocol with HMAC-SHA256, the
//! variant NetSuite requires for service-to-service calls. Each request
//! gets a fresh nonce and timestamp; query parameters of the target URL
//! take part in the signature base string but are never emitted as
//! header fields.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use casebridge_common::time::{Clock, SystemClock};
use casebridge_domain::{CasebridgeError, ErpCredentials, Result};
use hmac::{Hmac, Mac};
use rand::RngCore;
use reqwest::Method;
use sha2::Sha256;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_METHOD: &str = "HMAC-SHA256";
const OAUTH_VERSION: &str = "1.0";
const NONCE_BYTES: usize = 16;

/// Builds per-request `Authorization` headers for NetSuite TBA
///
/// Credentials are validated at construction so every later signing call
/// can assume a complete credential set.
pub struct TbaSigner<C: Clock = SystemClock> {
    credentials: Arc<ErpCredentials>,
    clock: C,
}

impl TbaSigner<SystemClock> {
    /// Create a signer backed by the system clock
    ///
    /// # Errors
    /// Returns `CasebridgeError::Config` when any credential field is
    /// missing; no network call is ever attempted with bad credentials.
    pub fn new(credentials: Arc<ErpCredentials>) -> Result<Self> {
        Self::with_clock(credentials, SystemClock)
    }
}

impl<C: Clock> TbaSigner<C> {
    /// Create a signer with a custom clock (for testing)
    pub fn with_clock(credentials: Arc<ErpCredentials>, clock: C) -> Result<Self> {
        credentials.validate()?;
        Ok(Self { credentials, clock })
    }

    /// Compute the `Authorization` header value for one request
    ///
    /// The URL may carry query parameters; they are folded into the
    /// signature base per RFC 5849 but excluded from the header itself.
    pub fn authorization_header(&self, method: &Method, url: &str) -> Result<String> {
        let nonce = generate_nonce();
        let timestamp = self.clock.unix_seconds();
        self.header_with(method.as_str(), url, &nonce, timestamp)
    }

    /// Deterministic inner header builder; pure function of its inputs
    fn header_with(&self, method: &str, url: &str, nonce: &str, timestamp: u64) -> Result<String> {
        let parsed = Url::parse(url).map_err(|err| {
            CasebridgeError::Internal(format!("cannot sign malformed URL {url}: {err}"))
        })?;

        let oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".to_string(), self.credentials.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.credentials.token_id.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];

        let base = signature_base_string(method, &parsed, &oauth_params);
        let signature = self.sign(&base)?;

        let mut header_params = oauth_params;
        header_params.push(("oauth_signature".to_string(), signature));
        header_params.sort_by(|a, b| a.0.cmp(&b.0));

        let joined = header_params
            .iter()
            .map(|(key, value)| format!(r#"{}="{}""#, percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(r#"OAuth realm="{}", {}"#, self.credentials.account_id, joined))
    }

    /// HMAC-SHA256 over the base string, keyed on both secrets
    fn sign(&self, base: &str) -> Result<String> {
        let key = format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.token_secret)
        );
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|err| CasebridgeError::Internal(format!("HMAC key setup failed: {err}")))?;
        mac.update(base.as_bytes());
        Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// RFC 5849 §3.4.1 signature base string
///
/// Merges the OAuth parameters with the URL's query parameters, sorts
/// the percent-encoded pairs, and joins method, base URL and parameter
/// string with `&`.
fn signature_base_string(method: &str, url: &Url, oauth_params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    for (key, value) in url.query_pairs() {
        encoded.push((percent_encode(&key), percent_encode(&value)));
    }
    // Sort by encoded key, ties broken by encoded value
    encoded.sort();

    let param_string =
        encoded.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_string_url(url)),
        percent_encode(&param_string)
    )
}

/// Scheme, host, optional non-default port and path; query and fragment
/// are excluded from the base URL per the RFC
fn base_string_url(url: &Url) -> String {
    let mut base = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        base.push_str(&format!(":{port}"));
    }
    base.push_str(url.path());
    base
}

/// RFC 3986 percent-encoding with the RFC 5849 exceptions
///
/// Only unreserved characters (`A-Z a-z 0-9 - . _ ~`) stay literal;
/// in particular `! * ' ( )` are escaped, which plain form-encoding
/// would leave alone.
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Random nonce, 16 bytes hex-encoded
fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

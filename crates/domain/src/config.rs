//! ERP credential configuration
//!
//! Token-based authentication against the ERP needs five secrets. They
//! are loaded once at process start (see `casebridge-infra::config`) and
//! never mutated afterwards; a missing field fails every operation
//! immediately with a configuration error rather than a silent no-op.

use serde::{Deserialize, Serialize};

use crate::errors::{CasebridgeError, Result};

/// NetSuite token-based authentication credentials
///
/// All five fields are required. `consumer_key`/`consumer_secret`
/// identify the integration record; `token_id`/`token_secret` identify
/// the access token issued for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpCredentials {
    pub account_id: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token_id: String,
    pub token_secret: String,
}

impl ErpCredentials {
    /// Verify that every credential field is present
    ///
    /// # Errors
    /// Returns `CasebridgeError::Config` naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("account id", &self.account_id),
            ("consumer key", &self.consumer_key),
            ("consumer secret", &self.consumer_secret),
            ("token id", &self.token_id),
            ("token secret", &self.token_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CasebridgeError::Config(format!(
                    "NetSuite credential '{name}' is missing"
                )));
            }
        }
        Ok(())
    }

    /// Base URL of the account-specific REST host
    ///
    /// Account ids use underscores (e.g. `1234567_SB1`) while the REST
    /// hostname wants lowercase with dashes (`1234567-sb1`).
    pub fn rest_base_url(&self) -> String {
        let host_account = self.account_id.to_lowercase().replace('_', "-");
        format!("https://{host_account}.suitetalk.api.netsuite.com")
    }
}

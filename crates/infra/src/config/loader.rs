//! Credentials loader
//!
//! Loads the five NetSuite TBA secrets from environment variables.
//!
//! ## Environment Variables
//! - `NETSUITE_ACCOUNT_ID`: Account id (underscores allowed, e.g. `1234567_SB1`)
//! - `NETSUITE_CONSUMER_KEY`: Integration record consumer key
//! - `NETSUITE_CONSUMER_SECRET`: Integration record consumer secret
//! - `NETSUITE_TOKEN_ID`: Access token id
//! - `NETSUITE_TOKEN_SECRET`: Access token secret
//!
//! There is no file fallback for these values on purpose: they are
//! secrets and belong in the deployment environment, not on disk.

use casebridge_domain::{CasebridgeError, ErpCredentials, Result};

const ENV_ACCOUNT_ID: &str = "NETSUITE_ACCOUNT_ID";
const ENV_CONSUMER_KEY: &str = "NETSUITE_CONSUMER_KEY";
const ENV_CONSUMER_SECRET: &str = "NETSUITE_CONSUMER_SECRET";
const ENV_TOKEN_ID: &str = "NETSUITE_TOKEN_ID";
const ENV_TOKEN_SECRET: &str = "NETSUITE_TOKEN_SECRET";

/// Load ERP credentials from the environment
///
/// # Errors
/// Returns `CasebridgeError::Config` naming the first missing or empty
/// variable. Every operation of the integration fails immediately when
/// loading fails; there is no degraded mode.
pub fn load_credentials() -> Result<ErpCredentials> {
    let credentials = ErpCredentials {
        account_id: env_var(ENV_ACCOUNT_ID)?,
        consumer_key: env_var(ENV_CONSUMER_KEY)?,
        consumer_secret: env_var(ENV_CONSUMER_SECRET)?,
        token_id: env_var(ENV_TOKEN_ID)?,
        token_secret: env_var(ENV_TOKEN_SECRET)?,
    };
    credentials.validate()?;
    tracing::info!(account_id = %credentials.account_id, "ERP credentials loaded from environment");
    Ok(credentials)
}

fn env_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CasebridgeError::Config(format!(
            "required environment variable {name} is not set"
        ))),
    }
}

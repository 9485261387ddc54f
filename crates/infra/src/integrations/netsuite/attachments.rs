//! Best-effort file attachment workflow
//!
//! Runs only after a live purchase-order creation succeeded, so nothing
//! here may fail the order: every fault is recorded in the outcome and
//! processing moves on to the next file. Files land in one well-known
//! file-cabinet folder, resolved once per process via find-or-create.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use casebridge_domain::{AttachmentOutcome, CasebridgeError, Result, SourceFile};
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use super::client::NetSuiteClient;
use super::errors::ErpError;
use super::purchase_order::resolve_internal_id;

const ATTACHMENTS_FOLDER_NAME: &str = "Casebridge Attachments";
const FOLDER_PATH: &str = "/services/rest/record/v1/folder";
const FILE_PATH: &str = "/services/rest/record/v1/file";

impl NetSuiteClient {
    /// Upload the given files and attach each to the purchase order
    ///
    /// The derived file names are prefixed with the display number when
    /// known, else the internal id, so attachments stay discoverable in
    /// the ERP's file browser. Individual failures are collected and do
    /// not stop the batch; a missing attachments folder fails every file.
    pub async fn upload_and_attach_files(
        &self,
        internal_id: &str,
        display_number: Option<&str>,
        files: &[SourceFile],
    ) -> AttachmentOutcome {
        if files.is_empty() {
            return AttachmentOutcome::default();
        }

        let folder_id = match self
            .caches
            .folder_id
            .get_or_try_populate(None, || self.find_or_create_folder())
            .await
        {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "attachments folder unavailable, failing the batch");
                return AttachmentOutcome {
                    attached_count: 0,
                    failed_count: files.len(),
                    errors: files
                        .iter()
                        .map(|file| format!("{}: attachments folder unavailable: {err}", file.name))
                        .collect(),
                };
            }
        };

        let prefix = display_number.unwrap_or(internal_id);
        let mut outcome = AttachmentOutcome::default();

        for file in files {
            match self.upload_and_attach_one(&folder_id, internal_id, prefix, file).await {
                Ok(()) => outcome.attached_count += 1,
                Err(err) => {
                    warn!(file = %file.name, error = %err, "attachment failed, continuing");
                    outcome.failed_count += 1;
                    outcome.errors.push(format!("{}: {err}", file.name));
                }
            }
        }

        info!(
            attached = outcome.attached_count,
            failed = outcome.failed_count,
            "attachment batch finished"
        );
        outcome
    }

    /// Find-or-create the well-known attachments folder
    ///
    /// A failed lookup is logged and creation is attempted anyway; only a
    /// creation failure after that is fatal to the caller.
    async fn find_or_create_folder(&self) -> Result<String> {
        let query =
            format!("SELECT id FROM mediaitemfolder WHERE name = '{ATTACHMENTS_FOLDER_NAME}'");
        if let Some(id) = self.lookup_scalar(&query, "id").await {
            return Ok(id);
        }

        let body = json!({ "name": ATTACHMENTS_FOLDER_NAME });
        let response =
            self.send_no_redirect(Method::POST, &self.url(FOLDER_PATH), Some(&body)).await?;
        if !response.is_success() {
            return Err(ErpError::from_status(response.status, &response.body_text()).into());
        }

        resolve_internal_id(response.location.as_deref(), &response.body).ok_or_else(|| {
            CasebridgeError::Protocol("folder creation response carried no id".to_string())
        })
    }

    async fn upload_and_attach_one(
        &self,
        folder_id: &str,
        purchase_order_id: &str,
        prefix: &str,
        file: &SourceFile,
    ) -> Result<()> {
        let body = json!({
            "name": format!("{prefix}_{}", file.name),
            "folder": { "id": folder_id },
            "content": BASE64_STANDARD.encode(&file.content),
        });
        let response =
            self.send_no_redirect(Method::POST, &self.url(FILE_PATH), Some(&body)).await?;
        if !response.is_success() {
            return Err(ErpError::from_status(response.status, &response.body_text()).into());
        }
        let file_id =
            resolve_internal_id(response.location.as_deref(), &response.body).ok_or_else(|| {
                CasebridgeError::Protocol("file creation response carried no id".to_string())
            })?;

        let attach_url = self.url(&format!(
            "/services/rest/record/v1/purchaseorder/{purchase_order_id}/!transform/attach"
        ));
        let attach_body = json!({ "file": { "id": file_id } });
        let response = self.send(Method::POST, &attach_url, Some(&attach_body), &[]).await?;
        if !response.is_success() {
            return Err(ErpError::from_status(response.status, &response.body_text()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use casebridge_domain::ErpCredentials;
    use serde_json::Value;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const SUITEQL_PATH: &str = "/services/rest/query/v1/suiteql";

    fn client_for(server: &MockServer) -> NetSuiteClient {
        NetSuiteClient::with_base_url(
            ErpCredentials {
                account_id: "1234567".to_string(),
                consumer_key: "ck".to_string(),
                consumer_secret: "cs".to_string(),
                token_id: "tk".to_string(),
                token_secret: "ts".to_string(),
            },
            server.uri(),
        )
        .expect("client")
    }

    fn file(name: &str) -> SourceFile {
        SourceFile { name: name.to_string(), content: b"%PDF-1.4 fake".to_vec() }
    }

    fn folder_hit(id: &str) -> Value {
        json!({ "items": [{ "id": id }], "hasMore": false })
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let server = MockServer::start().await;

        let outcome = client_for(&server).upload_and_attach_files("31337", None, &[]).await;
        assert_eq!(outcome, AttachmentOutcome::default());
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn uploads_into_the_found_folder_and_attaches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUITEQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(folder_hit("777")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FILE_PATH))
            .and(body_string_contains("PO-2024-0042_receipt.pdf"))
            .and(body_string_contains("\"777\""))
            .respond_with(
                ResponseTemplate::new(204)
                    .insert_header("Location", "/services/rest/record/v1/file/9001"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/rest/record/v1/purchaseorder/31337/!transform/attach"))
            .and(body_string_contains("9001"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .upload_and_attach_files("31337", Some("PO-2024-0042"), &[file("receipt.pdf")])
            .await;

        assert_eq!(outcome.attached_count, 1);
        assert_eq!(outcome.failed_count, 0);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn file_names_fall_back_to_the_internal_id_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUITEQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(folder_hit("777")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FILE_PATH))
            .and(body_string_contains("31337_receipt.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "9001" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/rest/record/v1/purchaseorder/31337/!transform/attach"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let outcome =
            client_for(&server).upload_and_attach_files("31337", None, &[file("receipt.pdf")]).await;
        assert_eq!(outcome.attached_count, 1);
    }

    #[tokio::test]
    async fn missing_folder_is_created_even_after_a_failed_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUITEQL_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FOLDER_PATH))
            .and(body_string_contains(ATTACHMENTS_FOLDER_NAME))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "888" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FILE_PATH))
            .and(body_string_contains("\"888\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "9002" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/rest/record/v1/purchaseorder/31337/!transform/attach"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let outcome =
            client_for(&server).upload_and_attach_files("31337", None, &[file("lease.pdf")]).await;
        assert_eq!(outcome.attached_count, 1);
        assert_eq!(outcome.failed_count, 0);
    }

    #[tokio::test]
    async fn folder_creation_failure_fails_every_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUITEQL_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "items": [], "hasMore": false })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FOLDER_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("cannot create folder"))
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .upload_and_attach_files("31337", None, &[file("a.pdf"), file("b.pdf")])
            .await;

        assert_eq!(outcome.attached_count, 0);
        assert_eq!(outcome.failed_count, 2);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].starts_with("a.pdf:"));
        assert!(outcome.errors[1].starts_with("b.pdf:"));
    }

    #[tokio::test]
    async fn one_bad_file_does_not_stop_the_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUITEQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(folder_hit("777")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FILE_PATH))
            .and(body_string_contains("broken.pdf"))
            .respond_with(ResponseTemplate::new(500).set_body_string("file store unavailable"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FILE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "9003" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/rest/record/v1/purchaseorder/31337/!transform/attach"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .upload_and_attach_files(
                "31337",
                None,
                &[file("first.pdf"), file("broken.pdf"), file("last.pdf")],
            )
            .await;

        assert_eq!(outcome.attached_count, 2);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("broken.pdf"));
        assert!(outcome.errors[0].contains("HTTP 500"));
    }

    #[tokio::test]
    async fn folder_id_is_resolved_once_per_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SUITEQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(folder_hit("777")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(FILE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "9004" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/rest/record/v1/purchaseorder/31337/!transform/attach"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.upload_and_attach_files("31337", None, &[file("one.pdf")]).await;
        // Second batch must reuse the cached folder id
        let outcome = client.upload_and_attach_files("31337", None, &[file("two.pdf")]).await;
        assert_eq!(outcome.attached_count, 1);
    }
}

//! Google Drive upload boundary.
//!
//! Exports land in a folder named for the processed day (`YYYY-MM-DD`)
//! under a pre-provisioned parent folder. Talks to the Drive v3 REST
//! surface directly; authentication is a bearer token from the credential
//! blob. Use [`DriveClient::new`] for production or
//! [`DriveClient::with_base_url`] to point at a mock server in tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use oogoo_core::DriveCredentials;
use reqwest::{Client, Url};

use crate::error::DriveError;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

pub struct DriveClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl DriveClient {
    /// Creates a client pointed at the production Drive API.
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: &DriveCredentials, timeout_secs: u64) -> Result<Self, DriveError> {
        Self::with_base_url(credentials, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DriveError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        credentials: &DriveCredentials,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DriveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Normalise to exactly one trailing slash so joins extend the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DriveError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: credentials.access_token.clone(),
            base_url,
        })
    }

    /// Creates the dated run folder and uploads every file into it.
    ///
    /// # Errors
    ///
    /// Propagates the first [`DriveError`] from folder creation or any
    /// upload; files after a failed one are not attempted.
    pub async fn upload_run(
        &self,
        folder_name: &str,
        parent_id: &str,
        files: &[PathBuf],
    ) -> Result<(), DriveError> {
        let folder_id = self.create_folder(folder_name, parent_id).await?;
        for file in files {
            let id = self.upload_file(file, &folder_id).await?;
            tracing::info!(file = %file.display(), %id, folder = folder_name, "uploaded export");
        }
        Ok(())
    }

    /// Creates a Drive folder under `parent_id` and returns its id.
    ///
    /// # Errors
    ///
    /// - [`DriveError::Http`] — network failure.
    /// - [`DriveError::UnexpectedStatus`] — any non-2xx response.
    /// - [`DriveError::MissingId`] — a 2xx response without a file id.
    pub async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, DriveError> {
        let context = format!("creating folder {name:?}");
        let url = self.endpoint("drive/v3/files")?;
        let body = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id],
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        Self::require_success(response.status(), &context)?;
        let payload: serde_json::Value = response.json().await?;
        Self::file_id(&payload, &context)
    }

    /// Multipart-uploads the file at `path` into `folder_id` and returns
    /// the created file's id.
    ///
    /// # Errors
    ///
    /// - [`DriveError::ReadFile`] — the local file cannot be read.
    /// - [`DriveError::Http`] — network failure.
    /// - [`DriveError::UnexpectedStatus`] — any non-2xx response.
    /// - [`DriveError::MissingId`] — a 2xx response without a file id.
    pub async fn upload_file(&self, path: &Path, folder_id: &str) -> Result<String, DriveError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("export.csv")
            .to_owned();
        let context = format!("uploading {file_name:?}");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DriveError::ReadFile {
                path: path.display().to_string(),
                source: e,
            })?;

        let metadata = serde_json::json!({
            "name": file_name,
            "parents": [folder_id],
        })
        .to_string();
        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata).mime_str("application/json")?,
            )
            .part(
                "media",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str("text/csv")?,
            );

        let mut url = self.endpoint("upload/drive/v3/files")?;
        url.query_pairs_mut().append_pair("uploadType", "multipart");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await?;

        Self::require_success(response.status(), &context)?;
        let payload: serde_json::Value = response.json().await?;
        Self::file_id(&payload, &context)
    }

    fn endpoint(&self, path: &str) -> Result<Url, DriveError> {
        self.base_url
            .join(path)
            .map_err(|e| DriveError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn require_success(status: reqwest::StatusCode, context: &str) -> Result<(), DriveError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(DriveError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_owned(),
            })
        }
    }

    fn file_id(payload: &serde_json::Value, context: &str) -> Result<String, DriveError> {
        payload
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| DriveError::MissingId {
                context: context.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn credentials() -> DriveCredentials {
        DriveCredentials {
            access_token: "test-token".to_owned(),
            parent_folder_id: "parent-1".to_owned(),
        }
    }

    fn client(base_url: &str) -> DriveClient {
        DriveClient::with_base_url(&credentials(), 5, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = DriveClient::with_base_url(&credentials(), 5, "not a url");
        assert!(matches!(result, Err(DriveError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn create_folder_returns_new_folder_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "folder-123" })),
            )
            .mount(&server)
            .await;

        let id = client(&server.uri())
            .create_folder("2024-07-14", "parent-1")
            .await
            .unwrap();
        assert_eq!(id, "folder-123");
    }

    #[tokio::test]
    async fn create_folder_surfaces_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = client(&server.uri())
            .create_folder("2024-07-14", "parent-1")
            .await;
        assert!(
            matches!(result, Err(DriveError::UnexpectedStatus { status: 403, .. })),
            "expected UnexpectedStatus(403), got: {result:?}"
        );
    }

    #[tokio::test]
    async fn create_folder_without_id_in_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let result = client(&server.uri())
            .create_folder("2024-07-14", "parent-1")
            .await;
        assert!(matches!(result, Err(DriveError::MissingId { .. })));
    }

    #[tokio::test]
    async fn upload_file_posts_multipart_and_returns_file_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .and(query_param("uploadType", "multipart"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "file-9" })),
            )
            .mount(&server)
            .await;

        let file = std::env::temp_dir().join(format!("oogoo-drive-test-{}.csv", std::process::id()));
        std::fs::write(&file, "brand,price\nToyota,4500\n").unwrap();

        let id = client(&server.uri())
            .upload_file(&file, "folder-123")
            .await
            .unwrap();
        assert_eq!(id, "file-9");

        std::fs::remove_file(&file).ok();
    }

    #[tokio::test]
    async fn upload_file_missing_local_file_is_a_read_error() {
        let server = MockServer::start().await;
        let missing = std::env::temp_dir().join("oogoo-drive-test-definitely-missing.csv");
        let result = client(&server.uri())
            .upload_file(&missing, "folder-123")
            .await;
        assert!(matches!(result, Err(DriveError::ReadFile { .. })));
    }
}

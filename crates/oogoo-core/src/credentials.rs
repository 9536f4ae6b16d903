use serde::Deserialize;

/// Typed projection of the `OOGOO_GCLOUD_KEY_JSON` credential blob.
///
/// Only the fields the upload boundary actually consumes are modeled; the
/// blob may carry more and anything extra is ignored. The token is minted
/// and refreshed by whatever schedules the run; this process only presents
/// it as a bearer credential.
#[derive(Clone, Deserialize)]
pub struct DriveCredentials {
    /// OAuth2 bearer token for the Drive API.
    pub access_token: String,
    /// Drive folder that receives the dated per-run folders.
    pub parent_folder_id: String,
}

impl std::fmt::Debug for DriveCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveCredentials")
            .field("access_token", &"[redacted]")
            .field("parent_folder_id", &self.parent_folder_id)
            .finish()
    }
}

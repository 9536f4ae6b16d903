use std::path::PathBuf;

use crate::credentials::DriveCredentials;

#[derive(Clone)]
pub struct AppConfig {
    /// Upload credential parsed from `OOGOO_GCLOUD_KEY_JSON`.
    pub drive: DriveCredentials,
    pub log_level: String,
    /// Listing pages walked per category, starting at page 1.
    pub pages_per_category: u32,
    /// Size of the admission permit set gating concurrent page walks.
    pub max_concurrent_walks: usize,
    /// Attempts per listing page, including the first.
    pub max_retries: u32,
    /// Politeness delay between cards on one listing page.
    pub card_delay_ms: u64,
    /// Wait after scrolling a detail page, for lazy-loaded content.
    pub detail_settle_ms: u64,
    /// Bound on each card-container selector wait.
    pub selector_timeout_secs: u64,
    /// Bound on the description visible-wait.
    pub description_timeout_secs: u64,
    pub navigation_timeout_secs: u64,
    pub user_agent: String,
    /// Directory receiving the per-category spreadsheet files.
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("drive", &self.drive)
            .field("log_level", &self.log_level)
            .field("pages_per_category", &self.pages_per_category)
            .field("max_concurrent_walks", &self.max_concurrent_walks)
            .field("max_retries", &self.max_retries)
            .field("card_delay_ms", &self.card_delay_ms)
            .field("detail_settle_ms", &self.detail_settle_ms)
            .field("selector_timeout_secs", &self.selector_timeout_secs)
            .field("description_timeout_secs", &self.description_timeout_secs)
            .field("navigation_timeout_secs", &self.navigation_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

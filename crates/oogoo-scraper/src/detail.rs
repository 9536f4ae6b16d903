//! Detail-page resolution: loads a listing's detail page and assembles the
//! extended record fields.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Local;
use oogoo_core::listing::{Submitter, NO_DESCRIPTION};

use crate::driver::{DriverError, Page, Settle};
use crate::{extract, normalize};

/// The detail-page half of a listing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub submitter: Option<Submitter>,
    pub specification: BTreeMap<String, String>,
    pub description: String,
    pub phone_number: Option<String>,
    pub ad_id: Option<String>,
    pub relative_date: Option<String>,
    pub date_published: Option<String>,
}

impl DetailFields {
    /// The all-empty result used when the link is unusable or the page
    /// fails to load. Detail failure degrades a record, it never aborts
    /// the listing walk.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            submitter: None,
            specification: BTreeMap::new(),
            description: NO_DESCRIPTION.to_owned(),
            phone_number: None,
            ad_id: None,
            relative_date: None,
            date_published: None,
        }
    }
}

/// Resolves detail pages on a page handle owned by the calling walker.
pub struct DetailResolver {
    origin: String,
    /// Wait after scrolling, for lazy-loaded content below the fold.
    settle_delay: Duration,
    description_timeout: Duration,
}

impl DetailResolver {
    #[must_use]
    pub fn new(origin: &str, settle_delay: Duration, description_timeout: Duration) -> Self {
        Self {
            origin: origin.to_owned(),
            settle_delay,
            description_timeout,
        }
    }

    /// Loads `link` on `page` and runs every detail-scope extraction rule.
    ///
    /// Links that are absent or outside the site origin short-circuit to
    /// [`DetailFields::empty`] without any navigation. Navigation faults
    /// yield the same empty result after an error log.
    pub async fn resolve<P: Page>(&self, page: &P, link: Option<&str>) -> DetailFields {
        let Some(url) = link.filter(|l| l.starts_with(&self.origin)) else {
            tracing::warn!(?link, "skipping detail resolution for unusable link");
            return DetailFields::empty();
        };

        if let Err(e) = self.load(page, url).await {
            tracing::error!(url, error = %e, "detail page failed to load");
            return DetailFields::empty();
        }

        let submitter = extract::submitter(page).await;
        let specification = extract::specification(page).await;
        let description = extract::description(page, self.description_timeout).await;
        let contact = extract::contact_info(page).await;
        let relative_date = extract::relative_date(page).await;
        let date_published = Some(normalize::publish_timestamp(
            relative_date.as_deref(),
            Local::now().naive_local(),
        ));

        DetailFields {
            submitter,
            specification,
            description,
            phone_number: contact.mobile,
            ad_id: contact.ad_id,
            relative_date,
            date_published,
        }
    }

    async fn load<P: Page>(&self, page: &P, url: &str) -> Result<(), DriverError> {
        page.goto(url, Settle::DomContentLoaded).await?;
        page.scroll_to_bottom().await?;
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }
}

//! The listing-page walker: loads one paginated listing URL, locates its
//! cards, and produces one [`ListingRecord`] per card.
//!
//! The walk is a bounded retry loop over `Loading → CardsFound →
//! PerCardExtraction`. Each attempt runs on a fresh page handle against the
//! same browser; records accumulated before a fault are retained across
//! retries (append-only, no rollback). The walker always returns whatever it
//! gathered and never raises past this boundary.

use std::time::Duration;

use oogoo_core::listing::{ListingRecord, Title};
use oogoo_core::SITE_ORIGIN;

use crate::detail::{DetailFields, DetailResolver};
use crate::driver::{Browser, Page, Settle};
use crate::error::ScrapeError;
use crate::{extract, selectors};

/// Card-scope fields, read before the attempt's page navigates anywhere.
struct CardSummary {
    brand: Option<String>,
    price: Option<String>,
    link: Option<String>,
    title: Title,
}

pub struct ListingWalker<B: Browser> {
    browser: B,
    resolver: DetailResolver,
    /// Attempts per listing page, including the first.
    retries: u32,
    /// Politeness delay between cards; not correctness-bearing.
    card_delay: Duration,
    /// Bound on each card-container selector wait.
    selector_timeout: Duration,
}

impl<B: Browser> ListingWalker<B> {
    #[must_use]
    pub fn new(
        browser: B,
        resolver: DetailResolver,
        retries: u32,
        card_delay: Duration,
        selector_timeout: Duration,
    ) -> Self {
        Self {
            browser,
            resolver,
            retries: retries.max(1),
            card_delay,
            selector_timeout,
        }
    }

    /// Walks `listing_url` and returns the records gathered, in DOM card
    /// order. Exhausting the retry budget is logged, not raised; the caller
    /// receives whatever was accumulated.
    pub async fn walk(&self, listing_url: &str) -> Vec<ListingRecord> {
        let mut records = Vec::new();

        for attempt in 1..=self.retries {
            let page = match self.browser.open_page().await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(attempt, url = listing_url, error = %e, "page open failed");
                    self.note_if_exhausted(attempt, listing_url, records.len());
                    continue;
                }
            };

            let outcome = self.walk_attempt(&page, listing_url, &mut records).await;
            if let Err(e) = page.close().await {
                tracing::debug!(url = listing_url, error = %e, "page close failed");
            }

            match outcome {
                Ok(()) => break,
                Err(e) => {
                    tracing::error!(attempt, url = listing_url, error = %e, "listing attempt failed");
                    self.note_if_exhausted(attempt, listing_url, records.len());
                }
            }
        }

        records
    }

    fn note_if_exhausted(&self, attempt: u32, url: &str, gathered: usize) {
        if attempt == self.retries {
            tracing::warn!(
                url,
                retries = self.retries,
                gathered,
                "retry budget exhausted; returning partial records"
            );
        }
    }

    async fn walk_attempt<P: Page>(
        &self,
        page: &P,
        listing_url: &str,
        records: &mut Vec<ListingRecord>,
    ) -> Result<(), ScrapeError> {
        page.goto(listing_url, Settle::DomContentLoaded).await?;
        let (selector, cards) = self.find_cards(page, listing_url).await?;
        tracing::info!(
            url = listing_url,
            selector,
            count = cards.len(),
            "listing cards located"
        );

        // Card reads must finish for every card before the shared page is
        // navigated to a detail URL; navigation detaches the card nodes.
        let mut summaries = Vec::with_capacity(cards.len());
        for card in &cards {
            summaries.push(CardSummary {
                brand: extract::brand(card).await,
                price: extract::price(card).await,
                link: extract::link(card, SITE_ORIGIN).await,
                title: extract::title(card).await,
            });
        }

        for summary in summaries {
            let DetailFields {
                submitter,
                specification,
                description,
                phone_number,
                ad_id,
                relative_date,
                date_published,
            } = self.resolver.resolve(page, summary.link.as_deref()).await;

            records.push(ListingRecord {
                brand: summary.brand,
                price: summary.price,
                link: summary.link,
                title: summary.title,
                submitter,
                specification,
                description,
                phone_number,
                ad_id,
                relative_date,
                date_published,
            });

            if self.card_delay > Duration::ZERO {
                tokio::time::sleep(self.card_delay).await;
            }
        }

        Ok(())
    }

    /// Tries the card-container candidates in priority order; the first
    /// selector that appears and yields at least one card wins.
    async fn find_cards<P: Page>(
        &self,
        page: &P,
        listing_url: &str,
    ) -> Result<(&'static str, Vec<P::Element>), ScrapeError> {
        for &selector in selectors::CARD {
            if let Err(e) = page
                .wait_for_selector(selector, false, self.selector_timeout)
                .await
            {
                tracing::debug!(url = listing_url, selector, error = %e, "card container candidate absent");
                continue;
            }
            match page.query_all(selector).await {
                Ok(cards) if !cards.is_empty() => return Ok((selector, cards)),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(url = listing_url, selector, error = %e, "card query failed");
                }
            }
        }
        Err(ScrapeError::NoListingCards {
            url: listing_url.to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod tests;

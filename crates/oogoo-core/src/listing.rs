use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel used when a listing has no readable description. The export
/// layer expects a string in every row, so the field is never `None`.
pub const NO_DESCRIPTION: &str = "No Description Found";

/// One scraped vehicle listing: basic fields read from the listing card,
/// extended with detail-page fields by the resolver. Constructed once per
/// card by the walker and immutable from then on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub brand: Option<String>,
    /// Price exactly as displayed; no currency parsing.
    pub price: Option<String>,
    /// Absolute URL of the detail page, when the card link resolved.
    pub link: Option<String>,
    pub title: Title,
    pub submitter: Option<Submitter>,
    /// Specification label → value pairs. Keys are unique per record; a
    /// repeated label keeps the last value seen.
    pub specification: BTreeMap<String, String>,
    /// Free-text description, or [`NO_DESCRIPTION`] when absent.
    pub description: String,
    pub phone_number: Option<String>,
    pub ad_id: Option<String>,
    /// The site's own relative-time phrase, verbatim.
    pub relative_date: Option<String>,
    /// Absolute publish timestamp (`YYYY-MM-DD HH:MM:SS`, naive local time)
    /// derived from `relative_date`.
    pub date_published: Option<String>,
}

impl ListingRecord {
    /// Returns `true` when the record was published on `day` (`YYYY-MM-DD`).
    ///
    /// Compares only the date component of `date_published`; records without
    /// a derived timestamp never match.
    #[must_use]
    pub fn published_on(&self, day: &str) -> bool {
        self.date_published
            .as_deref()
            .and_then(|stamp| stamp.split_whitespace().next())
            .is_some_and(|date| date == day)
    }
}

/// Model and mileage as shown in a card's title block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub model: Option<String>,
    pub distance: Option<String>,
}

/// Who posted the ad, with the posting block's own relative-time text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    /// Serialized as `submitter` to keep the historical column shape.
    #[serde(rename = "submitter")]
    pub name: Option<String>,
    pub relative_date: Option<String>,
}

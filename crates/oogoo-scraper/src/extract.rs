//! Field extraction rules.
//!
//! One rule per record field, each independently fault-isolated: a missing
//! element is the expected case and yields an empty result at debug level,
//! while an unexpected driver fault is logged at error level and mapped to
//! the same empty result. No rule can prevent another rule from running on
//! the same scope.

use std::collections::BTreeMap;
use std::time::Duration;

use oogoo_core::listing::{Submitter, Title, NO_DESCRIPTION};

use crate::driver::{Element, Page, Scope};
use crate::selectors;

/// Fallback when a title block exists but its model sub-element does not.
const MODEL_NOT_FOUND: &str = "Model not found";
/// Fallback when a title block exists but its mileage sub-element does not.
const DISTANCE_NOT_FOUND: &str = "Distance not found";

/// First element matching any candidate selector, tried in declared order.
pub(crate) async fn first_match<S: Scope>(
    scope: &S,
    candidates: &[&str],
    field: &'static str,
) -> Option<S::Element> {
    for &selector in candidates {
        match scope.query(selector).await {
            Ok(Some(element)) => return Some(element),
            Ok(None) => {}
            Err(e) => tracing::error!(field, selector, error = %e, "element query failed"),
        }
    }
    tracing::debug!(field, "no selector candidate matched");
    None
}

/// All elements under the first candidate selector that matches anything.
pub(crate) async fn all_matches<S: Scope>(
    scope: &S,
    candidates: &[&str],
    field: &'static str,
) -> Vec<S::Element> {
    for &selector in candidates {
        match scope.query_all(selector).await {
            Ok(elements) if !elements.is_empty() => return elements,
            Ok(_) => {}
            Err(e) => tracing::error!(field, selector, error = %e, "element query failed"),
        }
    }
    tracing::debug!(field, "no selector candidate matched");
    Vec::new()
}

async fn read_text<E: Element>(element: &E, field: &'static str) -> Option<String> {
    match element.inner_text().await {
        Ok(text) => text.map(|t| t.trim().to_owned()),
        Err(e) => {
            tracing::error!(field, error = %e, "text read failed");
            None
        }
    }
}

async fn text_of_first<S: Scope>(
    scope: &S,
    candidates: &[&str],
    field: &'static str,
) -> Option<String> {
    let element = first_match(scope, candidates, field).await?;
    read_text(&element, field).await
}

pub async fn brand<S: Scope>(card: &S) -> Option<String> {
    text_of_first(card, selectors::BRAND, "brand").await
}

pub async fn price<S: Scope>(card: &S) -> Option<String> {
    text_of_first(card, selectors::PRICE, "price").await
}

/// Detail-page link from the card's anchor, made absolute against `origin`.
pub async fn link<S: Scope>(card: &S, origin: &str) -> Option<String> {
    let anchor = first_match(card, selectors::CARD_LINK, "link").await?;
    match anchor.attribute("href").await {
        Ok(Some(href)) => Some(absolute_url(origin, &href)),
        Ok(None) => None,
        Err(e) => {
            tracing::error!(error = %e, "href read failed");
            None
        }
    }
}

fn absolute_url(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_owned()
    } else {
        format!("{origin}{href}")
    }
}

/// Model and mileage from the card's title block.
///
/// A missing block yields an all-`None` title; a present block with a missing
/// sub-element yields the literal not-found fallback for that sub-element.
/// The two outcomes are deliberately distinguishable downstream.
pub async fn title<S: Scope>(card: &S) -> Title {
    let Some(container) = first_match(card, selectors::TITLE, "title").await else {
        return Title::default();
    };
    let model = text_of_first(&container, selectors::TITLE_MODEL, "title.model")
        .await
        .unwrap_or_else(|| MODEL_NOT_FOUND.to_owned());
    let distance = text_of_first(&container, selectors::TITLE_DISTANCE, "title.distance")
        .await
        .unwrap_or_else(|| DISTANCE_NOT_FOUND.to_owned());
    Title {
        model: Some(model),
        distance: Some(distance),
    }
}

pub async fn submitter<S: Scope>(page: &S) -> Option<Submitter> {
    let container = first_match(page, selectors::SUBMITTER, "submitter").await?;
    let name = text_of_first(&container, selectors::SUBMITTER_NAME, "submitter.name").await;
    let relative_date = text_of_first(
        &container,
        selectors::SUBMITTER_DATE,
        "submitter.relative_date",
    )
    .await;
    Some(Submitter {
        name,
        relative_date,
    })
}

/// Specification label → value map. Pairs missing either side are skipped
/// silently; a repeated label keeps the last value.
pub async fn specification<S: Scope>(page: &S) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for item in all_matches(page, selectors::SPECIFICATION_ITEMS, "specification").await {
        let Some(label_element) =
            first_match(&item, selectors::SPECIFICATION_LABEL, "specification.label").await
        else {
            continue;
        };
        let Some(value_element) =
            first_match(&item, selectors::SPECIFICATION_VALUE, "specification.value").await
        else {
            continue;
        };
        let (Some(label), Some(value)) = (
            read_text(&label_element, "specification.label").await,
            read_text(&value_element, "specification.value").await,
        ) else {
            continue;
        };
        map.insert(label, value);
    }
    map
}

/// Description text, after a bounded wait for the asynchronously rendered
/// description region to become visible. Timeout or absence yields the
/// [`NO_DESCRIPTION`] sentinel so tabular export always has a value.
pub async fn description<P: Page>(page: &P, timeout: Duration) -> String {
    let combined = selectors::DESCRIPTION.join(", ");
    if let Err(e) = page.wait_for_selector(&combined, true, timeout).await {
        tracing::debug!(error = %e, "description region never became visible");
        return NO_DESCRIPTION.to_owned();
    }
    text_of_first(page, selectors::DESCRIPTION, "description")
        .await
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_owned())
}

/// Phone number and ad id projected from the contact-action element's
/// JSON-encoded attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub mobile: Option<String>,
    pub ad_id: Option<String>,
}

pub async fn contact_info<S: Scope>(page: &S) -> ContactInfo {
    let Some(action) = first_match(page, selectors::CONTACT_ACTION, "contact").await else {
        return ContactInfo::default();
    };
    match action.attribute(selectors::CONTACT_PROPERTIES_ATTR).await {
        Ok(Some(raw)) => parse_contact_properties(&raw),
        Ok(None) => {
            tracing::debug!("contact element carries no properties attribute");
            ContactInfo::default()
        }
        Err(e) => {
            tracing::error!(error = %e, "contact properties read failed");
            ContactInfo::default()
        }
    }
}

/// Projects the untyped contact-properties payload into [`ContactInfo`].
///
/// The payload is site-controlled and loosely typed; missing keys and
/// malformed JSON both collapse to the empty projection so the boundary
/// stays contained in this one function.
#[must_use]
pub fn parse_contact_properties(raw: &str) -> ContactInfo {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => ContactInfo {
            mobile: string_field(&value, "mobile"),
            ad_id: string_field(&value, "AdId"),
        },
        Err(e) => {
            tracing::error!(error = %e, "contact properties attribute is not valid JSON");
            ContactInfo::default()
        }
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    match value.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The site's relative-time phrase, from the first matching markup variant.
pub async fn relative_date<S: Scope>(page: &S) -> Option<String> {
    text_of_first(page, selectors::RELATIVE_DATE, "relative_date").await
}

//! Selector candidate chains for the marketplace's markup.
//!
//! The site has shipped several markup variants across its sections; each
//! chain lists the variants in priority order and the first selector that
//! yields a structural match wins. Chains are plain slices so extraction
//! rules can iterate them with an early return.

/// Listing-card containers on a paginated listing page.
pub const CARD: &[&str] = &[
    ".list-item-car",
    ".car-item",
    ".car-listing",
    ".vehicle-item",
    "div[class*=\"car\"]",
    "[data-car-id]",
];

/// Brand text inside a card.
pub const BRAND: &[&str] = &[".brand-car span", ".car-brand", "[data-brand]"];

/// Displayed price inside a card.
pub const PRICE: &[&str] = &[".price span", ".car-price", "[data-price]"];

/// Detail-page anchor inside a card.
pub const CARD_LINK: &[&str] = &["a"];

/// Title block inside a card; model and mileage live in its sub-elements.
pub const TITLE: &[&str] = &[".title-car", ".car-title"];
pub const TITLE_MODEL: &[&str] = &["span:nth-child(1)", ".model"];
pub const TITLE_DISTANCE: &[&str] = &["span:nth-child(2)", ".distance"];

/// Posting block on a detail page (submitter label + relative-time text).
pub const SUBMITTER: &[&str] = &[".car-ad-posted figcaption"];
pub const SUBMITTER_NAME: &[&str] = &["label"];
pub const SUBMITTER_DATE: &[&str] = &["p"];

/// Specification list items on a detail page; each holds a label/value pair.
pub const SPECIFICATION_ITEMS: &[&str] = &[".specification ul li"];
pub const SPECIFICATION_LABEL: &[&str] = &["h3"];
pub const SPECIFICATION_VALUE: &[&str] = &["p"];

/// Description region on a detail page. Rendered asynchronously, so reads
/// go through a bounded visible-wait first.
pub const DESCRIPTION: &[&str] = &["#description-section", ".description", "[data-description]"];

/// Contact-action element carrying the JSON-encoded `mpt-properties`
/// attribute that both the phone number and the ad id are projected from.
pub const CONTACT_ACTION: &[&str] = &[".detail-contact-info .whatsapp"];

/// Attribute name of the embedded contact-properties payload.
pub const CONTACT_PROPERTIES_ATTR: &str = "mpt-properties";

/// Relative-time text on a detail page.
pub const RELATIVE_DATE: &[&str] = &[
    ".car-ad-posted figcaption p",
    ".car-ad-posted p",
    ".ad-date",
    "[data-posted-date]",
    ".posted-date",
];

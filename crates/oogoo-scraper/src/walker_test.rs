use super::*;
use crate::driver::mock::{MockBrowser, MockElement, MockPage};
use oogoo_core::listing::NO_DESCRIPTION;

const LISTING_URL: &str = "https://oogoocar.com/ar/explore/used/all/all/all/all/list/0/basic?page=1";

fn resolver() -> DetailResolver {
    DetailResolver::new(SITE_ORIGIN, Duration::ZERO, Duration::from_millis(10))
}

fn walker(browser: MockBrowser, retries: u32) -> ListingWalker<MockBrowser> {
    ListingWalker::new(
        browser,
        resolver(),
        retries,
        Duration::ZERO,
        Duration::from_millis(10),
    )
}

/// A card with just a brand, no link: detail resolution short-circuits.
fn card(brand: &str) -> MockElement {
    MockElement::new().child(".brand-car span", MockElement::with_text(brand))
}

fn listing_page(cards: Vec<MockElement>) -> MockPage {
    MockPage::new().route(
        LISTING_URL,
        MockElement::new().children(".list-item-car", cards),
    )
}

fn brands(records: &[oogoo_core::ListingRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.brand.as_deref().unwrap_or(""))
        .collect()
}

#[tokio::test]
async fn successful_first_attempt_opens_one_page() {
    let browser = MockBrowser::new(vec![listing_page(vec![card("Toyota")])]);
    let walker = walker(browser, 3);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(brands(&records), ["Toyota"]);
    assert_eq!(walker.browser.opens(), 1);
}

#[tokio::test]
async fn two_failures_then_success_uses_exactly_three_page_opens() {
    let browser = MockBrowser::new(vec![
        MockPage::failing(),
        MockPage::failing(),
        listing_page(vec![card("Toyota"), card("Nissan"), card("Honda")]),
    ]);
    let walker = walker(browser, 3);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(brands(&records), ["Toyota", "Nissan", "Honda"]);
    assert_eq!(walker.browser.opens(), 3);
}

#[tokio::test]
async fn exhausted_retries_return_empty_without_raising() {
    let browser = MockBrowser::new(vec![
        MockPage::failing(),
        MockPage::failing(),
        MockPage::failing(),
    ]);
    let walker = walker(browser, 3);
    let records = walker.walk(LISTING_URL).await;
    assert!(records.is_empty());
    assert_eq!(walker.browser.opens(), 3);
}

#[tokio::test]
async fn page_without_cards_counts_as_failed_attempt() {
    let empty_listing = MockPage::new().route(LISTING_URL, MockElement::new());
    let browser = MockBrowser::new(vec![empty_listing, listing_page(vec![card("Kia")])]);
    let walker = walker(browser, 3);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(brands(&records), ["Kia"]);
    assert_eq!(walker.browser.opens(), 2);
}

#[tokio::test]
async fn records_preserve_dom_card_order() {
    let browser = MockBrowser::new(vec![listing_page(vec![
        card("Alfa Romeo"),
        card("BMW"),
        card("Chevrolet"),
    ])]);
    let walker = walker(browser, 1);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(brands(&records), ["Alfa Romeo", "BMW", "Chevrolet"]);
}

#[tokio::test]
async fn card_container_fallback_selector_is_used() {
    // No `.list-item-car` anywhere; cards sit under the `.car-item` variant.
    let page = MockPage::new().route(
        LISTING_URL,
        MockElement::new().children(".car-item", vec![card("Lexus")]),
    );
    let browser = MockBrowser::new(vec![page]);
    let walker = walker(browser, 1);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(brands(&records), ["Lexus"]);
}

#[tokio::test]
async fn linkless_card_degrades_to_empty_detail_fields() {
    let browser = MockBrowser::new(vec![listing_page(vec![card("Toyota")])]);
    let walker = walker(browser, 1);
    let records = walker.walk(LISTING_URL).await;
    let record = &records[0];
    assert!(record.link.is_none());
    assert!(record.submitter.is_none());
    assert!(record.specification.is_empty());
    assert_eq!(record.description, NO_DESCRIPTION);
    assert!(record.date_published.is_none());
}

#[tokio::test]
async fn card_and_detail_fields_merge_into_one_record() {
    let detail_url = "https://oogoocar.com/ar/ad/42";
    let full_card = MockElement::new()
        .child(".brand-car span", MockElement::with_text("Toyota"))
        .child(".price span", MockElement::with_text("4,500 KWD"))
        .child("a", MockElement::new().attr("href", "/ar/ad/42"))
        .child(
            ".title-car",
            MockElement::new()
                .child("span:nth-child(1)", MockElement::with_text("Camry 2021"))
                .child("span:nth-child(2)", MockElement::with_text("85,000 km")),
        );
    let detail_dom = MockElement::new()
        .child(
            ".car-ad-posted figcaption p",
            MockElement::with_text("نُشر منذ يومين"),
        )
        .child(
            ".detail-contact-info .whatsapp",
            MockElement::new().attr(
                "mpt-properties",
                r#"{"mobile": "+96550001122", "AdId": "88421"}"#,
            ),
        );
    let page = MockPage::new()
        .route(
            LISTING_URL,
            MockElement::new().children(".list-item-car", vec![full_card]),
        )
        .route(detail_url, detail_dom);

    let walker = walker(MockBrowser::new(vec![page]), 1);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.brand.as_deref(), Some("Toyota"));
    assert_eq!(record.price.as_deref(), Some("4,500 KWD"));
    assert_eq!(record.link.as_deref(), Some(detail_url));
    assert_eq!(record.title.model.as_deref(), Some("Camry 2021"));
    assert_eq!(record.title.distance.as_deref(), Some("85,000 km"));
    assert_eq!(record.phone_number.as_deref(), Some("+96550001122"));
    assert_eq!(record.ad_id.as_deref(), Some("88421"));
    assert_eq!(record.relative_date.as_deref(), Some("نُشر منذ يومين"));
    assert!(record.date_published.is_some());
}

#[tokio::test]
async fn retries_clamp_to_at_least_one_attempt() {
    let browser = MockBrowser::new(vec![listing_page(vec![card("Toyota")])]);
    let walker = walker(browser, 0);
    let records = walker.walk(LISTING_URL).await;
    assert_eq!(records.len(), 1);
    assert_eq!(walker.browser.opens(), 1);
}

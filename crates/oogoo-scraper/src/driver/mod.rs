//! Capability interface over the headless browser.
//!
//! The walker, resolver, and extraction rules are written against these
//! traits rather than a concrete browser so their semantics can be exercised
//! with a scripted in-memory driver. [`chrome`] provides the production
//! implementation over the Chrome DevTools Protocol.

pub mod chrome;
#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use thiserror::Error;

/// Condition a navigation waits for before the page is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    DomContentLoaded,
    /// DOM loaded plus a grace period for in-flight requests.
    NetworkIdle,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {timeout:?} waiting for selector {selector:?}")]
    WaitTimeout { selector: String, timeout: Duration },

    #[error("browser command failed: {0}")]
    Command(String),
}

/// An open browsing session that can hand out page handles.
///
/// The walker opens one page per retry attempt; counting these opens is how
/// the retry budget is observed from outside.
#[allow(async_fn_in_trait)]
pub trait Browser {
    type Page: Page;

    async fn open_page(&self) -> Result<Self::Page, DriverError>;
}

impl<B: Browser> Browser for &B {
    type Page = B::Page;

    async fn open_page(&self) -> Result<Self::Page, DriverError> {
        (**self).open_page().await
    }
}

/// Anything elements can be queried under: a whole page or another element.
#[allow(async_fn_in_trait)]
pub trait Scope {
    type Element: Element;

    /// First element matching `selector`, or `None` when nothing matches.
    async fn query(&self, selector: &str) -> Result<Option<Self::Element>, DriverError>;

    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;
}

/// A DOM element handle.
#[allow(async_fn_in_trait)]
pub trait Element: Scope<Element = Self> + Sized {
    async fn inner_text(&self) -> Result<Option<String>, DriverError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;
}

/// A page handle within a browsing session.
#[allow(async_fn_in_trait)]
pub trait Page: Scope {
    async fn goto(&self, url: &str, settle: Settle) -> Result<(), DriverError>;

    /// Waits until `selector` matches (and, when `visible`, is rendered),
    /// bounded by `timeout`.
    async fn wait_for_selector(
        &self,
        selector: &str,
        visible: bool,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Scrolls to the bottom of the document to trigger lazy-loaded content.
    async fn scroll_to_bottom(&self) -> Result<(), DriverError>;

    async fn close(self) -> Result<(), DriverError>;
}

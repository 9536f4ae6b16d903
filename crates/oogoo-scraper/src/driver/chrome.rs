//! Chrome DevTools Protocol implementation of the driver traits.

use std::time::Duration;

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::{Element as CdpElement, Page as CdpPage};
use futures::StreamExt;

use super::{Browser, DriverError, Element, Page, Scope, Settle};

/// How often selector waits re-check the DOM.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Bound on the post-`goto` navigation wait.
const NAVIGATION_SETTLE: Duration = Duration::from_secs(10);

/// Grace period appended for [`Settle::NetworkIdle`] navigations.
const NETWORK_IDLE_GRACE: Duration = Duration::from_millis(2000);

/// A headless Chromium process owned by one walker, launched fresh per walk
/// and closed when the walk finishes.
pub struct HeadlessChrome {
    browser: CdpBrowser,
    handler_task: tokio::task::JoinHandle<()>,
}

impl HeadlessChrome {
    /// Launches a hardened headless Chromium and starts its CDP event loop.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Launch`] if the browser configuration is
    /// invalid or the process fails to start.
    pub async fn launch(user_agent: &str, request_timeout: Duration) -> Result<Self, DriverError> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={user_agent}"))
            .request_timeout(request_timeout)
            .build()
            .map_err(DriverError::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Closes the browser process and stops the CDP event loop.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close reported an error");
        }
        self.handler_task.abort();
    }
}

impl Browser for HeadlessChrome {
    type Page = ChromePage;

    async fn open_page(&self) -> Result<Self::Page, DriverError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Command(format!("failed to open page: {e}")))?;
        Ok(ChromePage { page })
    }
}

pub struct ChromePage {
    page: CdpPage,
}

impl Scope for ChromePage {
    type Element = ChromeElement;

    async fn query(&self, selector: &str) -> Result<Option<Self::Element>, DriverError> {
        // CDP reports a missing node as an error; fold that into not-found.
        match self.page.find_element(selector).await {
            Ok(element) => Ok(Some(ChromeElement { element })),
            Err(e) => {
                tracing::debug!(selector, error = %e, "page query matched nothing");
                Ok(None)
            }
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(elements
                .into_iter()
                .map(|element| ChromeElement { element })
                .collect()),
            Err(e) => {
                tracing::debug!(selector, error = %e, "page query-all matched nothing");
                Ok(Vec::new())
            }
        }
    }
}

impl Page for ChromePage {
    async fn goto(&self, url: &str, settle: Settle) -> Result<(), DriverError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        // Best-effort settle: a slow frame should degrade the page, not
        // wedge the walk.
        let _ = tokio::time::timeout(NAVIGATION_SETTLE, self.page.wait_for_navigation()).await;
        if settle == Settle::NetworkIdle {
            tokio::time::sleep(NETWORK_IDLE_GRACE).await;
        }
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        visible: bool,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let literal =
            serde_json::to_string(selector).map_err(|e| DriverError::Command(e.to_string()))?;
        let expression = if visible {
            format!(
                "(() => {{ const el = document.querySelector({literal}); \
                 return el !== null && el.offsetParent !== null; }})()"
            )
        } else {
            format!("document.querySelector({literal}) !== null")
        };

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let found = self
                .page
                .evaluate(expression.clone())
                .await
                .ok()
                .and_then(|result| result.value().and_then(serde_json::Value::as_bool))
                .unwrap_or(false);
            if found {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(DriverError::WaitTimeout {
                    selector: selector.to_owned(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn scroll_to_bottom(&self) -> Result<(), DriverError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| DriverError::Command(format!("scroll failed: {e}")))?;
        Ok(())
    }

    async fn close(self) -> Result<(), DriverError> {
        self.page
            .close()
            .await
            .map_err(|e| DriverError::Command(format!("page close failed: {e}")))
    }
}

pub struct ChromeElement {
    element: CdpElement,
}

impl Scope for ChromeElement {
    type Element = ChromeElement;

    async fn query(&self, selector: &str) -> Result<Option<Self::Element>, DriverError> {
        match self.element.find_element(selector).await {
            Ok(element) => Ok(Some(ChromeElement { element })),
            Err(e) => {
                tracing::debug!(selector, error = %e, "element query matched nothing");
                Ok(None)
            }
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError> {
        match self.element.find_elements(selector).await {
            Ok(elements) => Ok(elements
                .into_iter()
                .map(|element| ChromeElement { element })
                .collect()),
            Err(e) => {
                tracing::debug!(selector, error = %e, "element query-all matched nothing");
                Ok(Vec::new())
            }
        }
    }
}

impl Element for ChromeElement {
    async fn inner_text(&self) -> Result<Option<String>, DriverError> {
        self.element
            .inner_text()
            .await
            .map_err(|e| DriverError::Command(format!("inner_text failed: {e}")))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.element
            .attribute(name)
            .await
            .map_err(|e| DriverError::Command(format!("attribute {name:?} read failed: {e}")))
    }
}

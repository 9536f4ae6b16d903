//! Scripted in-memory driver for exercising extractor, resolver, and walker
//! semantics without a browser.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Browser, DriverError, Element, Page, Scope, Settle};

/// A DOM node: optional text, attributes, and children keyed by the exact
/// selector string a rule will ask for.
#[derive(Clone, Default)]
pub(crate) struct MockElement {
    text: Option<String>,
    text_fault: bool,
    attrs: HashMap<String, String>,
    children: HashMap<String, Vec<MockElement>>,
}

impl MockElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            ..Self::default()
        }
    }

    /// A node whose text read fails, for extraction-fault isolation tests.
    pub fn faulty_text() -> Self {
        Self {
            text_fault: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn child(mut self, selector: &str, child: MockElement) -> Self {
        self.children
            .entry(selector.to_owned())
            .or_default()
            .push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, selector: &str, nodes: Vec<MockElement>) -> Self {
        self.children
            .entry(selector.to_owned())
            .or_default()
            .extend(nodes);
        self
    }

    fn lookup(&self, selector: &str) -> Vec<MockElement> {
        self.children.get(selector).cloned().unwrap_or_default()
    }
}

impl Scope for MockElement {
    type Element = MockElement;

    async fn query(&self, selector: &str) -> Result<Option<Self::Element>, DriverError> {
        Ok(self.lookup(selector).into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError> {
        Ok(self.lookup(selector))
    }
}

impl Element for MockElement {
    async fn inner_text(&self) -> Result<Option<String>, DriverError> {
        if self.text_fault {
            return Err(DriverError::Command("node detached".to_owned()));
        }
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.attrs.get(name).cloned())
    }
}

/// One scripted page: navigation swaps the current root to the tree
/// registered for the target URL (or an empty tree for unknown URLs).
pub(crate) struct MockPage {
    fail_goto: bool,
    root: Mutex<MockElement>,
    routes: HashMap<String, MockElement>,
    visited: Arc<Mutex<Vec<String>>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self {
            fail_goto: false,
            root: Mutex::new(MockElement::default()),
            routes: HashMap::new(),
            visited: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A page whose every navigation fails, for retry tests.
    pub fn failing() -> Self {
        Self {
            fail_goto: true,
            ..Self::new()
        }
    }

    /// A page already showing `root`, without any navigation.
    pub fn with_root(root: MockElement) -> Self {
        Self {
            root: Mutex::new(root),
            ..Self::new()
        }
    }

    /// Registers the DOM served when the page navigates to `url`.
    #[must_use]
    pub fn route(mut self, url: &str, root: MockElement) -> Self {
        self.routes.insert(url.to_owned(), root);
        self
    }

    /// Handle for asserting navigations after the page has been consumed.
    pub fn visited_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.visited)
    }

    fn current(&self) -> MockElement {
        self.root.lock().expect("mock root lock").clone()
    }
}

impl Scope for MockPage {
    type Element = MockElement;

    async fn query(&self, selector: &str) -> Result<Option<Self::Element>, DriverError> {
        Ok(self.current().lookup(selector).into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError> {
        Ok(self.current().lookup(selector))
    }
}

impl Page for MockPage {
    async fn goto(&self, url: &str, _settle: Settle) -> Result<(), DriverError> {
        self.visited
            .lock()
            .expect("mock visited lock")
            .push(url.to_owned());
        if self.fail_goto {
            return Err(DriverError::Navigation {
                url: url.to_owned(),
                reason: "connection reset".to_owned(),
            });
        }
        let next = self.routes.get(url).cloned().unwrap_or_default();
        *self.root.lock().expect("mock root lock") = next;
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _visible: bool,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let root = self.current();
        let found = selector
            .split(',')
            .map(str::trim)
            .any(|part| !root.lookup(part).is_empty());
        if found {
            Ok(())
        } else {
            Err(DriverError::WaitTimeout {
                selector: selector.to_owned(),
                timeout,
            })
        }
    }

    async fn scroll_to_bottom(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn close(self) -> Result<(), DriverError> {
        Ok(())
    }
}

/// A browser that hands out pre-scripted pages in order and counts opens.
pub(crate) struct MockBrowser {
    pages: Mutex<VecDeque<MockPage>>,
    opens: AtomicU32,
}

impl MockBrowser {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            opens: AtomicU32::new(0),
        }
    }

    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }
}

impl Browser for MockBrowser {
    type Page = MockPage;

    async fn open_page(&self) -> Result<Self::Page, DriverError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .expect("mock pages lock")
            .pop_front()
            .ok_or_else(|| DriverError::Command("mock page script exhausted".to_owned()))
    }
}

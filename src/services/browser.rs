//! Browser automation capability.
//!
//! The scraper and the submitter only talk to a browser through these traits.
//! Production code uses the WebDriver backend in [`crate::services::webdriver`];
//! tests plug in a scripted fake.

use async_trait::async_trait;
use std::fmt;

/// How to find an element on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Elements carrying the given CSS class.
    ClassName(String),
    /// Elements with the given tag name.
    TagName(String),
    /// Form controls with the given `name` attribute.
    Name(String),
    XPath(String),
}

impl Locator {
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::ClassName(class.into())
    }

    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::TagName(tag.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassName(c) => write!(f, "class={c}"),
            Self::TagName(t) => write!(f, "tag={t}"),
            Self::Name(n) => write!(f, "name={n}"),
            Self::XPath(x) => write!(f, "xpath={x}"),
        }
    }
}

/// Opaque reference to an element found in the current session.
///
/// Handles are only meaningful to the session that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One exclusively-owned browser session.
///
/// `within` scopes a lookup to the descendants of an element; `None` searches
/// the whole page.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn find_element(
        &mut self,
        within: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<ElementHandle, BrowserError>;

    async fn find_elements(
        &mut self,
        within: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError>;

    async fn text(&mut self, element: ElementHandle) -> Result<String, BrowserError>;

    /// Read a DOM property (e.g. the resolved `href` of a link).
    async fn property(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    async fn send_keys(&mut self, element: ElementHandle, keys: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, element: ElementHandle) -> Result<(), BrowserError>;

    /// End the session and release the browser.
    async fn quit(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Close a session, logging rather than returning a failed teardown.
pub async fn release(session: Box<dyn BrowserSession>) {
    if let Err(e) = session.quit().await {
        tracing::warn!(error = %e, "Failed to close browser session");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Element not found: {0}")]
    NoSuchElement(String),

    #[error("Could not start browser session: {0}")]
    Session(String),

    #[error("Browser command failed: {0}")]
    Command(String),

    #[error("Stale element handle: {0:?}")]
    StaleHandle(ElementHandle),
}

impl BrowserError {
    /// Whether the failure is a missing element rather than a broken driver.
    pub fn is_missing_element(&self) -> bool {
        matches!(self, Self::NoSuchElement(_))
    }
}

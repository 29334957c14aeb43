use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;

use crate::services::browser::{
    BrowserError, BrowserLauncher, BrowserSession, ElementHandle, Locator,
};

/// Launches sessions against a local WebDriver server (chromedriver,
/// geckodriver or a Selenium standalone).
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: impl Into<String>, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
        }
    }
}

fn headless_capabilities() -> serde_json::Map<String, serde_json::Value> {
    let caps = json!({
        "goog:chromeOptions": { "args": ["--headless=new", "--window-size=1280,1024"] },
        "moz:firefoxOptions": { "args": ["-headless"] },
    });
    match caps {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut builder = ClientBuilder::native();
        if self.headless {
            builder.capabilities(headless_capabilities());
        }

        let client = builder
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| BrowserError::Session(e.to_string()))?;

        tracing::debug!(webdriver_url = %self.webdriver_url, "Browser session started");

        Ok(Box::new(WebDriverSession {
            client,
            elements: Vec::new(),
        }))
    }
}

/// WebDriver only understands CSS selectors and XPath (plus link text), so
/// every [`Locator`] is rewritten into one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    Css(String),
    XPath(String),
}

impl Query {
    fn as_locator(&self) -> fantoccini::Locator<'_> {
        match self {
            Self::Css(css) => fantoccini::Locator::Css(css),
            Self::XPath(xpath) => fantoccini::Locator::XPath(xpath),
        }
    }
}

impl From<&Locator> for Query {
    fn from(locator: &Locator) -> Self {
        match locator {
            Locator::ClassName(class) => Self::Css(format!(".{}", escape_css_ident(class))),
            Locator::TagName(tag) => Self::Css(tag.clone()),
            Locator::Name(name) => Self::Css(format!("[name=\"{}\"]", escape_css_string(name))),
            Locator::XPath(xpath) => Self::XPath(xpath.clone()),
        }
    }
}

fn escape_css_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for c in ident.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn command_error(error: CmdError, locator: Option<&Locator>) -> BrowserError {
    match locator {
        Some(locator) if error.is_no_such_element() => BrowserError::NoSuchElement(locator.to_string()),
        _ => BrowserError::Command(error.to_string()),
    }
}

struct WebDriverSession {
    client: Client,
    // Elements found so far; an ElementHandle indexes into this list.
    elements: Vec<Element>,
}

impl WebDriverSession {
    fn element(&self, handle: ElementHandle) -> Result<&Element, BrowserError> {
        self.elements
            .get(handle.0)
            .ok_or(BrowserError::StaleHandle(handle))
    }

    fn register(&mut self, element: Element) -> ElementHandle {
        self.elements.push(element);
        ElementHandle(self.elements.len() - 1)
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| command_error(e, None))
    }

    async fn find_element(
        &mut self,
        within: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<ElementHandle, BrowserError> {
        let query = Query::from(locator);
        let found = match within {
            Some(parent) => self.element(parent)?.find(query.as_locator()).await,
            None => self.client.find(query.as_locator()).await,
        }
        .map_err(|e| command_error(e, Some(locator)))?;

        Ok(self.register(found))
    }

    async fn find_elements(
        &mut self,
        within: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let query = Query::from(locator);
        let found = match within {
            Some(parent) => self.element(parent)?.find_all(query.as_locator()).await,
            None => self.client.find_all(query.as_locator()).await,
        }
        .map_err(|e| command_error(e, Some(locator)))?;

        Ok(found.into_iter().map(|e| self.register(e)).collect())
    }

    async fn text(&mut self, element: ElementHandle) -> Result<String, BrowserError> {
        self.element(element)?
            .text()
            .await
            .map_err(|e| command_error(e, None))
    }

    async fn property(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        self.element(element)?
            .prop(name)
            .await
            .map_err(|e| command_error(e, None))
    }

    async fn send_keys(&mut self, element: ElementHandle, keys: &str) -> Result<(), BrowserError> {
        self.element(element)?
            .send_keys(keys)
            .await
            .map_err(|e| command_error(e, None))
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), BrowserError> {
        self.element(element)?
            .click()
            .await
            .map_err(|e| command_error(e, None))
    }

    async fn quit(self: Box<Self>) -> Result<(), BrowserError> {
        self.client
            .close()
            .await
            .map_err(|e| command_error(e, None))
    }
}

//! Shared fakes for driving the pipeline without a browser, an LLM or a mail server.
#![allow(dead_code)]

use async_trait::async_trait;
use job_autopilot::{
    app_state::{AppState, RunSettings},
    db,
    models::applicant::ApplicantProfile,
    services::{
        browser::{BrowserError, BrowserLauncher, BrowserSession, ElementHandle, Locator},
        cover_letter::LetterWriter,
        notifier::{FollowUpOutcome, FollowUpSender},
        pacing::Pacing,
        scraper::{CardLocators, JobScraper},
        submitter::{ApplicationSubmitter, FormLocators},
    },
};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const SEARCH_URL: &str = "https://jobs.example.com/search?q=rust";

/// A node of a scripted page.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    pub tag: String,
    pub class: Option<String>,
    pub name: Option<String>,
    /// XPath expression this node answers to
    pub xpath: Option<String>,
    pub text: String,
    pub href: Option<String>,
    pub children: Vec<FakeNode>,
}

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn xpath(mut self, xpath: &str) -> Self {
        self.xpath = Some(xpath.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn child(mut self, child: FakeNode) -> Self {
        self.children.push(child);
        self
    }

    fn matches(&self, locator: &Locator) -> bool {
        match locator {
            Locator::ClassName(c) => self.class.as_deref() == Some(c.as_str()),
            Locator::TagName(t) => self.tag == *t,
            Locator::Name(n) => self.name.as_deref() == Some(n.as_str()),
            Locator::XPath(x) => self.xpath.as_deref() == Some(x.as_str()),
        }
    }

    fn collect_descendants(&self, locator: &Locator, out: &mut Vec<FakeNode>) {
        for child in &self.children {
            if child.matches(locator) {
                out.push(child.clone());
            }
            child.collect_descendants(locator, out);
        }
    }

    fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.xpath.clone())
            .unwrap_or_else(|| self.tag.clone())
    }
}

/// A job card in the default search-page layout. `None` leaves the element out.
pub fn card(title: Option<&str>, company: Option<&str>, link: Option<&str>) -> FakeNode {
    let mut node = FakeNode::new("div").class("job_seen_beacon");
    if let Some(title) = title {
        node = node.child(FakeNode::new("h2").text(&format!("  {title}\n")));
    }
    if let Some(company) = company {
        node = node.child(FakeNode::new("span").class("companyName").text(company));
    }
    if let Some(link) = link {
        node = node.child(FakeNode::new("a").href(link).text("View job"));
    }
    node
}

/// The default application form, optionally without one of its controls.
pub fn application_form(missing: Option<&str>) -> Vec<FakeNode> {
    let controls = [
        ("name", FakeNode::new("input").name("name")),
        ("email", FakeNode::new("input").name("email")),
        ("resume", FakeNode::new("input").xpath("//input[@type='file']")),
        ("submit", FakeNode::new("button").xpath("//button[text()='Submit']").text("Submit")),
    ];
    let form = controls
        .into_iter()
        .filter(|(key, _)| Some(*key) != missing)
        .fold(FakeNode::new("form"), |form, (_, control)| form.child(control));
    vec![form]
}

/// What the fake browser observed.
#[derive(Debug, Clone, Default)]
pub struct BrowserLog {
    pub launches: usize,
    pub quits: usize,
    pub visited: Vec<String>,
    /// (control label, keys) pairs
    pub typed: Vec<(String, String)>,
    pub clicks: usize,
}

#[derive(Default)]
struct FakeWorld {
    pages: HashMap<String, Vec<FakeNode>>,
    fail_launch: bool,
    broken_urls: HashSet<String>,
    crash_on_text: bool,
    log: BrowserLog,
}

/// Scripted browser: serves fixed pages and records every interaction.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    world: Arc<Mutex<FakeWorld>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, nodes: Vec<FakeNode>) -> Self {
        self.world.lock().unwrap().pages.insert(url.to_string(), nodes);
        self
    }

    pub fn failing_launch(self) -> Self {
        self.world.lock().unwrap().fail_launch = true;
        self
    }

    pub fn failing_navigation(self, url: &str) -> Self {
        self.world.lock().unwrap().broken_urls.insert(url.to_string());
        self
    }

    pub fn crashing_on_text(self) -> Self {
        self.world.lock().unwrap().crash_on_text = true;
        self
    }

    pub fn log(&self) -> BrowserLog {
        self.world.lock().unwrap().log.clone()
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut world = self.world.lock().unwrap();
        if world.fail_launch {
            return Err(BrowserError::Session("chromedriver not running".to_string()));
        }
        world.log.launches += 1;
        Ok(Box::new(FakeSession {
            world: self.world.clone(),
            roots: Vec::new(),
            handles: Vec::new(),
        }))
    }
}

struct FakeSession {
    world: Arc<Mutex<FakeWorld>>,
    roots: Vec<FakeNode>,
    handles: Vec<FakeNode>,
}

impl FakeSession {
    fn node(&self, handle: ElementHandle) -> Result<&FakeNode, BrowserError> {
        self.handles
            .get(handle.0)
            .ok_or(BrowserError::StaleHandle(handle))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let mut world = self.world.lock().unwrap();
        if world.broken_urls.contains(url) {
            return Err(BrowserError::Command(format!("net::ERR_CONNECTION_RESET at {url}")));
        }
        world.log.visited.push(url.to_string());
        self.roots = world.pages.get(url).cloned().unwrap_or_default();
        Ok(())
    }

    async fn find_element(
        &mut self,
        within: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<ElementHandle, BrowserError> {
        self.find_elements(within, locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::NoSuchElement(locator.to_string()))
    }

    async fn find_elements(
        &mut self,
        within: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let mut found = Vec::new();
        match within {
            Some(parent) => self.node(parent)?.collect_descendants(locator, &mut found),
            None => {
                for root in &self.roots {
                    if root.matches(locator) {
                        found.push(root.clone());
                    }
                    root.collect_descendants(locator, &mut found);
                }
            }
        }

        Ok(found
            .into_iter()
            .map(|node| {
                self.handles.push(node);
                ElementHandle(self.handles.len() - 1)
            })
            .collect())
    }

    async fn text(&mut self, element: ElementHandle) -> Result<String, BrowserError> {
        if self.world.lock().unwrap().crash_on_text {
            return Err(BrowserError::Command("chrome not reachable".to_string()));
        }
        Ok(self.node(element)?.text.clone())
    }

    async fn property(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let node = self.node(element)?;
        Ok(match name {
            "href" => node.href.clone(),
            _ => None,
        })
    }

    async fn send_keys(&mut self, element: ElementHandle, keys: &str) -> Result<(), BrowserError> {
        let label = self.node(element)?.label();
        self.world
            .lock()
            .unwrap()
            .log
            .typed
            .push((label, keys.to_string()));
        Ok(())
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), BrowserError> {
        self.node(element)?;
        self.world.lock().unwrap().log.clicks += 1;
        Ok(())
    }

    async fn quit(self: Box<Self>) -> Result<(), BrowserError> {
        self.world.lock().unwrap().log.quits += 1;
        Ok(())
    }
}

/// Returns a fixed letter and records the jobs it was asked about.
#[derive(Default)]
pub struct FakeLetterWriter {
    letter: String,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl FakeLetterWriter {
    pub fn returning(letter: &str) -> Self {
        Self {
            letter: letter.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LetterWriter for FakeLetterWriter {
    async fn write_cover_letter(
        &self,
        job_title: &str,
        company: &str,
        description: &str,
    ) -> String {
        self.calls.lock().unwrap().push((
            job_title.to_string(),
            company.to_string(),
            description.to_string(),
        ));
        self.letter.clone()
    }
}

/// Records follow-ups instead of sending them.
pub struct RecordingMailer {
    outcome: FollowUpOutcome,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn new(outcome: FollowUpOutcome) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl FollowUpSender for RecordingMailer {
    async fn send_follow_up(
        &self,
        recipient: &str,
        job_title: &str,
        company: &str,
    ) -> FollowUpOutcome {
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            job_title.to_string(),
            company.to_string(),
        ));
        self.outcome
    }
}

pub async fn memory_pool() -> SqlitePool {
    let pool = db::init_pool("sqlite::memory:").await.unwrap();
    db::initialize(&pool).await.unwrap();
    pool
}

pub fn applicant() -> ApplicantProfile {
    ApplicantProfile {
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        resume_path: PathBuf::from("/tmp/resume.pdf"),
    }
}

pub fn scraper(browser: &FakeBrowser) -> JobScraper {
    JobScraper::new(
        Arc::new(browser.clone()),
        SEARCH_URL,
        CardLocators::default(),
        Pacing::none(),
    )
}

pub fn submitter(browser: &FakeBrowser) -> ApplicationSubmitter {
    ApplicationSubmitter::new(Arc::new(browser.clone()), FormLocators::default(), Pacing::none())
}

/// Wire an `AppState` from fakes with all waits disabled.
pub fn state(
    db: SqlitePool,
    browser: &FakeBrowser,
    letters: Arc<FakeLetterWriter>,
    mailer: Arc<RecordingMailer>,
    follow_up_only_on_success: bool,
) -> AppState {
    AppState::new(
        db,
        scraper(browser),
        submitter(browser),
        letters,
        mailer,
        RunSettings {
            applicant: applicant(),
            follow_up_recipient: "hr@company.com".to_string(),
            follow_up_only_on_success,
            job_description: "Job description here".to_string(),
            job_pause: Pacing::none(),
        },
    )
}

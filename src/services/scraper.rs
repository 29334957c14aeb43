//! Job board scraper.
//!
//! Opens a browser on a search results page and reads every job card on it.

use std::sync::Arc;

use crate::models::job::JobListing;
use crate::services::browser::{
    self, BrowserError, BrowserLauncher, BrowserSession, ElementHandle, Locator,
};
use crate::services::pacing::Pacing;

/// Where the fields of a job card live on the results page.
#[derive(Debug, Clone)]
pub struct CardLocators {
    pub card: Locator,
    pub title: Locator,
    pub company: Locator,
    pub link: Locator,
}

impl Default for CardLocators {
    /// Indeed's search results layout.
    fn default() -> Self {
        Self {
            card: Locator::class_name("job_seen_beacon"),
            title: Locator::tag_name("h2"),
            company: Locator::class_name("companyName"),
            link: Locator::tag_name("a"),
        }
    }
}

pub struct JobScraper {
    browser: Arc<dyn BrowserLauncher>,
    search_url: String,
    locators: CardLocators,
    page_load: Pacing,
}

impl JobScraper {
    pub fn new(
        browser: Arc<dyn BrowserLauncher>,
        search_url: impl Into<String>,
        locators: CardLocators,
        page_load: Pacing,
    ) -> Self {
        Self {
            browser,
            search_url: search_url.into(),
            locators,
            page_load,
        }
    }

    /// Collect the job cards from the search page.
    ///
    /// Cards missing a title, company or link are skipped one by one. Any
    /// other browser failure yields an empty list.
    pub async fn scrape(&self) -> Vec<JobListing> {
        let mut session = match self.browser.launch().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Web scraping failed");
                return Vec::new();
            }
        };

        let result = self.collect(session.as_mut()).await;
        browser::release(session).await;

        match result {
            Ok(jobs) => {
                tracing::info!(count = jobs.len(), url = %self.search_url, "Scraped job listings");
                jobs
            }
            Err(e) => {
                tracing::error!(error = %e, url = %self.search_url, "Web scraping failed");
                Vec::new()
            }
        }
    }

    async fn collect(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<JobListing>, BrowserError> {
        session.navigate(&self.search_url).await?;
        self.page_load.wait().await;

        let cards = session.find_elements(None, &self.locators.card).await?;
        let mut jobs = Vec::with_capacity(cards.len());

        for card in cards {
            match self.read_card(session, card).await {
                Ok(Some(job)) => jobs.push(job),
                Ok(None) => {
                    tracing::debug!("Skipping job card with empty fields");
                }
                Err(e) if e.is_missing_element() => {
                    tracing::debug!(error = %e, "Skipping incomplete job card");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(jobs)
    }

    async fn read_card(
        &self,
        session: &mut dyn BrowserSession,
        card: ElementHandle,
    ) -> Result<Option<JobListing>, BrowserError> {
        let title_el = session.find_element(Some(card), &self.locators.title).await?;
        let title = session.text(title_el).await?.trim().to_string();

        let company_el = session.find_element(Some(card), &self.locators.company).await?;
        let company = session.text(company_el).await?.trim().to_string();

        let link_el = session.find_element(Some(card), &self.locators.link).await?;
        let link = session.property(link_el, "href").await?.unwrap_or_default();

        if title.is_empty() || company.is_empty() || link.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(JobListing {
            title,
            company,
            link,
        }))
    }
}

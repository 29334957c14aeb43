use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::queries;
use crate::models::applicant::ApplicantProfile;
use crate::models::job::JobStatus;
use crate::services::browser::{self, BrowserError, BrowserLauncher, BrowserSession, Locator};
use crate::services::pacing::Pacing;

/// Where the application form controls live on a job page.
#[derive(Debug, Clone)]
pub struct FormLocators {
    pub name: Locator,
    pub email: Locator,
    pub resume: Locator,
    pub submit: Locator,
}

impl Default for FormLocators {
    fn default() -> Self {
        Self {
            name: Locator::name("name"),
            email: Locator::name("email"),
            resume: Locator::xpath("//input[@type='file']"),
            submit: Locator::xpath("//button[text()='Submit']"),
        }
    }
}

/// Result of one application attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The form was filled and submitted; the job is now `applied`.
    Submitted,
    /// A form control was missing; the job stays `pending`.
    FormIncomplete,
    /// The browser could not be driven; the job stays `pending`.
    Failed,
}

pub struct ApplicationSubmitter {
    browser: Arc<dyn BrowserLauncher>,
    locators: FormLocators,
    page_load: Pacing,
}

impl ApplicationSubmitter {
    pub fn new(browser: Arc<dyn BrowserLauncher>, locators: FormLocators, page_load: Pacing) -> Self {
        Self {
            browser,
            locators,
            page_load,
        }
    }

    /// Fill in and submit the application form at `job_url`.
    ///
    /// Only a failure to record the new status is returned as an error.
    pub async fn submit(
        &self,
        pool: &SqlitePool,
        job_id: i64,
        job_url: &str,
        applicant: &ApplicantProfile,
    ) -> Result<SubmissionOutcome, sqlx::Error> {
        let outcome = match self.browser.launch().await {
            Ok(mut session) => {
                let result = self.fill_form(session.as_mut(), job_url, applicant).await;
                browser::release(session).await;
                classify(result, job_id, job_url)
            }
            Err(e) => {
                tracing::error!(job_id, url = %job_url, error = %e, "Job application failed");
                SubmissionOutcome::Failed
            }
        };

        if outcome == SubmissionOutcome::Submitted {
            queries::update_status(pool, job_id, JobStatus::Applied).await?;
        }

        Ok(outcome)
    }

    async fn fill_form(
        &self,
        session: &mut dyn BrowserSession,
        job_url: &str,
        applicant: &ApplicantProfile,
    ) -> Result<(), BrowserError> {
        session.navigate(job_url).await?;
        self.page_load.wait().await;

        let name = session.find_element(None, &self.locators.name).await?;
        session.send_keys(name, &applicant.name).await?;

        let email = session.find_element(None, &self.locators.email).await?;
        session.send_keys(email, &applicant.email).await?;

        let resume = session.find_element(None, &self.locators.resume).await?;
        session
            .send_keys(resume, &applicant.resume_path.to_string_lossy())
            .await?;

        let submit = session.find_element(None, &self.locators.submit).await?;
        session.click(submit).await
    }
}

fn classify(result: Result<(), BrowserError>, job_id: i64, job_url: &str) -> SubmissionOutcome {
    match result {
        Ok(()) => {
            tracing::info!(job_id, url = %job_url, "Application submitted");
            SubmissionOutcome::Submitted
        }
        Err(e) if e.is_missing_element() => {
            tracing::warn!(job_id, url = %job_url, error = %e, "Elements not found for job application");
            SubmissionOutcome::FormIncomplete
        }
        Err(e) => {
            tracing::error!(job_id, url = %job_url, error = %e, "Job application failed");
            SubmissionOutcome::Failed
        }
    }
}

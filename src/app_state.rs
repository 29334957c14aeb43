use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::models::applicant::ApplicantProfile;
use crate::services::{
    browser::BrowserLauncher,
    cover_letter::{CoverLetterGenerator, LetterError, LetterWriter},
    notifier::{FollowUpSender, SmtpNotifier},
    pacing::Pacing,
    scraper::{CardLocators, JobScraper},
    submitter::{ApplicationSubmitter, FormLocators},
    webdriver::WebDriverLauncher,
};

/// Per-run choices that are not tied to a single component.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub applicant: ApplicantProfile,
    pub follow_up_recipient: String,
    pub follow_up_only_on_success: bool,
    /// Description text handed to the cover letter prompt
    pub job_description: String,
    /// Wait between two jobs
    pub job_pause: Pacing,
}

/// Everything the pipeline needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub scraper: Arc<JobScraper>,
    pub submitter: Arc<ApplicationSubmitter>,
    pub letters: Arc<dyn LetterWriter>,
    pub mailer: Arc<dyn FollowUpSender>,
    pub settings: RunSettings,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        scraper: JobScraper,
        submitter: ApplicationSubmitter,
        letters: Arc<dyn LetterWriter>,
        mailer: Arc<dyn FollowUpSender>,
        settings: RunSettings,
    ) -> Self {
        Self {
            db,
            scraper: Arc::new(scraper),
            submitter: Arc::new(submitter),
            letters,
            mailer,
            settings,
        }
    }

    /// Build the production components from configuration.
    pub fn from_config(config: &AppConfig, db: SqlitePool) -> Result<Self, StartupError> {
        let applicant = config.applicant()?;
        if !applicant.resume_path.exists() {
            tracing::warn!(
                resume_path = %applicant.resume_path.display(),
                "Resume file does not exist, uploads will likely fail"
            );
        }

        let browser: Arc<dyn BrowserLauncher> = Arc::new(WebDriverLauncher::new(
            config.webdriver_url.clone(),
            config.browser_headless,
        ));

        let scraper = JobScraper::new(
            browser.clone(),
            config.search_url.clone(),
            CardLocators::default(),
            config.page_load_pacing(),
        );
        let submitter = ApplicationSubmitter::new(
            browser,
            FormLocators::default(),
            config.page_load_pacing(),
        );

        let letters = CoverLetterGenerator::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.openai_base_url.clone(),
        )?;

        let mailer = SmtpNotifier::new(
            config.email_user.clone(),
            config.email_password.clone(),
            config.smtp_host.clone(),
            config.smtp_port,
            applicant.name.clone(),
        );

        let settings = RunSettings {
            applicant,
            follow_up_recipient: config.follow_up_recipient.clone(),
            follow_up_only_on_success: config.follow_up_only_on_success,
            job_description: config.job_description.clone(),
            job_pause: config.job_pause_pacing(),
        };

        Ok(Self::new(
            db,
            scraper,
            submitter,
            Arc::new(letters),
            Arc::new(mailer),
            settings,
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build cover letter client: {0}")]
    Letters(#[from] LetterError),
}

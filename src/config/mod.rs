use garde::Validate;
use serde::Deserialize;
use std::path::PathBuf;

use crate::models::applicant::ApplicantProfile;
use crate::services::pacing::Pacing;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite connection string for the listing store
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// OpenAI API key. Cover letters are skipped when unset.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Base URL of an OpenAI-compatible chat completions API
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// SMTP account used for follow-up emails. Follow-ups are skipped when unset.
    ///
    /// Also the `From` address of every follow-up, so it must be a full email
    /// address (`me@example.com`), not a bare login name.
    #[serde(default)]
    pub email_user: Option<String>,

    #[serde(default)]
    pub email_password: Option<String>,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// WebDriver endpoint (chromedriver, geckodriver, selenium)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub browser_headless: bool,

    /// Job board search results page to scrape
    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_applicant_name")]
    pub applicant_name: String,

    #[serde(default = "default_applicant_email")]
    pub applicant_email: String,

    #[serde(default = "default_resume_path")]
    pub resume_path: PathBuf,

    #[serde(default = "default_follow_up_recipient")]
    pub follow_up_recipient: String,

    /// Only send a follow-up when the form submission went through
    #[serde(default)]
    pub follow_up_only_on_success: bool,

    /// Description text handed to the cover letter prompt
    #[serde(default = "default_job_description")]
    pub job_description: String,

    #[serde(default = "default_page_load_delay_min_secs")]
    pub page_load_delay_min_secs: u64,

    #[serde(default = "default_page_load_delay_max_secs")]
    pub page_load_delay_max_secs: u64,

    #[serde(default = "default_job_pause_min_secs")]
    pub job_pause_min_secs: u64,

    #[serde(default = "default_job_pause_max_secs")]
    pub job_pause_max_secs: u64,
}

fn default_database_url() -> String {
    "sqlite://applications.db".to_string()
}

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_search_url() -> String {
    "https://www.indeed.com/jobs?q=software+developer&l=remote".to_string()
}

fn default_applicant_name() -> String {
    "John Doe".to_string()
}

fn default_applicant_email() -> String {
    "john.doe@example.com".to_string()
}

fn default_resume_path() -> PathBuf {
    PathBuf::from("/path/to/resume.pdf")
}

fn default_follow_up_recipient() -> String {
    "hr@company.com".to_string()
}

fn default_job_description() -> String {
    "Job description here".to_string()
}

fn default_page_load_delay_min_secs() -> u64 {
    30
}

fn default_page_load_delay_max_secs() -> u64 {
    60
}

fn default_job_pause_min_secs() -> u64 {
    5
}

fn default_job_pause_max_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env::<Self>()?.normalized())
    }

    /// Build a config from explicit key/value pairs (upper-case env names).
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Self>(vars)?.normalized())
    }

    /// Blank credentials count as missing.
    fn normalized(mut self) -> Self {
        for field in [
            &mut self.openai_api_key,
            &mut self.email_user,
            &mut self.email_password,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }

    /// The validated applicant profile used for form filling and signatures.
    pub fn applicant(&self) -> Result<ApplicantProfile, ConfigError> {
        let profile = ApplicantProfile {
            name: self.applicant_name.clone(),
            email: self.applicant_email.clone(),
            resume_path: self.resume_path.clone(),
        };
        profile
            .validate()
            .map_err(|e| ConfigError::Applicant(e.to_string()))?;
        Ok(profile)
    }

    pub fn page_load_pacing(&self) -> Pacing {
        Pacing::between_secs(self.page_load_delay_min_secs, self.page_load_delay_max_secs)
    }

    pub fn job_pause_pacing(&self) -> Pacing {
        Pacing::between_secs(self.job_pause_min_secs, self.job_pause_max_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid applicant profile: {0}")]
    Applicant(String),
}

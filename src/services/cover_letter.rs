use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anything that can draft a cover letter for a job.
///
/// An empty string means no letter could be produced.
#[async_trait]
pub trait LetterWriter: Send + Sync {
    async fn write_cover_letter(&self, job_title: &str, company: &str, description: &str)
        -> String;
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct CoverLetterGenerator {
    http: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

pub fn build_prompt(job_title: &str, company: &str, description: &str) -> String {
    format!(
        "Write a personalized cover letter for a {job_title} role at {company}. \
         Job description: {description}"
    )
}

impl CoverLetterGenerator {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LetterError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Generate a cover letter, or an empty string if that is not possible.
    pub async fn generate(&self, job_title: &str, company: &str, description: &str) -> String {
        match self.try_generate(job_title, company, description).await {
            Ok(letter) => {
                tracing::info!(
                    job_title = %job_title,
                    company = %company,
                    length = letter.len(),
                    "Cover letter generated"
                );
                letter
            }
            Err(LetterError::MissingApiKey) => {
                tracing::warn!("Missing OpenAI API key, skipping cover letter");
                String::new()
            }
            Err(e) => {
                tracing::error!(error = %e, job_title = %job_title, "Failed to generate cover letter");
                String::new()
            }
        }
    }

    async fn try_generate(
        &self,
        job_title: &str,
        company: &str,
        description: &str,
    ) -> Result<String, LetterError> {
        let api_key = self.api_key.as_deref().ok_or(LetterError::MissingApiKey)?;
        let prompt = build_prompt(job_title, company, description);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "system",
                content: &prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LetterError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.into_text().ok_or(LetterError::EmptyContent)
    }
}

#[async_trait]
impl LetterWriter for CoverLetterGenerator {
    async fn write_cover_letter(
        &self,
        job_title: &str,
        company: &str,
        description: &str,
    ) -> String {
        self.generate(job_title, company, description).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LetterError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response contained no cover letter text")]
    EmptyContent,
}

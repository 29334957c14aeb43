use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// What happened to a follow-up email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpOutcome {
    Sent,
    /// Mail credentials are not configured.
    Skipped,
    Failed,
}

/// Sends the follow-up email after an application attempt.
#[async_trait]
pub trait FollowUpSender: Send + Sync {
    async fn send_follow_up(&self, recipient: &str, job_title: &str, company: &str)
        -> FollowUpOutcome;
}

/// Authenticated SMTP session upgraded with STARTTLS.
pub struct SmtpNotifier {
    username: Option<String>,
    password: Option<String>,
    host: String,
    port: u16,
    signature: String,
}

impl SmtpNotifier {
    pub fn new(
        username: Option<String>,
        password: Option<String>,
        host: impl Into<String>,
        port: u16,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            username,
            password,
            host: host.into(),
            port,
            signature: signature.into(),
        }
    }

    async fn try_send(
        &self,
        recipient: &str,
        job_title: &str,
        company: &str,
    ) -> Result<(), NotifyError> {
        let (username, password) = match (&self.username, &self.password) {
            (Some(u), Some(p)) => (u.clone(), p.clone()),
            _ => return Err(NotifyError::MissingCredentials),
        };

        let email = compose_follow_up(&username, recipient, job_title, company, &self.signature)?;
        let host = self.host.clone();
        let port = self.port;

        tokio::task::spawn_blocking(move || {
            let mailer = SmtpTransport::starttls_relay(&host)?
                .port(port)
                .credentials(Credentials::new(username, password))
                .build();
            mailer.send(&email).map(|_| ())
        })
        .await??;

        Ok(())
    }
}

#[async_trait]
impl FollowUpSender for SmtpNotifier {
    async fn send_follow_up(
        &self,
        recipient: &str,
        job_title: &str,
        company: &str,
    ) -> FollowUpOutcome {
        match self.try_send(recipient, job_title, company).await {
            Ok(()) => {
                tracing::info!(recipient = %recipient, job_title = %job_title, "Follow-up email sent");
                FollowUpOutcome::Sent
            }
            Err(NotifyError::MissingCredentials) => {
                tracing::warn!("Email credentials not set, skipping follow-up");
                FollowUpOutcome::Skipped
            }
            Err(e) => {
                tracing::error!(recipient = %recipient, error = %e, "Failed to send follow-up email");
                FollowUpOutcome::Failed
            }
        }
    }
}

/// Build the plain-text follow-up message.
pub fn compose_follow_up(
    from: &str,
    to: &str,
    job_title: &str,
    company: &str,
    signature: &str,
) -> Result<Message, NotifyError> {
    let body = format!(
        "Dear Hiring Manager,\n\n\
         I wanted to follow up on my application for {job_title} at {company}. \
         Looking forward to your response.\n\n\
         Best regards,\n{signature}"
    );

    let message = Message::builder()
        .from(from.parse::<Mailbox>()?)
        .to(to.parse::<Mailbox>()?)
        .subject(format!("Follow-up on {job_title} Application"))
        .header(ContentType::TEXT_PLAIN)
        .body(body)?;

    Ok(message)
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Email credentials not set")]
    MissingCredentials,

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Mail task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

//! One pass of the application workflow:
//! scrape → store → for each pending job: letter → submit → follow-up.

use serde::Serialize;

use crate::app_state::AppState;
use crate::db::{self, queries};
use crate::models::job::PendingJob;
use crate::services::notifier::FollowUpOutcome;
use crate::services::submitter::SubmissionOutcome;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub scraped: usize,
    pub newly_stored: u64,
    pub pending: usize,
    pub submitted: usize,
    pub incomplete: usize,
    pub failed: usize,
    /// Jobs dropped because no cover letter could be produced
    pub skipped: usize,
    pub follow_ups_sent: usize,
}

impl RunSummary {
    /// The counters as a JSON object, for the end-of-run log line.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run the whole workflow once.
///
/// Only storage failures abort the run; every other failure is logged and
/// the affected job is left `pending` for the next run.
pub async fn run(state: &AppState) -> Result<RunSummary, sqlx::Error> {
    let mut summary = RunSummary::default();

    db::initialize(&state.db).await?;

    let listings = state.scraper.scrape().await;
    summary.scraped = listings.len();
    summary.newly_stored = queries::store_jobs(&state.db, &listings).await?;

    let pending = queries::fetch_pending(&state.db).await?;
    summary.pending = pending.len();
    tracing::info!(
        scraped = summary.scraped,
        newly_stored = summary.newly_stored,
        pending = summary.pending,
        "Starting application pass"
    );

    for job in &pending {
        process_job(state, job, &mut summary).await?;
        state.settings.job_pause.wait().await;
    }

    tracing::info!(summary = %summary.to_json(), "Application pass finished");

    Ok(summary)
}

async fn process_job(
    state: &AppState,
    job: &PendingJob,
    summary: &mut RunSummary,
) -> Result<(), sqlx::Error> {
    let settings = &state.settings;
    tracing::info!(job_id = job.id, title = %job.title, company = %job.company, "Processing job");

    let letter = state
        .letters
        .write_cover_letter(&job.title, &job.company, &settings.job_description)
        .await;
    if letter.is_empty() {
        tracing::info!(job_id = job.id, "No cover letter, skipping job");
        summary.skipped += 1;
        return Ok(());
    }

    let outcome = state
        .submitter
        .submit(&state.db, job.id, &job.link, &settings.applicant)
        .await?;
    match outcome {
        SubmissionOutcome::Submitted => summary.submitted += 1,
        SubmissionOutcome::FormIncomplete => summary.incomplete += 1,
        SubmissionOutcome::Failed => summary.failed += 1,
    }

    if settings.follow_up_only_on_success && outcome != SubmissionOutcome::Submitted {
        tracing::debug!(job_id = job.id, "Submission did not go through, no follow-up");
        return Ok(());
    }

    let sent = state
        .mailer
        .send_follow_up(&settings.follow_up_recipient, &job.title, &job.company)
        .await;
    if sent == FollowUpOutcome::Sent {
        summary.follow_ups_sent += 1;
    }

    Ok(())
}

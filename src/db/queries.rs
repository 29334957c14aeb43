use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::models::job::{JobListing, JobRecord, JobStatus, PendingJob};

/// Insert scraped listings, ignoring any whose link is already stored.
///
/// Returns the number of newly inserted rows.
pub async fn store_jobs(pool: &SqlitePool, jobs: &[JobListing]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for job in jobs {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (title, company, link)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (link) DO NOTHING
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.link)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Get every job that has not been applied to yet.
pub async fn fetch_pending(pool: &SqlitePool) -> Result<Vec<PendingJob>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, company, link
        FROM jobs
        WHERE status = 'pending'
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            Ok(PendingJob {
                id: r.try_get("id")?,
                title: r.try_get("title")?,
                company: r.try_get("company")?,
                link: r.try_get("link")?,
            })
        })
        .collect()
}

/// Overwrite the status of a job.
pub async fn update_status(
    pool: &SqlitePool,
    job_id: i64,
    status: JobStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE jobs SET status = ?1 WHERE id = ?2")
        .bind(status.to_string())
        .bind(job_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Get a job by ID
pub async fn get_job(pool: &SqlitePool, job_id: i64) -> Result<Option<JobRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, title, company, link, status
        FROM jobs
        WHERE id = ?1
        "#,
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some(r) => {
            let status_str: String = r.try_get("status")?;
            Some(JobRecord {
                id: r.try_get("id")?,
                title: r.try_get("title")?,
                company: r.try_get("company")?,
                link: r.try_get("link")?,
                status: JobStatus::from_str(&status_str)
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            })
        }
        None => None,
    })
}

use strum::{Display, EnumString};

/// Application status of a stored job listing.
#[derive(Debug, Clone, Copy, EnumString, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Applied,
}

/// A job card as read from the search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub link: String,
}

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub link: String,
    pub status: JobStatus,
}

/// A job still waiting for an application attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJob {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub link: String,
}

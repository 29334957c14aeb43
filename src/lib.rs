//! Job application autopilot
//!
//! Scrapes job listings from a search page, stores them in SQLite, writes a
//! cover letter for each pending job with a chat-completions model, fills in
//! the application form through WebDriver and sends a follow-up email.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod services;

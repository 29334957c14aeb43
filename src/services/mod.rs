pub mod browser;
pub mod cover_letter;
pub mod notifier;
pub mod pacing;
pub mod scraper;
pub mod submitter;
pub mod webdriver;

//! ygoprodeck card database scraping
//!
//! Walks the paginated listing, visits every card page and accumulates
//! attribute records.

pub mod extract;
mod scraper;
mod types;

pub use self::scraper::CardScraper;
pub use types::{
    CardRecord, PageReport, ScrapeSummary, CARD_DESCRIPTION, CARD_NAME, PAGE_FOUND,
};

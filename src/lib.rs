//! ygoprodeck card database scraper
//!
//! - Walks the paginated card listing in a headless Chrome
//! - Scrapes every card page into attribute records
//! - Writes the card table and the visited URL list as CSV, with
//!   checkpoints for pages that hit errors
//!
//! # Example
//!
//! ```rust,ignore
//! use card_catalog_scraper::{ScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!
//!     let request = ScrapeRequest::new(0, 2)
//!         .with_output_dir("./cards")
//!         .with_headless(false);
//!
//!     let summary = service.call(request).await.unwrap();
//!     println!("cards: {}, table: {:?}", summary.cards_scraped, summary.card_table);
//! }
//! ```

pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod service;
pub mod traits;

pub use browser::ChromeBrowser;
pub use catalog::{CardRecord, CardScraper, PageReport, ScrapeSummary};
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use service::{ScrapeRequest, ScraperService};
pub use traits::CatalogBrowser;

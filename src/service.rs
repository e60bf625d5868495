use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::browser::ChromeBrowser;
use crate::catalog::{CardScraper, ScrapeSummary};
use crate::config::ScraperConfig;
use crate::error::ScraperError;

/// Scrape request: which listing pages, where the CSVs go
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub start_page: u32,
    pub total_pages: u32,
    pub output_dir: PathBuf,
    pub headless: bool,
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        let config = ScraperConfig::default();
        Self {
            start_page: config.start_page,
            total_pages: config.total_pages,
            output_dir: config.output_dir,
            headless: config.headless,
        }
    }
}

impl ScrapeRequest {
    pub fn new(start_page: u32, total_pages: u32) -> Self {
        Self {
            start_page,
            total_pages,
            ..Default::default()
        }
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl From<ScrapeRequest> for ScraperConfig {
    fn from(req: ScrapeRequest) -> Self {
        ScraperConfig::default()
            .with_pages(req.start_page, req.total_pages)
            .with_output_dir(req.output_dir)
            .with_headless(req.headless)
    }
}

/// Scraper behind tower::Service
#[derive(Debug, Clone, Default)]
pub struct ScraperService {}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeSummary;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!(
            "Scrape request: pages {}..{} -> {:?}",
            req.start_page,
            req.start_page.saturating_add(req.total_pages),
            req.output_dir
        );

        Box::pin(async move {
            let config: ScraperConfig = req.into();
            let browser = ChromeBrowser::launch(&config).await?;
            let mut scraper = CardScraper::new(config, browser);

            let summary = scraper.run().await?;

            info!(
                "Scrape complete: table={:?}, urls={:?}, cards={}",
                summary.card_table, summary.url_list, summary.cards_scraped
            );
            Ok(summary)
        })
    }
}

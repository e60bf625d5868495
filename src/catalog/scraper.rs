//! Listing/card extraction and the page loop

use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::output;
use crate::traits::CatalogBrowser;

use super::extract::{self, CardHeading, CardLinks};
use super::types::{CardRecord, PageReport, ScrapeSummary, CARD_DESCRIPTION, CARD_NAME, PAGE_FOUND};

/// Drives one browser session over the catalog.
pub struct CardScraper<B: CatalogBrowser> {
    config: ScraperConfig,
    browser: B,
    cards: Vec<CardRecord>,
    urls: Vec<String>,
    card_counter: usize,
}

fn log_failure(context: &str, e: &ScraperError) {
    if e.is_timeout() {
        warn!("Timeout while {}: {}", context, e);
    } else {
        error!("Error while {}: {}", context, e);
    }
}

impl<B: CatalogBrowser> CardScraper<B> {
    pub fn new(config: ScraperConfig, browser: B) -> Self {
        Self {
            config,
            browser,
            cards: Vec::new(),
            urls: Vec::new(),
            card_counter: 0,
        }
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    async fn try_card_urls(&mut self) -> Result<CardLinks, ScraperError> {
        let timeout = self.config.element_timeout;
        self.browser.wait_until_hidden(extract::LOADER, timeout).await?;
        self.browser.wait_until_present(extract::RESULTS, timeout).await?;

        let html = self.browser.html().await?;
        extract::parse_card_links(&html, &self.config.base_url)
    }

    /// Card URLs on the listing page currently open.
    ///
    /// Failures are logged and yield an empty list; `had_error` is raised.
    /// Anchors without an href also raise it, the rest are still returned.
    pub async fn fetch_card_urls(&mut self, had_error: &mut bool) -> Vec<String> {
        match self.try_card_urls().await {
            Ok(CardLinks { urls, missing_href }) => {
                if missing_href > 0 {
                    warn!("{} result anchors without href", missing_href);
                    *had_error = true;
                }
                urls
            }
            Err(e) => {
                log_failure("fetching card URLs", &e);
                *had_error = true;
                Vec::new()
            }
        }
    }

    async fn try_card_info(
        &mut self,
        url: &str,
        page: u32,
        record: &mut CardRecord,
    ) -> Result<(), ScraperError> {
        let timeout = self.config.element_timeout;

        self.browser.open(url).await?;
        self.browser.wait_until_present(extract::CARD_NAME, timeout).await?;
        self.browser.wait_until_present(extract::CARD_TEXT, timeout).await?;

        let CardHeading { name, description } =
            extract::parse_card_heading(&self.browser.html().await?)?;
        record.insert(PAGE_FOUND, page.to_string());
        record.insert(CARD_NAME, name);
        record.insert(CARD_DESCRIPTION, description);

        self.browser.wait_until_present(extract::CARD_INFO, timeout).await?;
        for (key, value) in extract::parse_card_attributes(&self.browser.html().await?)? {
            record.insert(key, value);
        }

        Ok(())
    }

    /// Scrape one card page.
    ///
    /// On failure the record holds whatever was read before the error.
    pub async fn fetch_card_info(
        &mut self,
        url: &str,
        page: u32,
        had_error: &mut bool,
    ) -> CardRecord {
        let mut record = CardRecord::new();
        if let Err(e) = self.try_card_info(url, page, &mut record).await {
            log_failure(&format!("processing {}", url), &e);
            *had_error = true;
        }
        record
    }

    /// Listing extraction with redo iterations while the result is empty.
    async fn collect_page_urls(&mut self, report: &mut PageReport) -> Vec<String> {
        let mut urls = self.fetch_card_urls(&mut report.had_error).await;

        while urls.is_empty() && report.redo_iterations < self.config.max_url_retries {
            report.redo_iterations += 1;
            info!("REDO ITERATION: {}", report.redo_iterations);
            urls = self.fetch_card_urls(&mut report.had_error).await;
        }

        if urls.is_empty() {
            warn!(
                "Page {} yielded no card URLs after {} redo iterations",
                report.page, report.redo_iterations
            );
        }
        urls
    }

    fn write_checkpoint(&self) -> Option<PathBuf> {
        let path = self.config.checkpoint_path(self.card_counter);
        match output::save_card_table(&path, &self.cards) {
            Ok(()) => Some(path),
            Err(e) => {
                error!("Checkpoint write to {} failed: {}", path.display(), e);
                None
            }
        }
    }

    /// Process one listing page and every card on it.
    pub async fn scrape_page(&mut self, page: u32) -> PageReport {
        let mut report = PageReport {
            page,
            ..Default::default()
        };

        info!("CURRENT PAGE {}", page);
        let listing_url = self.config.listing_url(page);
        if let Err(e) = self.browser.open(&listing_url).await {
            log_failure(&format!("opening {}", listing_url), &e);
            report.had_error = true;
        }

        let card_urls = self.collect_page_urls(&mut report).await;
        report.urls_found = card_urls.len();
        self.urls.extend(card_urls.iter().cloned());

        for card_url in &card_urls {
            self.card_counter += 1;
            let mut card_error = false;
            let record = self.fetch_card_info(card_url, page, &mut card_error).await;
            if card_error {
                report.cards_failed += 1;
                report.had_error = true;
            }
            info!(
                "CURRENT CARD NUM: {} Current Page {} {}",
                self.card_counter,
                page,
                serde_json::to_string(&record).unwrap_or_default()
            );
            self.cards.push(record);
        }

        if report.had_error {
            report.checkpoint = self.write_checkpoint();
        }
        report
    }

    /// Scrape every configured page, close the browser, write the final files.
    pub async fn run(&mut self) -> Result<ScrapeSummary, ScraperError> {
        let started_at = Utc::now();
        info!(
            "Scraping pages {:?} ({} cards per page)",
            self.config.pages(),
            self.config.cards_per_page
        );

        let mut pages = Vec::new();
        for page in self.config.pages() {
            pages.push(self.scrape_page(page).await);
        }

        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }

        let card_table = self.config.card_table_path();
        let url_list = self.config.url_list_path();
        output::save_card_table(&card_table, &self.cards)?;
        output::save_url_list(&url_list, &self.urls)?;

        let summary = ScrapeSummary {
            started_at,
            finished_at: Utc::now(),
            cards_failed: pages.iter().map(|p| p.cards_failed).sum(),
            pages,
            urls_found: self.urls.len(),
            cards_scraped: self.cards.len(),
            card_table,
            url_list,
        };

        info!(
            "Scrape finished: {} urls, {} cards ({} failed), {} checkpoints",
            summary.urls_found,
            summary.cards_scraped,
            summary.cards_failed,
            summary.checkpoints().count()
        );
        Ok(summary)
    }
}

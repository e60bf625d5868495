use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// The slice of a browser session the catalog scraper needs.
#[async_trait]
pub trait CatalogBrowser: Send {
    /// Navigate the session to `url`.
    async fn open(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Wait until `selector` matches an element.
    async fn wait_until_present(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError>;

    /// Wait until nothing visible matches `selector`.
    async fn wait_until_hidden(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError>;

    /// Rendered HTML of the current page.
    async fn html(&mut self) -> Result<String, ScraperError>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), ScraperError>;
}

//! Chrome session driven over CDP (chromiumoxide)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::CatalogBrowser;

pub struct ChromeBrowser {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
    poll_interval: Duration,
}

impl ChromeBrowser {
    /// Launch Chrome and open a blank tab.
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScraperError> {
        info!("Launching browser...");

        let mut builder = BrowserConfig::builder()
            .window_size(1280, 800)
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if let Some(path) = config.resolve_chrome_executable() {
            builder = builder.chrome_executable(path);
        }

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // CDP events have to be drained for the session to make progress
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        info!("Browser launched");
        Ok(Self {
            browser: Some(browser),
            page: Some(page),
            handler: Some(handler),
            poll_interval: config.poll_interval,
        })
    }

    fn get_page(&self) -> Result<&Page, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("browser session already closed".into()))
    }
}

/// Poll a boolean JS expression until it holds or `timeout` passes.
async fn poll_until(
    page: &Page,
    script: &str,
    timeout: Duration,
    interval: Duration,
    what: &str,
) -> Result<(), ScraperError> {
    let start = Instant::now();

    loop {
        match page.evaluate(script).await {
            Ok(value) => {
                if value.into_value::<bool>().unwrap_or(false) {
                    debug!("{} after {:?}", what, start.elapsed());
                    return Ok(());
                }
            }
            Err(e) => debug!("{} check error: {}", what, e),
        }

        if start.elapsed() >= timeout {
            return Err(ScraperError::Timeout(format!(
                "{} not satisfied within {:?}",
                what, timeout
            )));
        }

        sleep(interval).await;
    }
}

/// Quote a CSS selector as a JS string literal.
fn js_string(selector: &str) -> String {
    serde_json::Value::String(selector.to_string()).to_string()
}

fn presence_script(selector: &str) -> String {
    format!("document.querySelector({}) !== null", js_string(selector))
}

fn hidden_script(selector: &str) -> String {
    format!(
        r#"
        (() => {{
            const elem = document.querySelector({});
            if (!elem) return true;
            const style = window.getComputedStyle(elem);
            const rect = elem.getBoundingClientRect();
            return style.display === 'none' ||
                   style.visibility === 'hidden' ||
                   (rect.width === 0 && rect.height === 0);
        }})()
        "#,
        js_string(selector)
    )
}

#[async_trait]
impl CatalogBrowser for ChromeBrowser {
    async fn open(&mut self, url: &str) -> Result<(), ScraperError> {
        let page = self.get_page()?;
        page.goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn wait_until_present(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let page = self.get_page()?.clone();
        let what = format!("presence of '{}'", selector);
        poll_until(&page, &presence_script(selector), timeout, self.poll_interval, &what).await
    }

    async fn wait_until_hidden(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let page = self.get_page()?.clone();
        let what = format!("invisibility of '{}'", selector);
        poll_until(&page, &hidden_script(selector), timeout, self.poll_interval, &what).await
    }

    async fn html(&mut self) -> Result<String, ScraperError> {
        self.get_page()?
            .content()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");

        self.page = None;
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Browser close failed: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Browser wait failed: {}", e);
            }
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        info!("Browser closed");
        Ok(())
    }
}

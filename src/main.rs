use card_catalog_scraper::{ScrapeRequest, ScraperService};
use tower::Service;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut service = ScraperService::new();

    match service.call(ScrapeRequest::default()).await {
        Ok(summary) => match serde_json::to_string(&summary) {
            Ok(json) => info!("Summary: {}", json),
            Err(e) => error!("Failed to serialize summary: {}", e),
        },
        Err(e) => {
            error!("Scrape failed: {}", e);
            std::process::exit(1);
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

pub const YGOPRODECK_BASE_URL: &str = "https://ygoprodeck.com";
pub const LISTING_URL_TEMPLATE: &str = "https://ygoprodeck.com/card-database/?&num={num}&offset={offset}";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Prefix for root-relative card links (`/card/...`)
    pub base_url: String,
    /// Listing URL with `{num}` and `{offset}` placeholders
    pub listing_url_template: String,
    pub start_page: u32,
    pub total_pages: u32,
    pub cards_per_page: u32,
    /// Deadline for each element wait
    pub element_timeout: Duration,
    pub poll_interval: Duration,
    /// Redo iterations after the first empty listing attempt
    pub max_url_retries: u32,
    pub output_dir: PathBuf,
    pub card_table_file: String,
    pub url_list_file: String,
    /// Checkpoints are `{prefix}{card_counter}_.csv`
    pub checkpoint_prefix: String,
    pub headless: bool,
    /// Falls back to CHROME_PATH / CHROMIUM_PATH, then chromiumoxide's detection
    pub chrome_executable: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: YGOPRODECK_BASE_URL.to_string(),
            listing_url_template: LISTING_URL_TEMPLATE.to_string(),
            start_page: 0,
            total_pages: 133,
            cards_per_page: 100,
            element_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(500),
            max_url_retries: 5,
            output_dir: PathBuf::from("."),
            card_table_file: "yugioh_cards_data_full_2_.csv".to_string(),
            url_list_file: "Scrapped_Urls.csv".to_string(),
            checkpoint_prefix: "yugioh_cards_data_full_".to_string(),
            headless: true,
            chrome_executable: None,
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, start_page: u32, total_pages: u32) -> Self {
        self.start_page = start_page;
        self.total_pages = total_pages;
        self
    }

    pub fn with_cards_per_page(mut self, cards_per_page: u32) -> Self {
        self.cards_per_page = cards_per_page;
        self
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_url_retries(mut self, retries: u32) -> Self {
        self.max_url_retries = retries;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    /// Listing URL for a zero-based page index.
    pub fn listing_url(&self, page: u32) -> String {
        let offset = u64::from(page) * u64::from(self.cards_per_page);
        self.listing_url_template
            .replace("{num}", &self.cards_per_page.to_string())
            .replace("{offset}", &offset.to_string())
    }

    pub fn pages(&self) -> std::ops::Range<u32> {
        self.start_page..self.start_page.saturating_add(self.total_pages)
    }

    pub fn card_table_path(&self) -> PathBuf {
        self.output_dir.join(&self.card_table_file)
    }

    pub fn url_list_path(&self) -> PathBuf {
        self.output_dir.join(&self.url_list_file)
    }

    pub fn checkpoint_path(&self, card_counter: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{}_.csv", self.checkpoint_prefix, card_counter))
    }

    /// Explicit setting first, then the environment.
    pub fn resolve_chrome_executable(&self) -> Option<PathBuf> {
        self.chrome_executable.clone().or_else(|| {
            std::env::var("CHROME_PATH")
                .or_else(|_| std::env::var("CHROMIUM_PATH"))
                .ok()
                .map(PathBuf::from)
        })
    }
}

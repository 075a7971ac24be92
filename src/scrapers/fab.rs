//! Fab marketplace listing scraper

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::error::ComposeError;
use crate::models::{Category, ScrapeResult};
use crate::traits::{ListingSelectors, ScraperConfig, StoreScraper};

/// Scraper for fab.com listing pages
pub struct FabScraper {
    client: Client,
    config: ScraperConfig,
}

impl FabScraper {
    /// Create a new Fab scraper with default configuration
    pub fn new() -> Result<Self, ComposeError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .build()?;

        let config = ScraperConfig {
            name: "Fab".to_string(),
            selectors: ListingSelectors {
                title: r#"meta[property="og:title"]"#.to_string(),
                image: r#"meta[property="og:image"]"#.to_string(),
                price: r#"[data-testid="price"], [class*="Price"]"#.to_string(),
            },
        };

        Ok(Self { client, config })
    }
}

#[async_trait]
impl StoreScraper for FabScraper {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn category(&self) -> Category {
        Category::Fab
    }

    async fn fetch_listing(&self, url: &str) -> Result<ScrapeResult, ComposeError> {
        info!("Fetching listing from {}", self.config.name);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ComposeError::Transport(format!(
                "failed to fetch listing page on {}: {}",
                self.config.name,
                response.status()
            )));
        }

        let html = response.text().await?;
        let result = super::extract_listing(&html, &self.config)?;

        info!(
            "Scraped {} listing: title present = {}, price present = {}",
            self.config.name,
            result.title.is_some(),
            result.price.is_some()
        );
        Ok(result)
    }
}

impl Clone for FabScraper {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
        }
    }
}

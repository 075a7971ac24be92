//! Traits and interfaces for store-agnostic listing scraping

use async_trait::async_trait;

use crate::error::ComposeError;
use crate::models::{Category, ScrapeResult};

/// Configuration for a store listing scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Display name for the store
    pub name: String,
    /// CSS selectors for extracting listing data
    pub selectors: ListingSelectors,
}

/// CSS selectors for different parts of a listing page
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// Title meta tag on the listing page
    pub title: String,
    /// Image meta tag on the listing page
    pub image: String,
    /// Price element within the listing body
    pub price: String,
}

/// Trait for store-specific listing scrapers
#[async_trait]
pub trait StoreScraper: Send + Sync {
    /// Get the configuration for this scraper
    fn config(&self) -> &ScraperConfig;

    /// The category whose listing URLs this scraper understands
    fn category(&self) -> Category;

    /// Fetch one listing page and extract whatever it offers
    ///
    /// # Arguments
    /// * `url` - The listing URL, already validated against the category
    ///
    /// # Returns
    /// * `Result<ScrapeResult, ComposeError>` - Partial listing data or a transport error
    async fn fetch_listing(&self, url: &str) -> Result<ScrapeResult, ComposeError>;

    /// Get the user agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
    }
}

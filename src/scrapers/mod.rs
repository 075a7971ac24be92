//! Store-specific listing scrapers

use scraper::{Html, Selector};

use crate::error::ComposeError;
use crate::models::ScrapeResult;
use crate::traits::ScraperConfig;

pub mod fab;
pub mod unity;

pub use fab::FabScraper;
pub use unity::UnityScraper;

/// Pulls title, image and price out of a listing page with the store's
/// selectors. Missing pieces stay `None`; only unparsable selectors are
/// errors.
pub(crate) fn extract_listing(
    html: &str,
    config: &ScraperConfig,
) -> Result<ScrapeResult, ComposeError> {
    let title_selector = Selector::parse(&config.selectors.title)
        .map_err(|e| ComposeError::Transport(format!("failed to parse title selector: {e:?}")))?;
    let image_selector = Selector::parse(&config.selectors.image)
        .map_err(|e| ComposeError::Transport(format!("failed to parse image selector: {e:?}")))?;
    let price_selector = Selector::parse(&config.selectors.price)
        .map_err(|e| ComposeError::Transport(format!("failed to parse price selector: {e:?}")))?;

    let document = Html::parse_document(html);

    let title = document
        .select(&title_selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let image_url = document
        .select(&image_selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|src| {
            if src.starts_with("//") {
                format!("https:{src}")
            } else {
                src.to_string()
            }
        })
        .filter(|src| !src.is_empty());

    let price = document
        .select(&price_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty());

    Ok(ScrapeResult {
        title,
        image_url,
        price,
        promo_code: None,
    })
}

use tracing::info;

use crate::backend::BackendClient;
use crate::defaults;
use crate::error::ComposeError;
use crate::form::ConfirmGate;
use crate::list::EmbedList;
use crate::merge::{self, AssetPart, EmbedPart};
use crate::models::{BulkExport, Category, EmbedConfig, EmbedRequest, ScrapeResult};
use crate::normalize;
use crate::scrapers::{FabScraper, UnityScraper};
use crate::traits::StoreScraper;

pub struct Composer {
    list: EmbedList,
    gate: Box<dyn ConfirmGate>,
    backend: BackendClient,
    scrapers: Vec<Box<dyn StoreScraper>>,
}

impl Composer {
    pub fn new(gate: Box<dyn ConfirmGate>) -> Result<Self, ComposeError> {
        Ok(Self {
            list: EmbedList::new(),
            gate,
            backend: BackendClient::new(),
            scrapers: vec![Box::new(UnityScraper::new()?), Box::new(FabScraper::new()?)],
        })
    }

    pub fn list(&self) -> &EmbedList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EmbedList {
        &mut self.list
    }

    /// Switches one embed's category through the confirm gate. Returns
    /// whether the switch happened.
    pub fn select_category(
        &mut self,
        index: usize,
        category: Category,
    ) -> Result<bool, ComposeError> {
        let Self { list, gate, .. } = self;
        let form = list.get_mut(index).ok_or_else(|| out_of_range(index))?;
        Ok(form.select(category, gate.as_ref()))
    }

    /// Applies a bulk JSON payload: a merge into the embed at `index`, or a
    /// full list rebuild when the payload carries an `embeds` array. Returns
    /// `Ok(false)` when the confirm gate declined a category change.
    pub fn apply_bulk(&mut self, index: usize, raw: &str) -> Result<bool, ComposeError> {
        let payload = merge::parse_bulk(raw)?;
        if let Some(entries) = &payload.embeds {
            self.rebuild_list(entries)?;
            return Ok(true);
        }

        let Self { list, gate, .. } = self;
        let form = list.get_mut(index).ok_or_else(|| out_of_range(index))?;
        form.apply_bulk(&payload, gate.as_ref())
    }

    // All-or-nothing: every entry must resolve a category and merge cleanly
    // before the old list is touched.
    fn rebuild_list(&mut self, entries: &[EmbedPart]) -> Result<(), ComposeError> {
        if entries.is_empty() {
            return Err(ComposeError::Payload("embeds array is empty".to_string()));
        }

        let fallback = self.list.first_category();
        let mut rebuilt = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let category = entry.category.or(fallback).ok_or_else(|| {
                ComposeError::Payload(format!(
                    "embed {position} declares no category and none is selected"
                ))
            })?;
            let merged = merge::merge(
                &defaults::defaults_for(category),
                Some(entry),
                &AssetPart::default(),
            );
            rebuilt.push(crate::form::EmbedForm::from_embed(merged));
        }

        info!("Rebuilding embed list with {} entries", rebuilt.len());
        self.list.replace(rebuilt)
    }

    /// Folds an already-fetched scrape result into the embed at `index`
    pub fn apply_scrape(&mut self, index: usize, result: &ScrapeResult) -> Result<(), ComposeError> {
        let form = self.list.get_mut(index).ok_or_else(|| out_of_range(index))?;
        form.apply_scrape(result)
    }

    /// Scrapes the listing behind one embed's URL and folds the result in.
    /// The in-flight marker is advisory; if two scrapes race on the same
    /// index, the later one to resolve wins.
    pub async fn scrape_into(&mut self, index: usize) -> Result<(), ComposeError> {
        let (category, url) = {
            let form = self.list.get(index).ok_or_else(|| out_of_range(index))?;
            let category = form.category().ok_or_else(|| {
                ComposeError::Validation("no category selected".to_string())
            })?;
            (category, form.embed().url.clone())
        };

        if !defaults::is_store_listing_url(&url, category) {
            return Err(ComposeError::StoreMismatch { category, url });
        }

        self.list.set_scraping(index, true);
        let outcome = match self.scrapers.iter().find(|s| s.category() == category) {
            Some(scraper) => {
                info!("Scraping {} for embed {index}", scraper.config().name);
                scraper.fetch_listing(&url).await
            }
            None => Err(ComposeError::StoreMismatch {
                category,
                url: url.clone(),
            }),
        };
        self.list.set_scraping(index, false);

        let result = outcome?;
        self.apply_scrape(index, &result)
    }

    /// Validates every embed and builds the outbound payload. Dates go out
    /// in display form; stored values are never mutated.
    pub fn outbound_request(&self) -> Result<EmbedRequest, ComposeError> {
        for (position, form) in self.list.items().iter().enumerate() {
            form.validate().map_err(|error| {
                if self.list.len() > 1
                    && let ComposeError::Validation(message) = &error
                {
                    ComposeError::Validation(format!("embed {position}: {message}"))
                } else {
                    error
                }
            })?;
        }

        let mut embeds: Vec<EmbedConfig> = self
            .list
            .items()
            .iter()
            .map(|form| normalize::normalized_for_output(form.embed()))
            .collect();

        Ok(if embeds.len() == 1 {
            EmbedRequest::Single {
                embed: embeds.remove(0),
            }
        } else {
            EmbedRequest::Multiple { embeds }
        })
    }

    /// Validates and delivers the composed embeds to the backend
    pub async fn submit(&self, token: &str) -> Result<(), ComposeError> {
        let request = self.outbound_request()?;
        self.backend.send_embed(&request, token).await
    }

    /// Shareable legacy-shaped payload for the embed at `index`; the caller
    /// owns getting it onto the clipboard.
    pub fn export_bulk(&self, index: usize) -> Result<BulkExport, ComposeError> {
        let form = self.list.get(index).ok_or_else(|| out_of_range(index))?;
        let category = form.category().ok_or_else(|| {
            ComposeError::Validation("no category selected".to_string())
        })?;
        Ok(merge::export_bulk_payload(form.embed(), category))
    }
}

fn out_of_range(index: usize) -> ComposeError {
    ComposeError::Validation(format!("no embed at position {index}"))
}

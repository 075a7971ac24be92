//! Data models for embed composition and backend payloads

use serde::{Deserialize, Serialize};

/// Store category behind an embed, driving defaults and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Unity,
    Fab,
    Custom,
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unity" => Some(Self::Unity),
            "fab" => Some(Self::Fab),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unity => "unity",
            Self::Fab => "fab",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value field inside an embed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Footer line of an embed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Thumbnail or full-size image of an embed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMedia {
    pub url: String,
}

/// One composed embed message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub title: String,
    pub color: u32,
    pub url: String,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub thumbnail: EmbedMedia,
    pub image: EmbedMedia,
}

/// Partial listing data pulled from a store page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeResult {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub promo_code: Option<String>,
}

impl ScrapeResult {
    /// True when the listing yielded nothing usable
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.image_url.is_none() && self.price.is_none()
    }
}

/// Outbound backend payload: a single embed or the whole list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EmbedRequest {
    Single { embed: EmbedConfig },
    Multiple { embeds: Vec<EmbedConfig> },
}

/// Shareable legacy-shaped payload built from a composed embed, with empty
/// values left out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkExport {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

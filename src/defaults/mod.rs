//! Per-category embed defaults and store URL rules

use chrono::{Datelike, Utc};
use url::Url;

use crate::models::{Category, EmbedConfig, EmbedField, EmbedFooter, EmbedMedia};

pub const UNITY_THUMBNAIL_URL: &str = "https://cdn.discordapp.com/app-icons/1454213455593865428/4564252e658bed263baf2d8e8287beea.png?size=256";
pub const FAB_THUMBNAIL_URL: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQIxGKI2LmHlk9g-1u7nJLElU-3OyKP75wi5Q&s";

pub const UNITY_ACCENT_COLOR: u32 = 0xFF_FFFF;
pub const FAB_ACCENT_COLOR: u32 = 0x8A_2BE2;

fn default_footer() -> EmbedFooter {
    EmbedFooter {
        text: format!("GameDev Sales Bot © {}", Utc::now().year()),
    }
}

// Preu / Fi / Codi: price, end date and promo code slots every embed starts
// with. The normalization pipeline finds them by name.
fn field_skeleton() -> Vec<EmbedField> {
    ["Preu", "Fi", "Codi"]
        .into_iter()
        .map(|name| EmbedField {
            name: name.to_string(),
            value: String::new(),
            inline: true,
        })
        .collect()
}

/// Canonical blank embed for a category. Every call returns an independent
/// copy; callers are free to mutate the result.
pub fn defaults_for(category: Category) -> EmbedConfig {
    let (color, thumbnail_url) = match category {
        Category::Unity => (UNITY_ACCENT_COLOR, UNITY_THUMBNAIL_URL.to_string()),
        Category::Fab => (FAB_ACCENT_COLOR, FAB_THUMBNAIL_URL.to_string()),
        Category::Custom => (0, String::new()),
    };

    EmbedConfig {
        category: Some(category),
        title: String::new(),
        color,
        url: String::new(),
        fields: field_skeleton(),
        footer: default_footer(),
        thumbnail: EmbedMedia { url: thumbnail_url },
        image: EmbedMedia { url: String::new() },
    }
}

/// Hosts a category's embed URL must live on; empty means unrestricted
pub fn allowed_hosts(category: Category) -> &'static [&'static str] {
    match category {
        Category::Unity => &["assetstore.unity.com"],
        Category::Fab => &["fab.com", "www.fab.com"],
        Category::Custom => &[],
    }
}

/// Whether the URL belongs to the category's store
pub fn is_store_url(raw_url: &str, category: Category) -> bool {
    let hosts = allowed_hosts(category);
    if hosts.is_empty() {
        return false;
    }
    match Url::parse(raw_url) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| hosts.contains(&host)),
        Err(_) => false,
    }
}

/// Whether the URL points at an individual listing that can be scraped
pub fn is_store_listing_url(raw_url: &str, category: Category) -> bool {
    let Ok(parsed) = Url::parse(raw_url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    match category {
        Category::Unity => host == "assetstore.unity.com" && parsed.path().starts_with("/packages/"),
        Category::Fab => {
            (host == "fab.com" || host == "www.fab.com") && parsed.path().starts_with("/listings/")
        }
        Category::Custom => false,
    }
}

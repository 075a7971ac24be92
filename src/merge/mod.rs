//! Bulk payload extraction and the merge rules for overlapping data sources.
//!
//! A pasted payload can carry an embed-shaped object under `embed`, a full
//! replacement list under `embeds`, and a handful of legacy top-level
//! aliases (`title`, `url`, `imageUrl`, `price`, `promoCode`, `category`).
//! Extraction is deliberately forgiving: anything with the wrong shape is
//! skipped rather than reported, and only a payload with nothing
//! recognizable at all is rejected.

use serde_json::Value;

use crate::error::ComposeError;
use crate::models::{BulkExport, Category, EmbedConfig, EmbedField};
use crate::normalize;

/// Embed-shaped half of a bulk payload. `None` means the key was absent,
/// which is distinct from an empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedPart {
    pub category: Option<Category>,
    pub title: Option<String>,
    pub color: Option<u32>,
    pub url: Option<String>,
    pub fields: Option<Vec<EmbedField>>,
    pub footer_text: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
}

impl EmbedPart {
    fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.title.is_none()
            && self.color.is_none()
            && self.url.is_none()
            && self.fields.is_none()
            && self.footer_text.is_none()
            && self.thumbnail_url.is_none()
            && self.image_url.is_none()
    }
}

/// Legacy top-level aliases of a bulk payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPart {
    pub category: Option<Category>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub promo_code: Option<String>,
}

impl AssetPart {
    fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.title.is_none()
            && self.url.is_none()
            && self.image_url.is_none()
            && self.price.is_none()
            && self.promo_code.is_none()
    }
}

/// A bulk payload split into its recognized parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPayload {
    pub embed: Option<EmbedPart>,
    pub embeds: Option<Vec<EmbedPart>>,
    pub asset: AssetPart,
}

impl ExtractedPayload {
    fn is_empty(&self) -> bool {
        self.embed.as_ref().is_none_or(EmbedPart::is_empty)
            && self.embeds.is_none()
            && self.asset.is_empty()
    }

    /// Category declared by the payload itself; the embed-shaped one wins
    pub fn declared_category(&self) -> Option<Category> {
        self.embed
            .as_ref()
            .and_then(|part| part.category)
            .or(self.asset.category)
    }
}

/// Parses bulk JSON text and splits it into recognized parts
pub fn parse_bulk(raw: &str) -> Result<ExtractedPayload, ComposeError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| ComposeError::Payload(format!("invalid JSON: {error}")))?;
    extract(&value)
}

/// Splits a raw JSON object into its recognized parts. Malformed sub-values
/// are silently dropped; a payload with no recognized key in either part is
/// rejected as a no-op.
pub fn extract(input: &Value) -> Result<ExtractedPayload, ComposeError> {
    let Some(object) = input.as_object() else {
        return Err(ComposeError::Payload("expected a JSON object".to_string()));
    };

    let payload = ExtractedPayload {
        embed: object.get("embed").and_then(Value::as_object).map(extract_embed_part),
        embeds: object.get("embeds").and_then(Value::as_array).map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(extract_embed_part)
                .collect()
        }),
        asset: AssetPart {
            category: object
                .get("category")
                .and_then(Value::as_str)
                .and_then(Category::parse),
            title: string_value(object.get("title")),
            url: string_value(object.get("url")),
            image_url: string_value(object.get("imageUrl")),
            price: stringish_value(object.get("price")),
            promo_code: string_value(object.get("promoCode")),
        },
    };

    if payload.is_empty() {
        return Err(ComposeError::Payload(
            "no recognized fields in payload".to_string(),
        ));
    }
    Ok(payload)
}

fn extract_embed_part(record: &serde_json::Map<String, Value>) -> EmbedPart {
    EmbedPart {
        category: record
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::parse),
        title: string_value(record.get("title")),
        color: color_value(record.get("color")),
        url: string_value(record.get("url")),
        fields: record.get("fields").and_then(Value::as_array).map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(extract_field)
                .collect()
        }),
        footer_text: record
            .get("footer")
            .and_then(Value::as_object)
            .and_then(|footer| string_value(footer.get("text"))),
        thumbnail_url: record
            .get("thumbnail")
            .and_then(Value::as_object)
            .and_then(|thumbnail| string_value(thumbnail.get("url"))),
        image_url: record
            .get("image")
            .and_then(Value::as_object)
            .and_then(|image| string_value(image.get("url"))),
    }
}

fn extract_field(record: &serde_json::Map<String, Value>) -> EmbedField {
    EmbedField {
        name: string_value(record.get("name")).unwrap_or_default(),
        value: stringish_value(record.get("value")).unwrap_or_default(),
        inline: record.get("inline").and_then(Value::as_bool).unwrap_or(true),
    }
}

fn string_value(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

// Accepts a string or a bare number, the way `price` and field values arrive
// from older payload producers.
fn stringish_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

// A color survives extraction only when it parses and fits in 24 bits.
fn color_value(value: Option<&Value>) -> Option<u32> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(parsed).ok().filter(|color| *color <= 0xFF_FFFF)
}

/// Merges extracted parts into a copy of `base`. Embed-shaped values win
/// over the legacy aliases targeting the same logical field; a legacy alias
/// applies only when its embed-shaped counterpart is absent.
pub fn merge(base: &EmbedConfig, embed: Option<&EmbedPart>, asset: &AssetPart) -> EmbedConfig {
    let mut merged = base.clone();
    let part = embed.cloned().unwrap_or_default();

    if let Some(category) = part.category.or(asset.category) {
        merged.category = Some(category);
    }
    if let Some(title) = part.title.or_else(|| asset.title.clone()) {
        merged.title = title;
    }
    if let Some(color) = part.color {
        merged.color = color;
    }
    if let Some(url) = part.url.or_else(|| asset.url.clone()) {
        merged.url = url;
    }
    if let Some(text) = part.footer_text {
        merged.footer.text = text;
    }
    if let Some(url) = part.thumbnail_url {
        merged.thumbnail.url = url;
    }
    if let Some(url) = part.image_url.or_else(|| asset.image_url.clone()) {
        merged.image.url = url;
    }

    match part.fields {
        Some(fields) => {
            // A replaced field array is the embed-shaped value for the
            // price/date/promo slots, so the legacy aliases stand down.
            merged.fields = fields;
            normalize::canonicalize_dates(&mut merged.fields);
        }
        None => {
            if let Some(price) = &asset.price {
                normalize::apply_price(&mut merged.fields, price);
            }
            if let Some(code) = &asset.promo_code {
                normalize::apply_promo(&mut merged.fields, code);
            }
        }
    }

    merged
}

/// Inverse of bulk import: the shareable legacy-shaped payload for an embed
pub fn export_bulk_payload(embed: &EmbedConfig, category: Category) -> BulkExport {
    BulkExport {
        category,
        title: (!embed.title.is_empty()).then(|| embed.title.clone()),
        url: (!embed.url.is_empty()).then(|| embed.url.clone()),
        image_url: (!embed.image.url.is_empty()).then(|| embed.image.url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::defaults_for;
    use serde_json::json;

    #[test]
    fn empty_object_is_rejected() {
        let error = extract(&json!({})).unwrap_err();
        assert!(matches!(error, ComposeError::Payload(_)));
    }

    #[test]
    fn unrecognized_keys_only_is_rejected() {
        let error = extract(&json!({"unknown": 1, "embed": {"bogus": true}})).unwrap_err();
        assert!(matches!(error, ComposeError::Payload(_)));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(extract(&json!([1, 2])).is_err());
        assert!(parse_bulk("not json").is_err());
    }

    #[test]
    fn legacy_aliases_are_extracted() {
        let payload = extract(&json!({
            "category": "unity",
            "title": "Widget",
            "url": "https://assetstore.unity.com/packages/tools/widget",
            "imageUrl": "https://example.com/banner.png",
            "price": 19.99,
            "promoCode": "SAVE20"
        }))
        .unwrap();

        assert_eq!(payload.asset.category, Some(Category::Unity));
        assert_eq!(payload.asset.title.as_deref(), Some("Widget"));
        assert_eq!(payload.asset.price.as_deref(), Some("19.99"));
        assert_eq!(payload.asset.promo_code.as_deref(), Some("SAVE20"));
        assert!(payload.embed.is_none());
    }

    #[test]
    fn malformed_sub_values_are_dropped_silently() {
        let payload = extract(&json!({
            "title": 42,
            "embed": {
                "title": "Kept",
                "color": "not a number",
                "fields": [{"name": "Preu"}, "bogus", {"value": 5, "inline": "yes"}],
                "footer": "not an object",
                "thumbnail": {"url": 7}
            }
        }))
        .unwrap();

        assert_eq!(payload.asset.title, None);
        let part = payload.embed.unwrap();
        assert_eq!(part.title.as_deref(), Some("Kept"));
        assert_eq!(part.color, None);
        assert_eq!(part.footer_text, None);
        assert_eq!(part.thumbnail_url, None);

        let fields = part.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], EmbedField { name: "Preu".into(), value: String::new(), inline: true });
        assert_eq!(fields[1], EmbedField { name: String::new(), value: "5".into(), inline: true });
    }

    #[test]
    fn color_accepts_numbers_and_numeric_strings() {
        assert_eq!(color_value(Some(&json!(0x8A2BE2))), Some(0x8A2BE2));
        assert_eq!(color_value(Some(&json!("3447003"))), Some(3_447_003));
        assert_eq!(color_value(Some(&json!("  123  "))), Some(123));
        assert_eq!(color_value(Some(&json!("#ffffff"))), None);
        assert_eq!(color_value(Some(&json!(-5))), None);
        assert_eq!(color_value(Some(&json!(0x1_000_000))), None);
        assert_eq!(color_value(None), None);
    }

    #[test]
    fn embed_value_wins_over_legacy_alias() {
        let payload = extract(&json!({
            "title": "A",
            "embed": {"title": "B"}
        }))
        .unwrap();

        let merged = merge(
            &defaults_for(Category::Unity),
            payload.embed.as_ref(),
            &payload.asset,
        );
        assert_eq!(merged.title, "B");
    }

    #[test]
    fn legacy_alias_applies_when_embed_value_is_absent() {
        let payload = extract(&json!({
            "title": "A",
            "imageUrl": "https://example.com/a.png",
            "embed": {"url": "https://assetstore.unity.com/packages/x"}
        }))
        .unwrap();

        let merged = merge(
            &defaults_for(Category::Unity),
            payload.embed.as_ref(),
            &payload.asset,
        );
        assert_eq!(merged.title, "A");
        assert_eq!(merged.image.url, "https://example.com/a.png");
        assert_eq!(merged.url, "https://assetstore.unity.com/packages/x");
    }

    #[test]
    fn empty_string_in_embed_still_wins() {
        let payload = extract(&json!({
            "title": "A",
            "embed": {"title": ""}
        }))
        .unwrap();

        let merged = merge(
            &defaults_for(Category::Unity),
            payload.embed.as_ref(),
            &payload.asset,
        );
        assert_eq!(merged.title, "");
    }

    #[test]
    fn legacy_price_lands_in_the_price_field() {
        let payload = extract(&json!({"price": "$19.99"})).unwrap();
        let merged = merge(&defaults_for(Category::Unity), None, &payload.asset);

        let price = merged.fields.iter().find(|f| f.name == "Preu").unwrap();
        assert_eq!(price.value, "~~€19.99~~ **GRATIS**");
    }

    #[test]
    fn replaced_fields_block_legacy_price() {
        let payload = extract(&json!({
            "price": "$19.99",
            "embed": {"fields": [{"name": "Preu", "value": "kept", "inline": true}]}
        }))
        .unwrap();

        let merged = merge(
            &defaults_for(Category::Unity),
            payload.embed.as_ref(),
            &payload.asset,
        );
        assert_eq!(merged.fields[0].value, "kept");
    }

    #[test]
    fn imported_dates_are_stored_canonically() {
        let payload = extract(&json!({
            "embed": {"fields": [{"name": "Fi", "value": "07/08/2026", "inline": true}]}
        }))
        .unwrap();

        let merged = merge(
            &defaults_for(Category::Unity),
            payload.embed.as_ref(),
            &payload.asset,
        );
        assert_eq!(merged.fields[0].value, "2026-08-07");
    }

    #[test]
    fn export_omits_empty_values() {
        let mut embed = defaults_for(Category::Fab);
        embed.title = "Sale".to_string();

        let export = export_bulk_payload(&embed, Category::Fab);
        assert_eq!(export.title.as_deref(), Some("Sale"));
        assert_eq!(export.url, None);
        assert_eq!(export.image_url, None);

        let text = serde_json::to_string(&export).unwrap();
        assert!(text.contains("\"category\":\"fab\""));
        assert!(!text.contains("imageUrl"));
    }
}

//! Field value normalization: reserved-name matching plus the date, price
//! and promo rewrites.
//!
//! Fields are matched by their display label, not by position. The reserved
//! names are compared trimmed, case- and diacritic-insensitively, and the
//! first match in array order wins. A field renamed away from its reserved
//! name simply stops being normalized.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{EmbedConfig, EmbedField};

const PRICE_TOKENS: &[&str] = &["preu"];
const DATE_TOKENS: &[&str] = &["fi"];
const PROMO_TOKENS: &[&str] = &["codi", "codigo", "code"];

/// Appended after the struck-through price at merge time
pub const PRICE_SUFFIX: &str = "**GRATIS**";

static STORAGE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static DISPLAY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap());

fn fold_name(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ä' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn find_field<'a>(fields: &'a mut [EmbedField], tokens: &[&str]) -> Option<&'a mut EmbedField> {
    fields
        .iter_mut()
        .find(|field| tokens.contains(&fold_name(&field.name).as_str()))
}

/// `YYYY-MM-DD` becomes `DD/MM/YYYY`; anything else passes through unchanged
pub fn date_to_display(value: &str) -> String {
    match STORAGE_DATE.captures(value) {
        Some(caps) => format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]),
        None => value.to_string(),
    }
}

/// `DD/MM/YYYY` becomes `YYYY-MM-DD`; anything else passes through unchanged
pub fn date_to_storage(value: &str) -> String {
    match DISPLAY_DATE.captures(value) {
        Some(caps) => format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]),
        None => value.to_string(),
    }
}

/// One-shot price rewrite applied at merge time: currency symbol stripped,
/// re-prefixed with `€` and struck through. Blank input leaves the field
/// untouched, and a missing price field skips the rewrite entirely.
pub fn apply_price(fields: &mut [EmbedField], raw_price: &str) {
    let amount = raw_price.trim().trim_matches(['$', '€', '£']).trim();
    if amount.is_empty() {
        return;
    }
    if let Some(field) = find_field(fields, PRICE_TOKENS) {
        field.value = format!("~~€{amount}~~ {PRICE_SUFFIX}");
    }
}

/// Trims and stores a promo code verbatim; blank input is a no-op
pub fn apply_promo(fields: &mut [EmbedField], raw_code: &str) {
    let code = raw_code.trim();
    if code.is_empty() {
        return;
    }
    if let Some(field) = find_field(fields, PROMO_TOKENS) {
        field.value = code.to_string();
    }
}

/// Bulk-imported dates arrive in display form; store them canonically
pub(crate) fn canonicalize_dates(fields: &mut [EmbedField]) {
    if let Some(field) = find_field(fields, DATE_TOKENS) {
        field.value = date_to_storage(&field.value);
    }
}

/// Derived copy for preview and outbound payloads: the stored date goes out
/// in display form, everything else passes through as stored.
pub fn normalized_for_output(embed: &EmbedConfig) -> EmbedConfig {
    let mut out = embed.clone();
    if let Some(field) = find_field(&mut out.fields, DATE_TOKENS) {
        field.value = date_to_display(&field.value);
    }
    out
}

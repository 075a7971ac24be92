//! Per-embed form state: category transitions, dirty tracking and
//! category-driven validation.
//!
//! A category switch never patches fields in place. The whole embed is
//! rebuilt from that category's defaults, and the validator set plus the
//! thumbnail editability are recomputed from the new category. Unsaved edits
//! gate the switch behind an explicit confirmation.

use crate::defaults;
use crate::error::ComposeError;
use crate::merge::{self, ExtractedPayload};
use crate::models::{Category, EmbedConfig, EmbedField, ScrapeResult};
use crate::normalize;

const SWITCH_PROMPT: &str = "Switching the category resets the embed. Continue?";

/// Synchronous yes/no decision point for destructive transitions
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Gate that approves everything; for non-interactive drivers
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// URL rules in force for a category. Rebuilt on every transition rather
/// than patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRules {
    pub required: bool,
    pub allowed_hosts: &'static [&'static str],
}

pub fn url_rules(category: Category) -> UrlRules {
    UrlRules {
        required: true,
        allowed_hosts: defaults::allowed_hosts(category),
    }
}

/// One embed under composition, with its unsaved-edits marker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedForm {
    embed: EmbedConfig,
    dirty: bool,
}

impl EmbedForm {
    /// Blank form with no category selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Form seeded from a category's defaults
    pub fn from_category(category: Category) -> Self {
        Self {
            embed: defaults::defaults_for(category),
            dirty: false,
        }
    }

    pub(crate) fn from_embed(embed: EmbedConfig) -> Self {
        Self { embed, dirty: true }
    }

    pub fn embed(&self) -> &EmbedConfig {
        &self.embed
    }

    pub fn category(&self) -> Option<Category> {
        self.embed.category
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Thumbnail is operator-editable only for custom embeds; otherwise it
    /// is derived from the category.
    pub fn is_thumbnail_editable(&self) -> bool {
        self.embed.category == Some(Category::Custom)
    }

    /// Switches the category. Same category is a no-op; a dirty form asks
    /// the gate first, and declining leaves everything untouched. On a
    /// confirmed switch the embed is fully replaced by the new category's
    /// defaults. Returns whether the switch happened.
    pub fn select(&mut self, category: Category, gate: &dyn ConfirmGate) -> bool {
        if self.embed.category == Some(category) {
            return false;
        }
        if self.dirty && !gate.confirm(SWITCH_PROMPT) {
            return false;
        }
        self.embed = defaults::defaults_for(category);
        self.dirty = false;
        true
    }

    pub fn set_title(&mut self, title: &str) {
        self.embed.title = title.to_string();
        self.dirty = true;
    }

    pub fn set_url(&mut self, url: &str) {
        self.embed.url = url.to_string();
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: u32) -> Result<(), ComposeError> {
        if color > 0xFF_FFFF {
            return Err(ComposeError::Validation(
                "color must fit in 24 bits".to_string(),
            ));
        }
        self.embed.color = color;
        self.dirty = true;
        Ok(())
    }

    pub fn set_footer_text(&mut self, text: &str) {
        self.embed.footer.text = text.to_string();
        self.dirty = true;
    }

    pub fn set_image_url(&mut self, url: &str) {
        self.embed.image.url = url.to_string();
        self.dirty = true;
    }

    pub fn set_thumbnail_url(&mut self, url: &str) -> Result<(), ComposeError> {
        if !self.is_thumbnail_editable() {
            return Err(ComposeError::Validation(
                "thumbnail is derived from the selected category".to_string(),
            ));
        }
        self.embed.thumbnail.url = url.to_string();
        self.dirty = true;
        Ok(())
    }

    pub fn add_field(&mut self) {
        self.embed.fields.push(EmbedField {
            name: String::new(),
            value: String::new(),
            inline: false,
        });
        self.dirty = true;
    }

    pub fn remove_field(&mut self, index: usize) {
        if index < self.embed.fields.len() {
            self.embed.fields.remove(index);
            self.dirty = true;
        }
    }

    pub fn set_field(&mut self, index: usize, name: &str, value: &str, inline: bool) {
        if let Some(field) = self.embed.fields.get_mut(index) {
            field.name = name.to_string();
            field.value = value.to_string();
            field.inline = inline;
            self.dirty = true;
        }
    }

    /// Folds a scrape result into the embed. An empty result is rejected
    /// and changes nothing.
    pub fn apply_scrape(&mut self, result: &ScrapeResult) -> Result<(), ComposeError> {
        if result.is_empty() {
            return Err(ComposeError::NoData);
        }
        if let Some(title) = &result.title {
            self.embed.title = title.clone();
        }
        if let Some(image_url) = &result.image_url {
            self.embed.image.url = image_url.clone();
        }
        if let Some(price) = &result.price {
            normalize::apply_price(&mut self.embed.fields, price);
        }
        if let Some(code) = &result.promo_code {
            normalize::apply_promo(&mut self.embed.fields, code);
        }
        self.dirty = true;
        Ok(())
    }

    /// Applies an extracted single-embed bulk payload. A category change
    /// passes through the same gate as `select` and rebases the merge onto
    /// that category's defaults. Returns `Ok(false)` when the gate declined.
    pub fn apply_bulk(
        &mut self,
        payload: &ExtractedPayload,
        gate: &dyn ConfirmGate,
    ) -> Result<bool, ComposeError> {
        let resolved = payload
            .declared_category()
            .or(self.embed.category)
            .ok_or_else(|| {
                ComposeError::Payload(
                    "payload declares no category and none is selected".to_string(),
                )
            })?;

        let base = if self.embed.category == Some(resolved) {
            self.embed.clone()
        } else {
            if self.dirty && !gate.confirm(SWITCH_PROMPT) {
                return Ok(false);
            }
            defaults::defaults_for(resolved)
        };

        self.embed = merge::merge(&base, payload.embed.as_ref(), &payload.asset);
        self.dirty = true;
        Ok(true)
    }

    /// Field-level checks for the selected category. Host mismatches get
    /// their own error so the caller can point at the URL field.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let embed = &self.embed;
        let Some(category) = embed.category else {
            return Err(ComposeError::Validation("no category selected".to_string()));
        };

        let mut problems = Vec::new();
        if embed.title.trim().is_empty() {
            problems.push("title is required".to_string());
        }
        if embed.color > 0xFF_FFFF {
            problems.push("color must fit in 24 bits".to_string());
        }

        let rules = url_rules(category);
        let url = embed.url.trim();
        if rules.required && url.is_empty() {
            problems.push("url is required".to_string());
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            problems.push("url must start with http:// or https://".to_string());
        }

        if !problems.is_empty() {
            return Err(ComposeError::Validation(problems.join("; ")));
        }

        if !rules.allowed_hosts.is_empty() && !defaults::is_store_url(url, category) {
            return Err(ComposeError::StoreMismatch {
                category,
                url: embed.url.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::parse_bulk;

    struct Deny;

    impl ConfirmGate for Deny {
        fn confirm(&self, _prompt: &str) -> bool {
            false
        }
    }

    struct Explode;

    impl ConfirmGate for Explode {
        fn confirm(&self, _prompt: &str) -> bool {
            panic!("gate must not be consulted on a clean form");
        }
    }

    #[test]
    fn selecting_same_category_is_a_noop() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.set_title("edited");

        assert!(!form.select(Category::Unity, &Deny));
        assert_eq!(form.embed().title, "edited");
    }

    #[test]
    fn clean_form_switches_without_asking() {
        let mut form = EmbedForm::from_category(Category::Unity);
        assert!(form.select(Category::Fab, &Explode));
        assert_eq!(form.category(), Some(Category::Fab));
        assert_eq!(form.embed().color, defaults::FAB_ACCENT_COLOR);
    }

    #[test]
    fn declined_switch_changes_nothing() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.set_title("precious work");
        let before = form.clone();

        assert!(!form.select(Category::Fab, &Deny));
        assert_eq!(form, before);
    }

    #[test]
    fn confirmed_switch_replaces_the_whole_embed() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.set_title("precious work");
        form.set_url("https://assetstore.unity.com/packages/x");

        assert!(form.select(Category::Fab, &AutoConfirm));
        assert_eq!(form.embed(), &defaults::defaults_for(Category::Fab));
        assert!(!form.is_dirty());
    }

    #[test]
    fn thumbnail_is_locked_outside_custom() {
        let mut form = EmbedForm::from_category(Category::Unity);
        assert!(!form.is_thumbnail_editable());
        assert!(form.set_thumbnail_url("https://example.com/t.png").is_err());
        assert_eq!(form.embed().thumbnail.url, defaults::UNITY_THUMBNAIL_URL);

        let mut form = EmbedForm::from_category(Category::Custom);
        assert!(form.is_thumbnail_editable());
        form.set_thumbnail_url("https://example.com/t.png").unwrap();
        assert_eq!(form.embed().thumbnail.url, "https://example.com/t.png");
    }

    #[test]
    fn scrape_with_no_data_is_rejected() {
        let mut form = EmbedForm::from_category(Category::Unity);
        let before = form.clone();

        let result = ScrapeResult {
            promo_code: Some("IGNORED".to_string()),
            ..ScrapeResult::default()
        };
        assert!(matches!(form.apply_scrape(&result), Err(ComposeError::NoData)));
        assert_eq!(form, before);
    }

    #[test]
    fn scrape_fills_title_image_and_price() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.apply_scrape(&ScrapeResult {
            title: Some("Widget".to_string()),
            image_url: Some("https://example.com/w.png".to_string()),
            price: Some("$9.99".to_string()),
            promo_code: None,
        })
        .unwrap();

        assert_eq!(form.embed().title, "Widget");
        assert_eq!(form.embed().image.url, "https://example.com/w.png");
        let price = form.embed().fields.iter().find(|f| f.name == "Preu").unwrap();
        assert_eq!(price.value, "~~€9.99~~ **GRATIS**");
        assert!(form.is_dirty());
    }

    #[test]
    fn bulk_without_any_category_is_rejected() {
        let mut form = EmbedForm::new();
        let payload = parse_bulk(r#"{"title": "Widget"}"#).unwrap();

        let error = form.apply_bulk(&payload, &AutoConfirm).unwrap_err();
        assert!(matches!(error, ComposeError::Payload(_)));
        assert_eq!(form, EmbedForm::new());
    }

    #[test]
    fn bulk_category_change_rebases_onto_defaults() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.set_title("will be reset");

        let payload = parse_bulk(r#"{"category": "fab", "title": "Fab sale"}"#).unwrap();
        assert!(form.apply_bulk(&payload, &AutoConfirm).unwrap());

        assert_eq!(form.category(), Some(Category::Fab));
        assert_eq!(form.embed().title, "Fab sale");
        assert_eq!(form.embed().thumbnail.url, defaults::FAB_THUMBNAIL_URL);
    }

    #[test]
    fn bulk_category_change_declined_changes_nothing() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.set_title("precious work");
        let before = form.clone();

        let payload = parse_bulk(r#"{"category": "fab", "title": "Fab sale"}"#).unwrap();
        assert!(!form.apply_bulk(&payload, &Deny).unwrap());
        assert_eq!(form, before);
    }

    #[test]
    fn validation_reports_field_problems() {
        let form = EmbedForm::from_category(Category::Unity);
        let error = form.validate().unwrap_err();
        let ComposeError::Validation(message) = error else {
            panic!("expected a validation error");
        };
        assert!(message.contains("title is required"));
        assert!(message.contains("url is required"));
    }

    #[test]
    fn validation_flags_foreign_store_urls() {
        let mut form = EmbedForm::from_category(Category::Unity);
        form.set_title("Widget");
        form.set_url("https://example.com/not-the-store");

        assert!(matches!(
            form.validate(),
            Err(ComposeError::StoreMismatch { category: Category::Unity, .. })
        ));
    }

    #[test]
    fn custom_category_skips_the_host_check() {
        let mut form = EmbedForm::from_category(Category::Custom);
        form.set_title("Anything");
        form.set_url("https://example.com/deal");

        assert!(form.validate().is_ok());
    }
}

//! Multi-embed list lifecycle: ordering, single-open expansion and the
//! advisory per-index scrape markers.

use std::collections::HashSet;

use crate::error::ComposeError;
use crate::form::EmbedForm;
use crate::models::Category;

/// Ordered embeds under composition. Never drops below one item.
#[derive(Debug)]
pub struct EmbedList {
    items: Vec<EmbedForm>,
    scraping: HashSet<usize>,
    expanded: Option<usize>,
}

impl Default for EmbedList {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbedList {
    /// Single blank item, expanded
    pub fn new() -> Self {
        Self {
            items: vec![EmbedForm::new()],
            scraping: HashSet::new(),
            expanded: Some(0),
        }
    }

    /// Single item seeded from a category's defaults, expanded
    pub fn from_category(category: Category) -> Self {
        Self {
            items: vec![EmbedForm::from_category(category)],
            scraping: HashSet::new(),
            expanded: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[EmbedForm] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&EmbedForm> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut EmbedForm> {
        self.items.get_mut(index)
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn first_category(&self) -> Option<Category> {
        self.items.first().and_then(EmbedForm::category)
    }

    /// Appends an item seeded from the first item's category defaults (blank
    /// when none is selected) and expands it.
    pub fn add(&mut self) {
        let seeded = match self.first_category() {
            Some(category) => EmbedForm::from_category(category),
            None => EmbedForm::new(),
        };
        self.items.push(seeded);
        self.expanded = Some(self.items.len() - 1);
    }

    /// Removes an item. Rejected when it would leave the list empty. Any
    /// removal clears every pending scrape marker and re-clamps the
    /// expanded index into the new range.
    pub fn remove(&mut self, index: usize) -> Result<(), ComposeError> {
        if self.items.len() <= 1 {
            return Err(ComposeError::Validation(
                "at least one embed is required".to_string(),
            ));
        }
        if index >= self.items.len() {
            return Err(ComposeError::Validation(format!(
                "no embed at position {index}"
            )));
        }
        self.items.remove(index);
        self.scraping.clear();
        self.expanded = self.expanded.map(|current| current.min(self.items.len() - 1));
        Ok(())
    }

    /// Single-open accordion: expanding one index collapses the rest, and
    /// toggling the open one collapses everything.
    pub fn toggle_expanded(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Advisory in-flight marker for one index. Independent markers keep
    /// concurrent scrapes on different items from interfering.
    pub fn set_scraping(&mut self, index: usize, in_flight: bool) {
        if in_flight {
            self.scraping.insert(index);
        } else {
            self.scraping.remove(&index);
        }
    }

    pub fn is_scraping(&self, index: usize) -> bool {
        self.scraping.contains(&index)
    }

    /// Atomically replaces the whole list, as a bulk `embeds` payload does
    pub(crate) fn replace(&mut self, items: Vec<EmbedForm>) -> Result<(), ComposeError> {
        if items.is_empty() {
            return Err(ComposeError::Payload(
                "embeds list cannot be empty".to_string(),
            ));
        }
        self.items = items;
        self.scraping.clear();
        self.expanded = Some(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_below_one_item_is_rejected() {
        let mut list = EmbedList::new();
        assert!(list.remove(0).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_then_remove_clamps_expansion() {
        let mut list = EmbedList::from_category(Category::Unity);
        list.add();
        assert_eq!(list.len(), 2);
        assert_eq!(list.expanded(), Some(1));

        list.remove(0).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.expanded(), Some(0));
    }

    #[test]
    fn added_items_inherit_the_first_category() {
        let mut list = EmbedList::from_category(Category::Fab);
        list.add();
        assert_eq!(list.get(1).unwrap().category(), Some(Category::Fab));

        let mut blank = EmbedList::new();
        blank.add();
        assert_eq!(blank.get(1).unwrap().category(), None);
    }

    #[test]
    fn accordion_keeps_a_single_index_open() {
        let mut list = EmbedList::new();
        list.add();
        list.add();

        list.toggle_expanded(1);
        assert_eq!(list.expanded(), Some(1));
        list.toggle_expanded(0);
        assert_eq!(list.expanded(), Some(0));
        list.toggle_expanded(0);
        assert_eq!(list.expanded(), None);
        list.toggle_expanded(9);
        assert_eq!(list.expanded(), None);
    }

    #[test]
    fn scrape_markers_are_independent_per_index() {
        let mut list = EmbedList::new();
        list.add();

        list.set_scraping(0, true);
        list.set_scraping(1, true);
        list.set_scraping(0, false);
        assert!(!list.is_scraping(0));
        assert!(list.is_scraping(1));
    }

    #[test]
    fn any_removal_clears_all_scrape_markers() {
        let mut list = EmbedList::new();
        list.add();
        list.add();
        list.set_scraping(0, true);
        list.set_scraping(2, true);

        list.remove(1).unwrap();
        assert!(!list.is_scraping(0));
        assert!(!list.is_scraping(2));
    }
}

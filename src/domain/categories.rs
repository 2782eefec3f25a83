//! Categories and the per-screen selection set built on top of them.

use std::collections::HashSet;

use postdesk_api_types::{CategoryRef, CategoryResponse};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl From<CategoryResponse> for Category {
    fn from(value: CategoryResponse) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<CategoryRef> for Category {
    fn from(value: CategoryRef) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectableCategory {
    pub id: String,
    pub name: String,
    pub is_select: bool,
}

/// Checkbox state for one screen. The id list is fixed at construction and
/// only the `is_select` flags change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectableCategorySet {
    entries: Vec<SelectableCategory>,
}

impl SelectableCategorySet {
    pub fn initialize(categories: &[Category]) -> Self {
        let entries = categories
            .iter()
            .map(|category| SelectableCategory {
                id: category.id.clone(),
                name: category.name.clone(),
                is_select: false,
            })
            .collect();
        Self { entries }
    }

    /// Copy of this set where exactly the entries named in `selected` are checked.
    #[must_use]
    pub fn apply_selection(&self, selected: &HashSet<String>) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| SelectableCategory {
                is_select: selected.contains(&entry.id),
                ..entry.clone()
            })
            .collect();
        Self { entries }
    }

    /// Flip the entry with `id`. Returns `false` and leaves the set untouched
    /// when no entry matches.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_select = !entry.is_select;
                true
            }
            None => false,
        }
    }

    pub fn selected_ids(&self) -> HashSet<String> {
        self.selected().map(|entry| entry.id.clone()).collect()
    }

    /// Selected ids in display order, as sent in `categoryIds`.
    pub fn selected_in_order(&self) -> Vec<String> {
        self.selected().map(|entry| entry.id.clone()).collect()
    }

    pub fn entries(&self) -> &[SelectableCategory] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn selected(&self) -> impl Iterator<Item = &SelectableCategory> {
        self.entries.iter().filter(|entry| entry.is_select)
    }
}

//! Page-scoped multi-selection of marks

use crate::types::MarkId;

/// Ordered set of selected mark ids.
///
/// Only ever holds ids from the currently loaded page; the owning surface
/// clears or prunes it whenever the page or filter changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<MarkId>,
}

impl Selection {
    /// Empty selection
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Flip one id; returns whether it is now selected
    pub fn toggle(&mut self, id: MarkId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Select every id on the page, or none if they are all selected already
    pub fn toggle_all(&mut self, page_ids: &[MarkId]) {
        let all_selected = !page_ids.is_empty() && page_ids.iter().all(|id| self.ids.contains(id));
        self.ids.clear();
        if !all_selected {
            for &id in page_ids {
                if !self.ids.contains(&id) {
                    self.ids.push(id);
                }
            }
        }
    }

    /// Keep only ids matching the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(MarkId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether `id` is selected
    pub fn contains(&self, id: MarkId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> &[MarkId] {
        &self.ids
    }

    /// Number of selected ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Nothing selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Expanded/collapsed state of the items in a sheet.

use granja_core::{DomainError, DomainResult};

/// Which items are expanded. Starts all-collapsed.
///
/// Independent of the entry table: toggling never touches entry data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclosure {
    open: Vec<(&'static str, bool)>,
}

impl Disclosure {
    pub fn new(labels: &[&'static str]) -> Self {
        Self {
            open: labels.iter().map(|label| (*label, false)).collect(),
        }
    }

    /// Flip one item; returns its new state.
    pub fn toggle(&mut self, item: &str) -> DomainResult<bool> {
        let (_, open) = self
            .open
            .iter_mut()
            .find(|(label, _)| *label == item)
            .ok_or_else(|| DomainError::unknown_item(item))?;
        *open = !*open;
        tracing::debug!(item, open = *open, "disclosure toggled");
        Ok(*open)
    }

    /// Unknown items read as collapsed.
    pub fn is_open(&self, item: &str) -> bool {
        self.open
            .iter()
            .any(|(label, open)| *label == item && *open)
    }

    pub fn open_items(&self) -> Vec<&'static str> {
        self.open
            .iter()
            .filter(|(_, open)| *open)
            .map(|(label, _)| *label)
            .collect()
    }
}

//! Fixed-key entry table.

use granja_core::{DomainError, DomainResult, Quantity};

/// Mapping from a fixed, ordered list of item labels to their entries.
///
/// Labels are set at construction and never added or removed; only entries
/// mutate. Iteration follows declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryTable<E> {
    rows: Vec<(&'static str, E)>,
}

impl<E: Default> EntryTable<E> {
    /// Build a table with a default (blank) entry per label.
    pub fn new(labels: &[&'static str]) -> Self {
        Self {
            rows: labels.iter().map(|label| (*label, E::default())).collect(),
        }
    }
}

impl<E> EntryTable<E> {
    pub fn get(&self, item: &str) -> Option<&E> {
        self.rows
            .iter()
            .find(|(label, _)| *label == item)
            .map(|(_, entry)| entry)
    }

    /// Like [`EntryTable::get`], but an unknown label is an error.
    pub fn entry(&self, item: &str) -> DomainResult<&E> {
        self.get(item)
            .ok_or_else(|| DomainError::unknown_item(item))
    }

    pub(crate) fn entry_mut(&mut self, item: &str) -> DomainResult<&mut E> {
        self.rows
            .iter_mut()
            .find(|(label, _)| *label == item)
            .map(|(_, entry)| entry)
            .ok_or_else(|| DomainError::unknown_item(item))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &E)> + '_ {
        self.rows.iter().map(|(label, entry)| (*label, entry))
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rows.iter().map(|(label, _)| *label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum one text column, each cell coerced to a number.
    pub fn column_total<F>(&self, column: F) -> Quantity
    where
        F: Fn(&E) -> &str,
    {
        self.rows
            .iter()
            .map(|(_, entry)| Quantity::coerce(column(entry)))
            .sum()
    }
}

//! Operational section identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The operational section (the poultry house group) a capture belongs to.
///
/// Chosen upstream, before either sheet is opened, and stamped on every
/// persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section(String);

impl Section {
    /// Build a section from a label; surrounding whitespace is trimmed.
    pub fn new(label: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = label.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_section("section label cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Section {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

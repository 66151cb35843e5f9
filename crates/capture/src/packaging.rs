//! Packaging (envase) sheet: stock movements per packaging type.
//!
//! Final stock is derived as `initial + received - consumed` whenever one of
//! those three fields changes, but stays editable: a typed value is kept as an
//! override until the next source edit re-derives it (or, with
//! [`OverridePolicy::Preserve`], for good).

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use granja_core::{DomainResult, Quantity, Section, sanitize_numeric};

use crate::disclosure::Disclosure;
use crate::save::{SaveError, SaveMessages, SavePipeline, SaveReport, SaveState};
use crate::screen::{Navigator, Screen, ScreenHost};
use crate::section::SectionContext;
use crate::table::EntryTable;

/// Packaging types, in display order.
pub const PACKAGING_TYPES: [&str; 9] = [
    "CAJA TIPO A",
    "SEPARADOR TIPO A",
    "CAJA TIPO B",
    "SEPARADOR TIPO B",
    "CONO",
    "CONO 240 PZS",
    "CONO ESTRELLA",
    "CINTA",
    "CINTA BLANCA",
];

const SAVED: &str = "Datos de envase guardados correctamente.";
const NOTHING_TO_SAVE: &str = "Debes llenar al menos un envase antes de continuar.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagingField {
    ExistenciaInicial,
    Recibido,
    Consumo,
    ExistenciaFinal,
}

/// What happens to a typed final stock when a source field changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverridePolicy {
    /// Re-derive, discarding the typed value.
    #[default]
    Clobber,
    /// Keep the typed value until the user edits final stock again.
    Preserve,
}

/// Final stock text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", content = "value", rename_all = "lowercase")]
pub enum FinalStock {
    Derived(String),
    Overridden(String),
}

impl FinalStock {
    pub fn as_str(&self) -> &str {
        match self {
            FinalStock::Derived(value) | FinalStock::Overridden(value) => value,
        }
    }

    pub fn is_overridden(&self) -> bool {
        matches!(self, FinalStock::Overridden(_))
    }
}

impl Default for FinalStock {
    /// Nothing derived yet: an untouched item stays blank.
    fn default() -> Self {
        FinalStock::Derived(String::new())
    }
}

/// One packaging type's entry, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingEntry {
    pub existencia_inicial: String,
    pub recibido: String,
    pub consumo: String,
    pub existencia_final: FinalStock,
}

impl PackagingEntry {
    pub fn field(&self, field: PackagingField) -> &str {
        match field {
            PackagingField::ExistenciaInicial => &self.existencia_inicial,
            PackagingField::Recibido => &self.recibido,
            PackagingField::Consumo => &self.consumo,
            PackagingField::ExistenciaFinal => self.existencia_final.as_str(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.existencia_inicial.is_empty()
            && self.recibido.is_empty()
            && self.consumo.is_empty()
            && self.existencia_final.as_str().is_empty()
    }

    /// `initial + received - consumed`; may be negative.
    pub fn derived_final(&self) -> Quantity {
        Quantity::coerce(&self.existencia_inicial) + Quantity::coerce(&self.recibido)
            - Quantity::coerce(&self.consumo)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingTotals {
    pub existencia_inicial: Quantity,
    pub recibido: Quantity,
    pub consumo: Quantity,
    /// Sum of the stored final stock, overrides included.
    pub existencia_final: Quantity,
}

/// Row handed to the store for one packaging type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingRow {
    pub seccion: Option<Section>,
    pub fecha: NaiveDate,
    pub tipo: String,
    pub inicial: Quantity,
    pub recibido: Quantity,
    pub consumo: Quantity,
    #[serde(rename = "final")]
    pub final_stock: Quantity,
}

#[derive(Debug)]
pub struct PackagingSheet {
    table: EntryTable<PackagingEntry>,
    disclosure: Disclosure,
    section: SectionContext,
    policy: OverridePolicy,
    today: NaiveDate,
    pipeline: SavePipeline,
}

impl PackagingSheet {
    pub fn new(section: SectionContext) -> Self {
        Self {
            table: EntryTable::new(&PACKAGING_TYPES),
            disclosure: Disclosure::new(&PACKAGING_TYPES),
            section,
            policy: OverridePolicy::default(),
            today: Utc::now().date_naive(),
            pipeline: SavePipeline::default(),
        }
    }

    pub fn with_policy(mut self, policy: OverridePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pin the capture date instead of today's UTC date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Entering this screen with a section parameter selects that section
    /// for the rest of the session.
    pub fn enter(&mut self, param: Option<Section>) {
        if let Some(section) = param {
            self.section.set(section);
        }
    }

    pub fn table(&self) -> &EntryTable<PackagingEntry> {
        &self.table
    }

    pub fn disclosure(&self) -> &Disclosure {
        &self.disclosure
    }

    pub fn policy(&self) -> OverridePolicy {
        self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn save_state(&self) -> SaveState {
        self.pipeline.state()
    }

    /// Header line: `"<section> - <date>"`.
    pub fn subtitle(&self) -> String {
        let section = self.section.get().map(|s| s.to_string()).unwrap_or_default();
        format!("{section} - {}", self.today.format("%Y-%m-%d"))
    }

    pub fn toggle(&mut self, item: &str) -> DomainResult<bool> {
        self.disclosure.toggle(item)
    }

    /// Store one keystroke's worth of input, re-derive final stock when a
    /// source field changed, and return the fresh totals.
    pub fn edit(
        &mut self,
        item: &str,
        field: PackagingField,
        raw: &str,
    ) -> DomainResult<PackagingTotals> {
        let policy = self.policy;
        let entry = self.table.entry_mut(item)?;
        let value = sanitize_numeric(raw);

        match field {
            PackagingField::ExistenciaFinal => {
                entry.existencia_final = FinalStock::Overridden(value);
            }
            source => {
                match source {
                    PackagingField::ExistenciaInicial => entry.existencia_inicial = value,
                    PackagingField::Recibido => entry.recibido = value,
                    _ => entry.consumo = value,
                }
                let keep = policy == OverridePolicy::Preserve && entry.existencia_final.is_overridden();
                if !keep {
                    entry.existencia_final = FinalStock::Derived(entry.derived_final().render());
                }
            }
        }

        tracing::debug!(
            item,
            ?field,
            value = entry.field(field),
            existencia_final = entry.existencia_final.as_str(),
            "packaging entry edited"
        );
        Ok(self.totals())
    }

    pub fn totals(&self) -> PackagingTotals {
        PackagingTotals {
            existencia_inicial: self.table.column_total(|e| e.existencia_inicial.as_str()),
            recibido: self.table.column_total(|e| e.recibido.as_str()),
            consumo: self.table.column_total(|e| e.consumo.as_str()),
            existencia_final: self.table.column_total(|e| e.existencia_final.as_str()),
        }
    }

    /// Rows a save would write right now, in table order.
    ///
    /// `final` is the stored value, not a fresh derivation.
    pub fn pending_rows(&self) -> Vec<PackagingRow> {
        let seccion = self.section.get();
        self.table
            .iter()
            .filter(|(_, entry)| !entry.is_blank())
            .map(|(tipo, entry)| PackagingRow {
                seccion: seccion.clone(),
                fecha: self.today,
                tipo: tipo.to_string(),
                inicial: Quantity::coerce(&entry.existencia_inicial),
                recibido: Quantity::coerce(&entry.recibido),
                consumo: Quantity::coerce(&entry.consumo),
                final_stock: Quantity::coerce(entry.existencia_final.as_str()),
            })
            .collect()
    }

    /// Persist every filled packaging type, then return to the menu.
    ///
    /// Rejected without touching the store when every type is blank.
    pub async fn save(&mut self, host: &ScreenHost<'_>) -> Result<SaveReport, SaveError> {
        let rows = self.pending_rows();
        let messages = SaveMessages {
            success: SAVED,
            nothing_to_save: Some(NOTHING_TO_SAVE),
        };
        self.pipeline.run(rows, messages, host).await
    }

    pub fn back(&self, navigator: &dyn Navigator) {
        navigator.replace(Screen::Menu);
    }
}

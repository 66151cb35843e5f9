//! Feed (alimento) sheet: consumption per poultry house.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use granja_core::{DomainResult, Quantity, Section, sanitize_numeric};

use crate::disclosure::Disclosure;
use crate::save::{SaveError, SaveMessages, SavePipeline, SaveReport, SaveState};
use crate::screen::{Navigator, Screen, ScreenHost};
use crate::section::SectionContext;
use crate::table::EntryTable;

/// Poultry houses, in display order.
pub const FEED_HOUSES: [&str; 9] = [
    "CASETA 1", "CASETA 2", "CASETA 3", "CASETA 4", "CASETA 5", "CASETA 6", "CASETA 7",
    "CASETA 8", "CASETA 9",
];

const SAVED: &str = "Datos de alimento guardados correctamente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedField {
    ExistenciaInicial,
    Entrada,
    Consumo,
    /// Feed type; free text.
    Tipo,
}

/// One house's entry, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub existencia_inicial: String,
    pub entrada: String,
    pub consumo: String,
    pub tipo: String,
}

impl FeedEntry {
    pub fn field(&self, field: FeedField) -> &str {
        match field {
            FeedField::ExistenciaInicial => &self.existencia_inicial,
            FeedField::Entrada => &self.entrada,
            FeedField::Consumo => &self.consumo,
            FeedField::Tipo => &self.tipo,
        }
    }

    /// `"0"` counts as filled; only empty text is blank.
    pub fn is_blank(&self) -> bool {
        self.existencia_inicial.is_empty()
            && self.entrada.is_empty()
            && self.consumo.is_empty()
            && self.tipo.is_empty()
    }

    fn set(&mut self, field: FeedField, raw: &str) {
        match field {
            FeedField::ExistenciaInicial => self.existencia_inicial = sanitize_numeric(raw),
            FeedField::Entrada => self.entrada = sanitize_numeric(raw),
            FeedField::Consumo => self.consumo = sanitize_numeric(raw),
            FeedField::Tipo => self.tipo = raw.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedTotals {
    pub existencia_inicial: Quantity,
    pub entrada: Quantity,
    pub consumo: Quantity,
}

/// Row handed to the store for one house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRow {
    pub seccion: Option<Section>,
    pub fecha: NaiveDate,
    pub caseta: String,
    pub existencia_inicial: Quantity,
    pub entrada: Quantity,
    pub consumo: Quantity,
    pub tipo: String,
    /// Always empty; the store schema still has the column.
    pub edad: String,
}

#[derive(Debug)]
pub struct FeedSheet {
    table: EntryTable<FeedEntry>,
    disclosure: Disclosure,
    section: SectionContext,
    today: NaiveDate,
    pipeline: SavePipeline,
}

impl FeedSheet {
    pub fn new(section: SectionContext) -> Self {
        Self {
            table: EntryTable::new(&FEED_HOUSES),
            disclosure: Disclosure::new(&FEED_HOUSES),
            section,
            today: Utc::now().date_naive(),
            pipeline: SavePipeline::default(),
        }
    }

    /// Pin the capture date instead of today's UTC date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn table(&self) -> &EntryTable<FeedEntry> {
        &self.table
    }

    pub fn disclosure(&self) -> &Disclosure {
        &self.disclosure
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

    /// Store one keystroke's worth of input and return the fresh totals.
    ///
    /// Numeric fields keep only digits and `.`; the feed type is stored as is.
    pub fn edit(&mut self, item: &str, field: FeedField, raw: &str) -> DomainResult<FeedTotals> {
        let entry = self.table.entry_mut(item)?;
        entry.set(field, raw);
        tracing::debug!(item, ?field, value = entry.field(field), "feed entry edited");
        Ok(self.totals())
    }

    pub fn totals(&self) -> FeedTotals {
        FeedTotals {
            existencia_inicial: self.table.column_total(|e| e.existencia_inicial.as_str()),
            entrada: self.table.column_total(|e| e.entrada.as_str()),
            consumo: self.table.column_total(|e| e.consumo.as_str()),
        }
    }

    /// Rows a save would write right now, in table order.
    pub fn pending_rows(&self) -> Vec<FeedRow> {
        let seccion = self.section.get();
        self.table
            .iter()
            .filter(|(_, entry)| !entry.is_blank())
            .map(|(caseta, entry)| FeedRow {
                seccion: seccion.clone(),
                fecha: self.today,
                caseta: caseta.to_string(),
                existencia_inicial: Quantity::coerce(&entry.existencia_inicial),
                entrada: Quantity::coerce(&entry.entrada),
                consumo: Quantity::coerce(&entry.consumo),
                tipo: entry.tipo.clone(),
                edad: String::new(),
            })
            .collect()
    }

    /// Persist every filled house, then return to the menu.
    ///
    /// An all-empty sheet is not an error here: nothing is written and the
    /// save still succeeds. On failure the table is left as it was.
    pub async fn save(&mut self, host: &ScreenHost<'_>) -> Result<SaveReport, SaveError> {
        let rows = self.pending_rows();
        let messages = SaveMessages {
            success: SAVED,
            nothing_to_save: None,
        };
        self.pipeline.run(rows, messages, host).await
    }

    pub fn back(&self, navigator: &dyn Navigator) {
        navigator.replace(Screen::Menu);
    }
}

//! Save pipeline: validate, persist one row per filled item, report.
//!
//! `Idle → Validating → Persisting → Succeeded | Failed`. Rows are written
//! strictly in table order and each insert is awaited before the next one is
//! issued; the first failing insert aborts the rest. Rows already written are
//! not rolled back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use granja_core::DomainError;

use crate::screen::{Notice, SAVE_FAILED, Screen, ScreenHost};
use crate::store::{PersistRow, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    #[default]
    Idle,
    Validating,
    Persisting,
    Succeeded,
    Failed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// No item has any data and the sheet requires at least one.
    #[error("nothing to save: {0}")]
    NothingToSave(#[source] DomainError),

    /// An insert failed; `written` rows before it were persisted.
    #[error("failed to persist {item} after {written} row(s)")]
    Store {
        item: String,
        written: usize,
        #[source]
        source: StoreError,
    },
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Item labels persisted, in write order.
    pub items: Vec<String>,
}

impl SaveReport {
    pub fn rows_written(&self) -> usize {
        self.items.len()
    }
}

/// Texts and guard that differ between sheets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SaveMessages {
    pub success: &'static str,
    /// When set, an empty save is rejected with this message.
    pub nothing_to_save: Option<&'static str>,
}

#[derive(Debug, Default)]
pub struct SavePipeline {
    state: SaveState,
}

impl SavePipeline {
    pub fn state(&self) -> SaveState {
        self.state
    }

    pub(crate) async fn run<R>(
        &mut self,
        rows: Vec<R>,
        messages: SaveMessages,
        host: &ScreenHost<'_>,
    ) -> Result<SaveReport, SaveError>
    where
        R: PersistRow,
    {
        self.state = SaveState::Validating;

        if rows.is_empty()
            && let Some(body) = messages.nothing_to_save
        {
            tracing::warn!("save rejected: no item has data");
            host.notifier.notify(Notice::error(body));
            self.state = SaveState::Idle;
            return Err(SaveError::NothingToSave(DomainError::validation(
                "every item is empty",
            )));
        }

        self.state = SaveState::Persisting;
        let mut items = Vec::with_capacity(rows.len());

        for row in &rows {
            if let Err(err) = row.persist(host.store).await {
                tracing::error!(
                    item = row.item(),
                    written = items.len(),
                    error = %err,
                    "failed to persist row; aborting save"
                );
                host.notifier.notify(Notice::error(SAVE_FAILED));
                self.state = SaveState::Failed;
                return Err(SaveError::Store {
                    item: row.item().to_string(),
                    written: items.len(),
                    source: err,
                });
            }
            tracing::info!(item = row.item(), "row persisted");
            items.push(row.item().to_string());
        }

        tracing::info!(rows = items.len(), "save completed");
        self.state = SaveState::Succeeded;
        host.notifier.notify(Notice::success(messages.success));
        host.navigator.replace(Screen::Menu);

        Ok(SaveReport { items })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use granja_core::Quantity;

    use super::*;
    use crate::feed::FeedRow;
    use crate::screen::NoticeKind;
    use crate::testing::{FakeStore, RecordingNavigator, RecordingNotifier};

    const GUARDED: SaveMessages = SaveMessages {
        success: "ok",
        nothing_to_save: Some("empty"),
    };

    const UNGUARDED: SaveMessages = SaveMessages {
        success: "ok",
        nothing_to_save: None,
    };

    fn row(caseta: &str) -> FeedRow {
        FeedRow {
            seccion: None,
            fecha: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            caseta: caseta.to_string(),
            existencia_inicial: Quantity::ZERO,
            entrada: Quantity::from(1),
            consumo: Quantity::ZERO,
            tipo: String::new(),
            edad: String::new(),
        }
    }

    #[tokio::test]
    async fn guarded_empty_save_is_a_validation_error() {
        let store = FakeStore::default();
        let navigator = RecordingNavigator::default();
        let notifier = RecordingNotifier::default();
        let host = ScreenHost::new(&store, &navigator, &notifier);

        let mut pipeline = SavePipeline::default();
        let err = pipeline.run(Vec::<FeedRow>::new(), GUARDED, &host).await.unwrap_err();

        assert!(matches!(err, SaveError::NothingToSave(DomainError::Validation(_))));
        assert_eq!(pipeline.state(), SaveState::Idle);
        assert_eq!(store.calls(), 0);
        assert_eq!(notifier.notices(), vec![Notice::error("empty")]);
        assert!(navigator.screens().is_empty());
    }

    #[tokio::test]
    async fn unguarded_empty_save_succeeds_without_writes() {
        let store = FakeStore::default();
        let navigator = RecordingNavigator::default();
        let notifier = RecordingNotifier::default();
        let host = ScreenHost::new(&store, &navigator, &notifier);

        let mut pipeline = SavePipeline::default();
        let report = pipeline.run(Vec::<FeedRow>::new(), UNGUARDED, &host).await.unwrap();

        assert_eq!(report.rows_written(), 0);
        assert_eq!(pipeline.state(), SaveState::Succeeded);
        assert_eq!(store.calls(), 0);
        assert_eq!(navigator.screens(), vec![Screen::Menu]);
        assert_eq!(notifier.notices()[0].kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn rows_are_written_in_order() {
        let store = FakeStore::default();
        let navigator = RecordingNavigator::default();
        let notifier = RecordingNotifier::default();
        let host = ScreenHost::new(&store, &navigator, &notifier);

        let mut pipeline = SavePipeline::default();
        let report = pipeline
            .run(vec![row("CASETA 3"), row("CASETA 1")], GUARDED, &host)
            .await
            .unwrap();

        assert_eq!(report.items, vec!["CASETA 3", "CASETA 1"]);
        let stored: Vec<String> = store.feed().into_iter().map(|r| r.caseta).collect();
        assert_eq!(stored, report.items);
        assert_eq!(notifier.notices(), vec![Notice::success("ok")]);
    }

    #[tokio::test]
    async fn first_failure_stops_the_remaining_inserts() {
        let store = FakeStore::failing_on(2);
        let navigator = RecordingNavigator::default();
        let notifier = RecordingNotifier::default();
        let host = ScreenHost::new(&store, &navigator, &notifier);

        let mut pipeline = SavePipeline::default();
        let rows = vec![row("CASETA 1"), row("CASETA 2"), row("CASETA 3")];
        let err = pipeline.run(rows, UNGUARDED, &host).await.unwrap_err();

        assert_eq!(
            err,
            SaveError::Store {
                item: "CASETA 2".to_string(),
                written: 1,
                source: StoreError::backend("disk full"),
            }
        );
        assert_eq!(pipeline.state(), SaveState::Failed);
        assert_eq!(store.calls(), 2);
        assert_eq!(store.feed().len(), 1);
        assert_eq!(notifier.notices(), vec![Notice::error(SAVE_FAILED)]);
        assert!(navigator.screens().is_empty());
    }
}

//! Collaborators a sheet talks to: navigation, user notices, storage.

use serde::{Deserialize, Serialize};

use crate::store::RecordStore;

/// Screens reachable from the capture sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    Feed,
    Packaging,
}

/// Navigation host.
pub trait Navigator: Send + Sync {
    /// Show `screen` without keeping the current one on the back stack.
    fn replace(&self, screen: Screen);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A titled message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Éxito".to_string(),
            body: body.into(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            body: body.into(),
        }
    }
}

/// User acknowledgment surface (alert, toast, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Everything a save needs from the outside world.
#[derive(Clone, Copy)]
pub struct ScreenHost<'a> {
    pub store: &'a dyn RecordStore,
    pub navigator: &'a dyn Navigator,
    pub notifier: &'a dyn Notifier,
}

impl<'a> ScreenHost<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        navigator: &'a dyn Navigator,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
        }
    }
}

/// Shown when any insert of a save fails.
pub const SAVE_FAILED: &str = "No se pudieron guardar los datos.";

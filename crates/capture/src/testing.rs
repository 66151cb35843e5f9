//! Test doubles for the sheet collaborators.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::feed::FeedRow;
use crate::packaging::PackagingRow;
use crate::screen::{Navigator, Notice, Notifier, Screen};
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Default)]
pub struct FakeStore {
    feed: Mutex<Vec<FeedRow>>,
    packaging: Mutex<Vec<PackagingRow>>,
    calls: Mutex<usize>,
    /// 1-based call number that fails.
    fail_on: Option<usize>,
}

impl FakeStore {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    pub fn feed(&self) -> Vec<FeedRow> {
        self.feed.lock().unwrap().clone()
    }

    pub fn packaging(&self) -> Vec<PackagingRow> {
        self.packaging.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn next_call(&self) -> Result<(), StoreError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if self.fail_on == Some(*calls) {
            return Err(StoreError::backend("disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn insert_feed(&self, row: &FeedRow) -> Result<(), StoreError> {
        self.next_call()?;
        self.feed.lock().unwrap().push(row.clone());
        Ok(())
    }

    async fn insert_packaging(&self, row: &PackagingRow) -> Result<(), StoreError> {
        self.next_call()?;
        self.packaging.lock().unwrap().push(row.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub screens: Mutex<Vec<Screen>>,
}

impl RecordingNavigator {
    pub fn screens(&self) -> Vec<Screen> {
        self.screens.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, screen: Screen) {
        self.screens.lock().unwrap().push(screen);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

//! Recording doubles for the navigation host and notice surface.

#![allow(dead_code)]

use std::sync::Mutex;

use granja_capture::{Navigator, Notice, Notifier, Screen};

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    screens: Mutex<Vec<Screen>>,
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
    notices: Mutex<Vec<Notice>>,
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

#![allow(dead_code)]

use std::cell::RefCell;
use zerin_core::Announcer;

/// Announcer capturing every spoken line for assertions.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    messages: RefCell<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str) {
        self.messages.borrow_mut().push(text.to_string());
    }
}

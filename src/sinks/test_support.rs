use std::sync::{Mutex, PoisonError};

use crate::progress::{ErrorEntry, ProgressCounts, ProgressState};

use super::OutputSink;

/// Captures everything handed to the sink.
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) bodies: Mutex<Vec<String>>,
    pub(crate) failures: Mutex<Vec<(usize, ErrorEntry)>>,
    pub(crate) progress: Mutex<Vec<ProgressCounts>>,
    pub(crate) reports: Mutex<Vec<ProgressState>>,
}

impl RecordingSink {
    pub(crate) fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn failures(&self) -> Vec<(usize, ErrorEntry)> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn progress_ticks(&self) -> usize {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub(crate) fn reports(&self) -> Vec<ProgressState> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl OutputSink for RecordingSink {
    fn response_body(&self, body: &str) {
        self.bodies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(body.to_owned());
    }

    fn failure(&self, worker: usize, entry: &ErrorEntry) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((worker, entry.clone()));
    }

    fn progress(&self, counts: &ProgressCounts) {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*counts);
    }

    fn final_report(&self, state: &ProgressState) -> std::io::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state.clone());
        Ok(())
    }
}

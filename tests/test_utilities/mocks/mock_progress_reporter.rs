use career_tree::prelude::*;
use std::sync::{Arc, Mutex};

/// One call made on the reporter
#[derive(Debug, Clone, PartialEq)]
pub enum Reported {
    Message(String),
    Progress {
        current: usize,
        total: usize,
        label: Option<String>,
    },
    Error(String),
    Completion(String),
}

/// Mock ProgressReporter that records every call in order
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    events: Arc<Mutex<Vec<Reported>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Reported> {
        self.events.lock().unwrap().clone()
    }

    /// `(current, total)` of every progress report
    pub fn progress_steps(&self) -> Vec<(usize, usize)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Reported::Progress { current, total, .. } => Some((current, total)),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Reported::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> bool {
        self.events()
            .iter()
            .any(|event| matches!(event, Reported::Completion(_)))
    }

    fn push(&self, event: Reported) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(Reported::Message(message.to_string()));
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.push(Reported::Progress {
            current,
            total,
            label: message.map(str::to_string),
        });
    }

    fn report_error(&self, message: &str) {
        self.push(Reported::Error(message.to_string()));
    }

    fn report_completion(&self, message: &str) {
        self.push(Reported::Completion(message.to_string()));
    }
}

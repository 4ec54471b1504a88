//! Per-session state owned by the process loop

use std::collections::HashMap;

use tracing::warn;

/// Current full text of every open document, keyed by URI
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the text for `uri`
    pub fn open(&mut self, uri: &str, text: &str) {
        self.documents.insert(uri.to_string(), text.to_string());
    }

    /// Replaces the text for `uri`. An update for a document that was never
    /// opened creates it.
    pub fn update(&mut self, uri: &str, text: &str) {
        if !self.documents.contains_key(uri) {
            warn!("Update for unopened document {}, creating it", uri);
        }
        self.documents.insert(uri.to_string(), text.to_string());
    }

    /// Forgets `uri`. Returns whether it was open.
    pub fn close(&mut self, uri: &str) -> bool {
        self.documents.remove(uri).is_some()
    }

    pub fn text(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Where the session is in the initialize / shutdown / exit sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Running,
    /// `shutdown` was received; only `exit` is still honored
    ShuttingDown,
    /// `exit` was received; `clean` records whether `shutdown` came first
    Exited { clean: bool },
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub documents: DocumentStore,
    /// Incremented once per `didChange` notification
    pub change_count: u64,
    pub lifecycle: Lifecycle,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.lifecycle == Lifecycle::ShuttingDown
    }

    pub fn has_exited(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Exited { .. })
    }

    pub fn begin_shutdown(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::ShuttingDown;
        }
    }

    pub fn exit(&mut self) {
        let clean = self.lifecycle == Lifecycle::ShuttingDown;
        self.lifecycle = Lifecycle::Exited { clean };
    }
}

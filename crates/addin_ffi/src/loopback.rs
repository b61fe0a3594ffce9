//! In-process host double.
//!
//! Stands in for a real host connection during smoke runs and tests: every
//! service records what the component sent so callers can inspect it.
//!
//! # Invariants
//! - All state sits behind mutexes; handles are shareable and `Send + Sync`.
//! - Lock poisoning is absorbed, never propagated.

use addin_core::{AsyncEventSink, ErrorLog, ErrorRecord, HostConnection, StatusLine};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const DEFAULT_EVENT_BUFFER_DEPTH: i64 = 16;

/// One captured event-channel notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNotification {
    pub source: String,
    pub message: String,
    pub data: String,
}

/// One captured error-journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub context: String,
    pub record: ErrorRecord,
}

#[derive(Debug, Default)]
struct LoopbackState {
    events: Vec<EventNotification>,
    buffer_depth: Option<i64>,
    status_text: Option<String>,
    journal: Vec<JournalEntry>,
}

/// Recording host connection whose services all point back at one shared
/// state block.
#[derive(Debug, Default)]
pub struct LoopbackHost {
    state: Mutex<LoopbackState>,
}

impl LoopbackHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes and returns all captured notifications.
    pub fn drain_events(&self) -> Vec<EventNotification> {
        std::mem::take(&mut self.state().events)
    }

    pub fn event_count(&self) -> usize {
        self.state().events.len()
    }

    /// Last status-bar text set by the component, if any.
    pub fn status_text(&self) -> Option<String> {
        self.state().status_text.clone()
    }

    /// Captured error-journal entries, oldest first.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.state().journal.clone()
    }
}

impl AsyncEventSink for LoopbackHost {
    fn external_event(&self, source: &str, message: &str, data: &str) {
        self.state().events.push(EventNotification {
            source: source.to_string(),
            message: message.to_string(),
            data: data.to_string(),
        });
    }

    fn set_event_buffer_depth(&self, depth: i64) {
        self.state().buffer_depth = Some(depth);
    }

    fn event_buffer_depth(&self) -> i64 {
        self.state().buffer_depth.unwrap_or(DEFAULT_EVENT_BUFFER_DEPTH)
    }

    fn clean_buffer(&self) {
        self.state().events.clear();
    }
}

impl StatusLine for LoopbackHost {
    fn set_status_line(&self, text: &str) {
        self.state().status_text = Some(text.to_string());
    }

    fn reset_status_line(&self) {
        self.state().status_text = None;
    }
}

impl ErrorLog for LoopbackHost {
    fn add_error(&self, context: &str, record: &ErrorRecord) {
        self.state().journal.push(JournalEntry {
            context: context.to_string(),
            record: record.clone(),
        });
    }
}

/// Connection facade handing out the loopback's service handles.
#[derive(Debug)]
pub struct LoopbackConnection {
    host: Arc<LoopbackHost>,
}

impl LoopbackConnection {
    pub fn new(host: Arc<LoopbackHost>) -> Self {
        Self { host }
    }
}

impl HostConnection for LoopbackConnection {
    fn async_event_sink(&self) -> Option<Arc<dyn AsyncEventSink>> {
        Some(Arc::clone(&self.host) as Arc<dyn AsyncEventSink>)
    }

    fn status_line(&self) -> Option<Arc<dyn StatusLine>> {
        Some(Arc::clone(&self.host) as Arc<dyn StatusLine>)
    }

    fn error_log(&self) -> Option<Arc<dyn ErrorLog>> {
        Some(Arc::clone(&self.host) as Arc<dyn ErrorLog>)
    }
}

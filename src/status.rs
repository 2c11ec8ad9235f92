//! Progress notifications — fire-and-forget status events for UI feedback.
//!
//! Tool operations emit events at defined checkpoints through a [`StatusSink`].
//! Unary execution uses the no-op sink; streaming execution forwards events
//! to the client over a bounded channel.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Phase/outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    InProgress,
    Complete,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::InProgress => "in_progress",
            StatusKind::Complete => "complete",
            StatusKind::Error => "error",
        }
    }
}

/// A progress notification.
///
/// Within one operation, in_progress events precede the single terminal
/// event (complete or error), which carries `done = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: StatusKind,
    pub description: String,
    pub done: bool,
}

impl StatusEvent {
    pub fn in_progress(description: impl Into<String>) -> Self {
        Self {
            status: StatusKind::InProgress,
            description: description.into(),
            done: false,
        }
    }

    pub fn complete(description: impl Into<String>) -> Self {
        Self {
            status: StatusKind::Complete,
            description: description.into(),
            done: true,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            status: StatusKind::Error,
            description: description.into(),
            done: true,
        }
    }

    /// Wire rendering used by LLM hosts: `{"type": "status", "data": {…}}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "status",
            "data": self,
        })
    }
}

/// Receives status events during a tool operation.
///
/// Emission is synchronous and fire-and-forget: a sink must never block the
/// operation or surface an error into it.
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: StatusEvent);
}

/// Sink that drops every event. Used when the caller requested no feedback.
pub struct NullSink;

impl StatusSink for NullSink {
    fn emit(&self, _event: StatusEvent) {}
}

/// Sink backed by a bounded channel. Overflow drops the event rather than
/// stalling the operation.
pub struct ChannelSink {
    tx: mpsc::Sender<StatusEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<StatusEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelSink {
    fn emit(&self, event: StatusEvent) {
        if let Err(e) = self.tx.try_send(event) {
            debug!("Status event dropped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ev = StatusEvent::in_progress("Connecting to SMTP server");
        assert_eq!(ev.status, StatusKind::InProgress);
        assert!(!ev.done);

        let ev = StatusEvent::complete("Email prepared");
        assert_eq!(ev.status, StatusKind::Complete);
        assert!(ev.done);

        let ev = StatusEvent::error("Error: No email prepared");
        assert_eq!(ev.status, StatusKind::Error);
        assert!(ev.done);
    }

    #[test]
    fn test_wire_shape() {
        let ev = StatusEvent::in_progress("Preparing email");
        let json = ev.to_json();
        assert_eq!(json["type"], "status");
        assert_eq!(json["data"]["status"], "in_progress");
        assert_eq!(json["data"]["description"], "Preparing email");
        assert_eq!(json["data"]["done"], false);
    }

    #[test]
    fn test_status_kind_serializes_snake_case() {
        let json = serde_json::to_string(&StatusKind::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(StatusKind::Error.as_str(), "error");
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let sink = ChannelSink::new(tx);

        sink.emit(StatusEvent::in_progress("Sending email"));
        sink.emit(StatusEvent::complete("Email sent"));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.status, StatusKind::InProgress);
        assert_eq!(second.status, StatusKind::Complete);
    }

    #[tokio::test]
    async fn test_channel_sink_overflow_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        let sink = ChannelSink::new(tx);

        sink.emit(StatusEvent::in_progress("one"));
        sink.emit(StatusEvent::in_progress("two")); // dropped, channel full

        assert_eq!(rx.recv().await.unwrap().description, "one");
        assert!(rx.try_recv().is_err());
    }
}

//! Event System
//!
//! Types carried on the channel between the export worker and the terminal
//! renderer.

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Source {
    /// The dashboard read path (table/statistics loads).
    PageLoader,
    /// The export coordinator driving a start/poll/download attempt.
    ExportWorker,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    Progress,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Percent complete for `Progress` events.
    pub progress: Option<u8>,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            progress: None,
        }
    }

    pub fn exporter(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::ExportWorker, msg, event_type, log_level)
    }

    pub fn loader(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::PageLoader, msg, event_type, log_level)
    }

    pub fn export_progress(percent: u8) -> Self {
        let mut event = Self::new(
            Source::ExportWorker,
            format!("Export progress: {}%", percent),
            EventType::Progress,
            LogLevel::Info,
        );
        event.progress = Some(percent);
        event
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

/// Sending half of the event channel handed to workers. Send failures are
/// ignored; a closed channel just means the renderer is gone.
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    pub async fn send_export_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::exporter(message, event_type, log_level))
            .await;
    }

    pub async fn send_progress(&self, percent: u8) {
        let _ = self.sender.send(Event::export_progress(percent)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_event_carries_percent() {
        let event = Event::export_progress(40);
        assert_eq!(event.progress, Some(40));
        assert_eq!(event.event_type, EventType::Progress);
        assert!(event.msg.contains("40%"));
    }

    #[test]
    fn info_events_always_display() {
        let event = Event::exporter("done".to_string(), EventType::Success, LogLevel::Info);
        assert!(event.should_display());
    }

    #[tokio::test]
    async fn sender_ignores_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic or error
        sender.send_progress(10).await;
    }
}

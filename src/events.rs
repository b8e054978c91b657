//! Event System
//!
//! Types and implementations for refresh events and logging

use crate::logging::{LogLevel, should_log_with_env};
use crate::view::Section;
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Source {
    /// The refresh cycle as a whole (timer, fan-in, overlay).
    Controller,
    /// One section's fetch and render.
    Section(Section),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    /// The section rendered, but an optional part of it could not be fetched.
    Degraded,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn controller_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Controller, msg, event_type, log_level)
    }

    pub fn section_with_level(
        section: Section,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(Source::Section(section), msg, event_type, log_level)
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
        match self.source {
            Source::Controller => {
                write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
            }
            Source::Section(section) => write!(
                f,
                "{} [{}] {}: {}",
                self.event_type, self.timestamp, section, self.msg
            ),
        }
    }
}

/// Optional event channel shared by the refresh tasks
#[derive(Clone, Default)]
pub struct EventSender {
    sender: Option<mpsc::Sender<Event>>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Drops every event; used when nothing displays them.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event).await;
        }
    }

    pub async fn send_controller_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::controller_with_level(
            message, event_type, log_level,
        ))
        .await;
    }

    pub async fn send_section_event(
        &self,
        section: Section,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::section_with_level(
            section, message, event_type, log_level,
        ))
        .await;
    }
}

//! Event System
//!
//! Types and implementations for worker events and logging

use crate::api::models::{CurrentPlayback, Song, WebcamStatus};
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Worker {
    /// Checks the session before anything else is requested.
    AuthGate,
    /// Fetches and replaces the song list.
    SongSync,
    /// Listens on the push channel for database changes.
    PushListener,
    /// Polls the player status.
    Playback,
    /// Polls the webcam status.
    Webcam,
    /// Polls the viewer's distance to the screen.
    FaceDistance,
    /// Runs transport, webcam and volume actions from key presses.
    Controls,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
}

/// Outcome of the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    /// Not authenticated; carries the login URL when the service provided one.
    Redirect { auth_url: Option<String> },
}

/// Data carried by an event for the dashboard to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    AuthResolved(AuthOutcome),
    FetchStarted { seq: u64 },
    SongsFetched { seq: u64, songs: Vec<Song> },
    SongsFetchFailed { seq: u64 },
    /// The service refused the session after the gate had passed.
    SessionExpired,
    Playback(Option<CurrentPlayback>),
    Webcam(WebcamStatus),
    FaceDistance(Option<f64>),
    Volume(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Optional payload for state change events
    pub update: Option<Update>,
}

impl Event {
    pub fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            update: None,
        }
    }

    /// A silent state change carrying a payload.
    pub fn state_change(worker: Worker, update: Update) -> Self {
        Self::new(worker, String::new(), EventType::StateChange, LogLevel::Debug).with_update(update)
    }

    pub fn with_update(mut self, update: Update) -> Self {
        self.update = Some(update);
        self
    }

    pub fn should_display(&self) -> bool {
        // StateChange events are handled separately (not displayed in logs)
        if self.event_type == EventType::StateChange {
            return false;
        }
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }

    /// Forward the event to the `log` facade (headless mode).
    pub fn log(&self) {
        if self.event_type == EventType::StateChange {
            return;
        }
        log::log!(
            target: "spotilike::events",
            log::Level::from(self.log_level),
            "[{}] {}",
            self.worker,
            self.msg
        );
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

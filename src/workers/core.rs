//! Core worker utilities

use crate::api::error::ApiError;
use crate::consts::cli_consts::{song_sync, widgets};
use crate::events::{Event, EventType, Update, Worker};
use crate::logging::LogLevel;
use std::time::Duration;
use tokio::sync::mpsc;

/// Common event sending utilities for workers
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    pub async fn send(
        &self,
        worker: Worker,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::new(worker, message, event_type, log_level))
            .await;
    }

    /// Send a silent state change for the dashboard to apply
    pub async fn send_update(&self, worker: Worker, update: Update) {
        self.send_event(Event::state_change(worker, update)).await;
    }

    /// Tell the UI to leave the dashboard when the service refused the session.
    pub async fn report_if_unauthenticated(&self, worker: Worker, error: &ApiError) {
        if error.is_unauthenticated() {
            self.send_update(worker, Update::SessionExpired).await;
        }
    }
}

/// Timing shared across all worker types
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub song_poll_interval: Duration,
    pub push_reconnect_delay: Duration,
    pub playback_poll: Duration,
    pub webcam_poll: Duration,
    pub face_distance_poll: Duration,
    pub webcam_toggle_settle: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            song_poll_interval: song_sync::poll_interval(),
            push_reconnect_delay: song_sync::push_reconnect_delay(),
            playback_poll: widgets::playback_poll(),
            webcam_poll: widgets::webcam_poll(),
            face_distance_poll: widgets::face_distance_poll(),
            webcam_toggle_settle: widgets::webcam_toggle_settle(),
        }
    }
}

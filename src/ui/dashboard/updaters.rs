//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events

use super::state::DashboardState;
use crate::events::{AuthOutcome, Event as WorkerEvent, Update};

impl DashboardState {
    /// Advance the animation tick and apply queued events in arrival order.
    pub fn update(&mut self) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            if let Some(update) = &event.update {
                self.apply_update(update.clone());
            }
            if event.should_display() {
                self.add_to_activity_log(event);
            }
        }
    }

    fn apply_update(&mut self, update: Update) {
        match update {
            Update::AuthResolved(outcome) => self.view.gate_resolved(&outcome),
            Update::FetchStarted { seq } => self.view.fetch_started(seq),
            Update::SongsFetched { seq, songs } => {
                if self.view.fetch_succeeded(seq, songs) {
                    self.clamp_selection();
                }
            }
            Update::SongsFetchFailed { seq } => self.view.fetch_failed(seq),
            Update::SessionExpired => self
                .view
                .gate_resolved(&AuthOutcome::Redirect { auth_url: None }),
            Update::Playback(playback) => {
                if let Some(volume) = playback.as_ref().and_then(|p| p.volume_percent) {
                    self.volume = Some(volume);
                }
                self.playback = playback;
            }
            Update::Webcam(status) => self.webcam = Some(status),
            Update::FaceDistance(distance) => self.face_distance = distance,
            Update::Volume(volume) => self.volume = Some(volume),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.view.ranked.len();
        if self.selected_song >= len {
            self.selected_song = len.saturating_sub(1);
        }
    }

    /// Events that arrived before the dashboard existed, e.g. from the auth gate.
    pub fn replay(&mut self, events: impl IntoIterator<Item = WorkerEvent>) {
        for event in events {
            self.add_event(event);
        }
    }
}

//! Dashboard state management
//!
//! `ViewState` is the song list as the user sees it. It only changes through
//! its transition functions, so every refresh trigger goes through the same
//! sequence check. Widget readings and the activity log live beside it in
//! `DashboardState`.

use crate::api::models::{CurrentPlayback, Song, WebcamStatus};
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::{AuthOutcome, Event as WorkerEvent};
use crate::mood::Emotion;
use crate::ranking::rank_songs;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Instant;

/// Where the authentication gate stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Checking,
    Authenticated,
    Redirecting,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub gate: GateState,
    /// Songs in server order, as last applied.
    pub songs: Vec<Song>,
    pub mood: Option<Emotion>,
    /// `songs` ordered for `mood`.
    pub ranked: Vec<Song>,
    pub loading: bool,
    /// Sequence number of the response currently shown; 0 before the first.
    pub last_applied_seq: u64,
}

impl ViewState {
    pub fn new(mood: Option<Emotion>) -> Self {
        Self {
            mood,
            ..Self::default()
        }
    }

    pub fn gate_resolved(&mut self, outcome: &AuthOutcome) {
        self.gate = match outcome {
            AuthOutcome::Authenticated => GateState::Authenticated,
            AuthOutcome::Redirect { .. } => GateState::Redirecting,
        };
    }

    /// A fetch went out. Starts that arrive after a newer response was
    /// already applied do not bring the indicator back.
    pub fn fetch_started(&mut self, seq: u64) {
        if seq > self.last_applied_seq {
            self.loading = true;
        }
    }

    /// Apply a response unless a newer one is already shown.
    /// Returns whether the songs were replaced.
    pub fn fetch_succeeded(&mut self, seq: u64, songs: Vec<Song>) -> bool {
        self.loading = false;
        if seq <= self.last_applied_seq {
            return false;
        }
        self.last_applied_seq = seq;
        self.songs = songs;
        self.rerank();
        true
    }

    /// The previous songs stay on screen.
    pub fn fetch_failed(&mut self, _seq: u64) {
        self.loading = false;
    }

    pub fn mood_selected(&mut self, mood: Option<Emotion>) {
        self.mood = mood;
        self.rerank();
    }

    fn rerank(&mut self) {
        self.ranked = rank_songs(&self.songs, self.mood);
    }
}

/// Everything the dashboard screen renders.
#[derive(Debug)]
pub struct DashboardState {
    pub environment: Environment,
    /// When the dashboard mounted.
    pub start_time: Instant,
    pub view: ViewState,

    pub playback: Option<CurrentPlayback>,
    pub webcam: Option<WebcamStatus>,
    /// Viewer's distance to the screen; `None` while no face is detected.
    pub face_distance: Option<f64>,
    pub volume: Option<u8>,
    /// Row highlighted in the song table.
    pub selected_song: usize,

    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<WorkerEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<WorkerEvent>,
    /// Animation tick counter
    pub tick: usize,
    pub with_background_color: bool,
}

impl DashboardState {
    pub fn new(
        environment: Environment,
        mood: Option<Emotion>,
        with_background_color: bool,
    ) -> Self {
        let mut view = ViewState::new(mood);
        view.gate = GateState::Authenticated;
        Self {
            environment,
            start_time: Instant::now(),
            view,
            playback: None,
            webcam: None,
            face_distance: None,
            volume: None,
            selected_song: 0,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            tick: 0,
            with_background_color,
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: WorkerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: WorkerEvent) {
        self.pending_events.push_back(event);
    }

    pub fn select_next_song(&mut self) {
        if self.selected_song + 1 < self.view.ranked.len() {
            self.selected_song += 1;
        }
    }

    pub fn select_previous_song(&mut self) {
        self.selected_song = self.selected_song.saturating_sub(1);
    }

    /// Mood after the current one in selector order, wrapping to "no mood".
    pub fn cycle_mood(&mut self) {
        let all = Emotion::all();
        let next = match self.view.mood {
            None => all.first().copied(),
            Some(current) => all
                .iter()
                .position(|e| *e == current)
                .and_then(|i| all.get(i + 1).copied()),
        };
        self.select_mood(next);
    }

    pub fn select_mood(&mut self, mood: Option<Emotion>) {
        self.view.mood_selected(mood);
        self.selected_song = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn song(id: &str, happy: Option<f64>) -> Song {
        let mut affinities = BTreeMap::new();
        if let Some(score) = happy {
            affinities.insert(Emotion::Happy, score);
        }
        Song {
            id: id.to_string(),
            title: id.to_string(),
            artist: "artist".to_string(),
            image: None,
            duration: "3:00".to_string(),
            emotion: None,
            score: None,
            affinities,
        }
    }

    fn ids(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_older_response_is_discarded() {
        let mut view = ViewState::new(None);
        view.fetch_started(1);
        view.fetch_started(2);

        assert!(view.fetch_succeeded(2, vec![song("new", None)]));
        assert!(!view.fetch_succeeded(1, vec![song("old", None)]));

        assert_eq!(ids(&view.songs), vec!["new"]);
        assert_eq!(view.last_applied_seq, 2);
        assert!(!view.loading);
    }

    #[test]
    fn test_failure_keeps_songs_and_clears_loading() {
        let mut view = ViewState::new(None);
        view.fetch_succeeded(1, vec![song("a", None), song("b", None)]);

        view.fetch_started(2);
        assert!(view.loading);
        view.fetch_failed(2);

        assert!(!view.loading);
        assert_eq!(ids(&view.songs), vec!["a", "b"]);
        assert_eq!(view.last_applied_seq, 1);
    }

    #[test]
    fn test_clearing_mood_restores_server_order() {
        let mut view = ViewState::new(Some(Emotion::Happy));
        view.fetch_succeeded(1, vec![song("low", Some(0.1)), song("high", Some(0.9))]);
        assert_eq!(ids(&view.ranked), vec!["high", "low"]);

        view.mood_selected(None);
        assert_eq!(ids(&view.ranked), vec!["low", "high"]);
    }

    #[test]
    fn test_start_after_newer_response_keeps_loading_off() {
        let mut view = ViewState::new(None);
        view.fetch_succeeded(3, vec![]);
        view.fetch_started(2);
        assert!(!view.loading);
    }

    #[test]
    fn test_gate_and_serialization() {
        let mut view = ViewState::new(Some(Emotion::Sad));
        assert_eq!(view.gate, GateState::Checking);
        view.gate_resolved(&AuthOutcome::Redirect { auth_url: None });
        assert_eq!(view.gate, GateState::Redirecting);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["gate"], "redirecting");
        assert_eq!(json["mood"], "sad");
        assert_eq!(json["last_applied_seq"], 0);
    }

    #[test]
    fn test_cycle_mood_wraps_to_none() {
        let mut state = DashboardState::new(Environment::Local, None, false);
        for expected in Emotion::all() {
            state.cycle_mood();
            assert_eq!(state.view.mood, Some(expected));
        }
        state.cycle_mood();
        assert_eq!(state.view.mood, None);
    }
}

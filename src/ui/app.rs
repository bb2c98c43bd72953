//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::api::MoodApi;
use crate::api::models::PlaybackCommand;
use crate::consts::cli_consts::{MAX_ACTIVITY_LOGS, widgets};
use crate::events::{AuthOutcome, Event as WorkerEvent, Update};
use crate::mood::Emotion;
use crate::runtime::{start_auth_gate, start_dashboard_workers};
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::login::render_login;
use crate::ui::splash::render_splash;
use crate::workers::controls::ControlCommand;
use crate::workers::core::{EventSender, WorkerConfig};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// UI configuration data grouped by concern
#[derive(Debug, Clone, Default)]
pub struct UIConfig {
    pub with_background_color: bool,
    /// Mood selected when the dashboard mounts.
    pub default_mood: Option<Emotion>,
    pub worker_config: WorkerConfig,
}

impl UIConfig {
    pub fn new(
        with_background_color: bool,
        default_mood: Option<Emotion>,
        worker_config: WorkerConfig,
    ) -> Self {
        Self {
            with_background_color,
            default_mood,
            worker_config,
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Shown while the session check runs.
    Splash,
    /// The session is not authenticated.
    Login {
        auth_url: Option<String>,
        rechecking: bool,
    },
    /// Mounted dashboard with its workers running.
    Dashboard(Box<DashboardState>),
}

/// What a key press on the dashboard asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    SelectMood(Option<Emotion>),
    CycleMood,
    NextSong,
    PreviousSong,
    Control(ControlCommand),
}

/// Application state
pub struct App {
    api: Arc<dyn MoodApi>,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Receives events from worker tasks.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Handed to workers spawned from the UI.
    event_sender: EventSender,

    /// Broadcasts shutdown signal to worker tasks.
    shutdown_sender: broadcast::Sender<()>,

    /// Keyboard actions for the mounted dashboard.
    controls: Option<mpsc::Sender<ControlCommand>>,

    /// Workers started after the session was set up.
    join_handles: Vec<JoinHandle<()>>,

    /// Events received before the dashboard mounted.
    early_events: VecDeque<WorkerEvent>,

    ui_config: UIConfig,

    /// Animation tick for screens without dashboard state.
    tick: usize,
}

impl App {
    pub fn new(
        api: Arc<dyn MoodApi>,
        event_sender: EventSender,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            api,
            current_screen: Screen::Splash,
            event_receiver,
            event_sender,
            shutdown_sender,
            controls: None,
            join_handles: Vec::new(),
            early_events: VecDeque::new(),
            ui_config,
            tick: 0,
        }
    }

    /// Handles of every worker the UI started; await them after shutdown.
    pub fn take_join_handles(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.join_handles)
    }

    fn handle_worker_event(&mut self, mut event: WorkerEvent) {
        if let Screen::Dashboard(state) = &mut self.current_screen {
            let expired = event.update == Some(Update::SessionExpired);
            state.add_event(event);
            if expired {
                self.unmount_dashboard();
            }
            return;
        }

        let outcome = match event.update.take() {
            Some(Update::AuthResolved(outcome)) => {
                event.update = Some(Update::AuthResolved(outcome.clone()));
                Some(outcome)
            }
            // Payloads from a dashboard that is already gone.
            _ => None,
        };
        if event.should_display() {
            if self.early_events.len() >= MAX_ACTIVITY_LOGS {
                self.early_events.pop_front();
            }
            self.early_events.push_back(event);
        }

        match outcome {
            Some(AuthOutcome::Authenticated) => self.mount_dashboard(),
            Some(AuthOutcome::Redirect { auth_url }) => {
                self.current_screen = Screen::Login {
                    auth_url,
                    rechecking: false,
                };
            }
            None => {}
        }
    }

    /// Start the dashboard workers and switch to the dashboard screen.
    fn mount_dashboard(&mut self) {
        let workers = start_dashboard_workers(
            self.api.clone(),
            self.event_sender.clone(),
            &self.shutdown_sender,
            &self.ui_config.worker_config,
        );
        self.join_handles.extend(workers.join_handles);
        self.controls = Some(workers.controls);

        let mut state = DashboardState::new(
            self.api.environment().clone(),
            self.ui_config.default_mood,
            self.ui_config.with_background_color,
        );
        state.replay(self.early_events.drain(..));
        self.current_screen = Screen::Dashboard(Box::new(state));
    }

    /// Stop the dashboard workers after the service refused the session, and
    /// check the session again from the login screen.
    fn unmount_dashboard(&mut self) {
        let _ = self.shutdown_sender.send(());
        self.controls = None;
        self.early_events.clear();
        self.current_screen = Screen::Login {
            auth_url: None,
            rechecking: true,
        };
        self.join_handles
            .push(start_auth_gate(self.api.clone(), self.event_sender.clone()));
    }

    /// Re-run the session check from the login screen.
    fn recheck_session(&mut self) {
        if let Screen::Login { rechecking, .. } = &mut self.current_screen {
            if *rechecking {
                return;
            }
            *rechecking = true;
            self.join_handles
                .push(start_auth_gate(self.api.clone(), self.event_sender.clone()));
        }
    }

    fn apply_key_action(&mut self, action: KeyAction) {
        let Screen::Dashboard(state) = &mut self.current_screen else {
            return;
        };
        match action {
            KeyAction::Quit => {}
            KeyAction::SelectMood(mood) => state.select_mood(mood),
            KeyAction::CycleMood => state.cycle_mood(),
            KeyAction::NextSong => state.select_next_song(),
            KeyAction::PreviousSong => state.select_previous_song(),
            KeyAction::Control(command) => {
                if let Some(controls) = &self.controls {
                    // A full queue means the handler is busy; drop the key press.
                    let _ = controls.try_send(command);
                }
            }
        }
    }
}

/// Map a key press on the dashboard to an action, given what is on screen.
pub fn dashboard_key_action(code: KeyCode, state: &DashboardState) -> Option<KeyAction> {
    let playback = state.playback.as_ref();
    let command = match code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(KeyAction::Quit),
        KeyCode::Char('0') => return Some(KeyAction::SelectMood(None)),
        KeyCode::Char(c @ '1'..='7') => {
            let index = c.to_digit(10)? as usize - 1;
            return Some(KeyAction::SelectMood(Emotion::all().get(index).copied()));
        }
        KeyCode::Tab => return Some(KeyAction::CycleMood),
        KeyCode::Down | KeyCode::Char('j') => return Some(KeyAction::NextSong),
        KeyCode::Up | KeyCode::Char('k') => return Some(KeyAction::PreviousSong),

        KeyCode::Char(' ') => {
            if playback.is_some_and(|p| p.is_playing) {
                ControlCommand::Playback(PlaybackCommand::Pause)
            } else {
                ControlCommand::Playback(PlaybackCommand::Play)
            }
        }
        KeyCode::Char('n') => ControlCommand::Playback(PlaybackCommand::Next),
        KeyCode::Char('p') => ControlCommand::Playback(PlaybackCommand::Previous),
        KeyCode::Char('s') => ControlCommand::Playback(PlaybackCommand::Shuffle(
            !playback.is_some_and(|p| p.shuffle_state),
        )),
        KeyCode::Char('r') => ControlCommand::Playback(PlaybackCommand::Repeat(
            playback.map(|p| p.repeat_state).unwrap_or_default().next(),
        )),
        KeyCode::Left | KeyCode::Right => {
            let playback = playback?;
            let duration = playback.track.as_ref()?.duration_ms;
            let position_ms = if code == KeyCode::Right {
                (playback.progress_ms + widgets::SEEK_STEP_MS).min(duration)
            } else {
                playback.progress_ms.saturating_sub(widgets::SEEK_STEP_MS)
            };
            ControlCommand::Playback(PlaybackCommand::Seek { position_ms })
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let current = state.volume.unwrap_or(0);
            ControlCommand::SetVolume(current.saturating_add(widgets::VOLUME_STEP).min(100))
        }
        KeyCode::Char('-') => {
            let current = state.volume.unwrap_or(0);
            ControlCommand::SetVolume(current.saturating_sub(widgets::VOLUME_STEP))
        }
        KeyCode::Char('a') => ControlCommand::AutoVolume,
        KeyCode::Char('w') => ControlCommand::ToggleWebcam {
            currently_active: state.webcam.as_ref().is_some_and(|w| w.webcam_active),
        },
        _ => return None,
    };
    Some(KeyAction::Control(command))
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    loop {
        app.tick = app.tick.wrapping_add(1);

        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            app.handle_worker_event(event);
        }

        if let Screen::Dashboard(state) = &mut app.current_screen {
            state.update();
        }
        terminal.draw(|f| render(f, &app.current_screen, app.tick))?;

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                let action = if let Screen::Dashboard(state) = &app.current_screen {
                    dashboard_key_action(key.code, state)
                } else {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => Some(KeyAction::Quit),
                        KeyCode::Enter => {
                            app.recheck_session();
                            None
                        }
                        _ => None,
                    }
                };

                match action {
                    Some(KeyAction::Quit) => {
                        // Send shutdown signal to workers
                        let _ = app.shutdown_sender.send(());
                        return Ok(());
                    }
                    Some(action) => app.apply_key_action(action),
                    None => {}
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen, tick: usize) {
    match screen {
        Screen::Splash => render_splash(f, tick),
        Screen::Login {
            auth_url,
            rechecking,
        } => render_login(f, auth_url.as_deref(), *rechecking),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMoodApi;
    use crate::api::models::{CurrentPlayback, PlaybackTrack, RepeatMode, WebcamStatus};
    use crate::environment::Environment;
    use crate::events::{EventType, Worker};
    use crate::logging::LogLevel;

    fn dashboard() -> DashboardState {
        DashboardState::new(Environment::Local, None, false)
    }

    fn playing(progress_ms: u64) -> CurrentPlayback {
        CurrentPlayback {
            is_playing: true,
            track: Some(PlaybackTrack {
                duration_ms: 200_000,
                ..PlaybackTrack::default()
            }),
            progress_ms,
            shuffle_state: true,
            repeat_state: RepeatMode::Context,
            volume_percent: Some(98),
        }
    }

    #[test]
    fn test_mood_keys() {
        let state = dashboard();
        assert_eq!(
            dashboard_key_action(KeyCode::Char('1'), &state),
            Some(KeyAction::SelectMood(Some(Emotion::Happy)))
        );
        assert_eq!(
            dashboard_key_action(KeyCode::Char('7'), &state),
            Some(KeyAction::SelectMood(Some(Emotion::Neutral)))
        );
        assert_eq!(
            dashboard_key_action(KeyCode::Char('0'), &state),
            Some(KeyAction::SelectMood(None))
        );
        assert_eq!(dashboard_key_action(KeyCode::Char('8'), &state), None);
    }

    #[test]
    fn test_transport_keys_follow_player_state() {
        let mut state = dashboard();
        assert_eq!(
            dashboard_key_action(KeyCode::Char(' '), &state),
            Some(KeyAction::Control(ControlCommand::Playback(
                PlaybackCommand::Play
            )))
        );
        // No track, nothing to seek in.
        assert_eq!(dashboard_key_action(KeyCode::Right, &state), None);

        state.playback = Some(playing(195_000));
        state.volume = Some(98);
        assert_eq!(
            dashboard_key_action(KeyCode::Char(' '), &state),
            Some(KeyAction::Control(ControlCommand::Playback(
                PlaybackCommand::Pause
            )))
        );
        assert_eq!(
            dashboard_key_action(KeyCode::Char('s'), &state),
            Some(KeyAction::Control(ControlCommand::Playback(
                PlaybackCommand::Shuffle(false)
            )))
        );
        assert_eq!(
            dashboard_key_action(KeyCode::Char('r'), &state),
            Some(KeyAction::Control(ControlCommand::Playback(
                PlaybackCommand::Repeat(RepeatMode::Track)
            )))
        );
        assert_eq!(
            dashboard_key_action(KeyCode::Right, &state),
            Some(KeyAction::Control(ControlCommand::Playback(
                PlaybackCommand::Seek {
                    position_ms: 200_000
                }
            )))
        );
        assert_eq!(
            dashboard_key_action(KeyCode::Char('+'), &state),
            Some(KeyAction::Control(ControlCommand::SetVolume(100)))
        );
    }

    #[test]
    fn test_webcam_key_toggles_current_state() {
        let mut state = dashboard();
        state.webcam = Some(WebcamStatus {
            webcam_active: true,
            current_emotion: None,
        });
        assert_eq!(
            dashboard_key_action(KeyCode::Char('w'), &state),
            Some(KeyAction::Control(ControlCommand::ToggleWebcam {
                currently_active: true
            }))
        );
    }

    fn app(api: MockMoodApi) -> App {
        let (tx, rx) = mpsc::channel(16);
        let (shutdown_tx, _) = broadcast::channel(1);
        App::new(
            Arc::new(api),
            EventSender::new(tx),
            rx,
            shutdown_tx,
            UIConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_redirect_shows_login_with_url() {
        let mut app = app(MockMoodApi::new());
        app.handle_worker_event(WorkerEvent::state_change(
            Worker::AuthGate,
            Update::AuthResolved(AuthOutcome::Redirect {
                auth_url: Some("https://accounts.example/authorize".to_string()),
            }),
        ));

        match &app.current_screen {
            Screen::Login {
                auth_url,
                rechecking,
            } => {
                assert_eq!(
                    auth_url.as_deref(),
                    Some("https://accounts.example/authorize")
                );
                assert!(!rechecking);
            }
            other => panic!("expected login screen, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expired_session_leaves_dashboard_for_login() {
        let mut api = MockMoodApi::new();
        api.expect_environment().return_const(Environment::Local);
        api.expect_enjoyed_songs().returning(|| {
            Err(crate::api::error::ApiError::Http {
                status: 401,
                message: "expired".to_string(),
            })
        });
        api.expect_db_updates()
            .returning(|| Err(crate::api::error::ApiError::InvalidInput("offline".into())));
        api.expect_current_playback().returning(|| Ok(None));
        api.expect_webcam_status()
            .returning(|| Ok(WebcamStatus::default()));
        api.expect_face_distance()
            .returning(|| Ok(crate::api::models::FaceDistance::default()));
        api.expect_auth_status().returning(|| Ok(false));
        api.expect_auth_url()
            .returning(|| Ok(Some("https://accounts.example/authorize".to_string())));
        let mut app = app(api);
        let mut dashboard_shutdown = app.shutdown_sender.subscribe();

        app.handle_worker_event(WorkerEvent::state_change(
            Worker::AuthGate,
            Update::AuthResolved(AuthOutcome::Authenticated),
        ));
        assert!(matches!(app.current_screen, Screen::Dashboard(_)));

        app.handle_worker_event(WorkerEvent::state_change(
            Worker::SongSync,
            Update::SessionExpired,
        ));

        assert!(matches!(
            app.current_screen,
            Screen::Login {
                rechecking: true,
                ..
            }
        ));
        assert!(app.controls.is_none());
        assert!(dashboard_shutdown.try_recv().is_ok());

        // Late payloads from the stopped workers are not applied anywhere.
        app.handle_worker_event(
            WorkerEvent::new(
                Worker::SongSync,
                "Fetched 0 songs".to_string(),
                EventType::Refresh,
                LogLevel::Info,
            )
            .with_update(Update::SongsFetched {
                seq: 9,
                songs: vec![],
            }),
        );
        assert!(matches!(app.current_screen, Screen::Login { .. }));
        assert_eq!(app.early_events.len(), 1);
        assert_eq!(app.early_events[0].update, None);

        // The re-run check reports the login URL.
        let outcome = loop {
            let event = app.event_receiver.recv().await.unwrap();
            if let Some(Update::AuthResolved(outcome)) = &event.update {
                let outcome = outcome.clone();
                app.handle_worker_event(event);
                break outcome;
            }
        };
        assert!(matches!(outcome, AuthOutcome::Redirect { .. }));
        match &app.current_screen {
            Screen::Login { auth_url, .. } => assert_eq!(
                auth_url.as_deref(),
                Some("https://accounts.example/authorize")
            ),
            other => panic!("expected login screen, got {:?}", other),
        }

        for handle in app.take_join_handles() {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_authenticated_mounts_dashboard() {
        let mut api = MockMoodApi::new();
        api.expect_environment().return_const(Environment::Local);
        api.expect_enjoyed_songs().returning(|| Ok(vec![]));
        api.expect_db_updates()
            .returning(|| Err(crate::api::error::ApiError::InvalidInput("offline".into())));
        api.expect_current_playback().returning(|| Ok(None));
        api.expect_webcam_status()
            .returning(|| Ok(WebcamStatus::default()));
        api.expect_face_distance()
            .returning(|| Ok(crate::api::models::FaceDistance::default()));
        let mut app = app(api);

        app.handle_worker_event(WorkerEvent::state_change(
            Worker::AuthGate,
            Update::AuthResolved(AuthOutcome::Authenticated),
        ));

        assert!(matches!(app.current_screen, Screen::Dashboard(_)));
        assert!(app.controls.is_some());
        assert_eq!(app.join_handles.len(), 6);

        let _ = app.shutdown_sender.send(());
        for handle in app.take_join_handles() {
            handle.await.unwrap();
        }
    }
}

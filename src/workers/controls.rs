//! Actions requested from the dashboard keyboard

use super::core::{EventSender, WorkerConfig};
use super::widgets::{Widget, fetch_widget};
use crate::api::MoodApi;
use crate::api::error::ApiError;
use crate::api::models::PlaybackCommand;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventType, Update, Worker};
use crate::logging::LogLevel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    Playback(PlaybackCommand),
    ToggleWebcam { currently_active: bool },
    SetVolume(u8),
    /// Let the service pick a volume from the viewer's distance.
    AutoVolume,
}

pub struct ControlHandler {
    api: Arc<dyn MoodApi>,
    event_sender: EventSender,
    commands: mpsc::Receiver<ControlCommand>,
    webcam_settle: Duration,
    classifier: ErrorClassifier,
}

impl ControlHandler {
    pub fn new(
        api: Arc<dyn MoodApi>,
        event_sender: EventSender,
        commands: mpsc::Receiver<ControlCommand>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            api,
            event_sender,
            commands,
            webcam_settle: config.webcam_toggle_settle,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Run commands one at a time until shutdown or until the dashboard drops
    /// its sender.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            let command = tokio::select! {
                _ = shutdown.recv() => break,
                command = self.commands.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = self.execute(command) => {}
            }
        }
    }

    async fn execute(&self, command: ControlCommand) {
        let result = match command {
            ControlCommand::Playback(playback) => self.playback(playback).await,
            ControlCommand::ToggleWebcam { currently_active } => {
                self.toggle_webcam(!currently_active).await
            }
            ControlCommand::SetVolume(percent) => self.set_volume(percent).await,
            ControlCommand::AutoVolume => self.auto_volume().await,
        };

        if let Err(e) = result {
            self.event_sender
                .send(
                    Worker::Controls,
                    format!("Action failed: {}", e),
                    EventType::Error,
                    self.classifier.classify_api_error(&e),
                )
                .await;
            self.event_sender
                .report_if_unauthenticated(Worker::Controls, &e)
                .await;
        }
    }

    async fn playback(&self, command: PlaybackCommand) -> Result<(), ApiError> {
        let action = command.action();
        self.api.playback(command).await?;
        self.event_sender
            .send(
                Worker::Controls,
                format!("Player: {}", action),
                EventType::Success,
                LogLevel::Debug,
            )
            .await;
        // Show the new state right away instead of waiting for the next poll.
        self.refresh(Widget::Playback).await
    }

    async fn toggle_webcam(&self, active: bool) -> Result<(), ApiError> {
        self.api.set_webcam(active).await?;
        self.event_sender
            .send(
                Worker::Controls,
                if active {
                    "Emotion capture started".to_string()
                } else {
                    "Emotion capture stopped".to_string()
                },
                EventType::Success,
                LogLevel::Info,
            )
            .await;
        // The camera takes a moment to report its new state.
        tokio::time::sleep(self.webcam_settle).await;
        self.refresh(Widget::Webcam).await
    }

    async fn set_volume(&self, percent: u8) -> Result<(), ApiError> {
        let percent = percent.min(100);
        self.api.set_volume(percent).await?;
        self.event_sender
            .send_update(Worker::Controls, Update::Volume(percent))
            .await;
        Ok(())
    }

    async fn auto_volume(&self) -> Result<(), ApiError> {
        let Some(distance) = self.api.face_distance().await?.distance else {
            self.event_sender
                .send(
                    Worker::Controls,
                    "No face detected, volume unchanged".to_string(),
                    EventType::Waiting,
                    LogLevel::Info,
                )
                .await;
            return Ok(());
        };

        let adjustment = self.api.adjust_volume(distance).await?;
        match adjustment.volume {
            Some(volume) => {
                self.event_sender
                    .send(
                        Worker::Controls,
                        format!("Volume set to {}% for distance {:.0}", volume, distance),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
                self.event_sender
                    .send_update(Worker::Controls, Update::Volume(volume))
                    .await;
            }
            None => {
                self.event_sender
                    .send(
                        Worker::Controls,
                        "Volume adjusted".to_string(),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
            }
        }
        Ok(())
    }

    async fn refresh(&self, widget: Widget) -> Result<(), ApiError> {
        let update = fetch_widget(self.api.as_ref(), widget).await?;
        self.event_sender.send_update(widget.worker(), update).await;
        Ok(())
    }
}

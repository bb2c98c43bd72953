//! Status polling for the player, webcam and face-distance panels

use super::core::{EventSender, WorkerConfig};
use crate::api::MoodApi;
use crate::api::error::ApiError;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventType, Update, Worker};
use crate::logging::LogLevel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

/// A dashboard panel fed by periodic polling.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Widget {
    Playback,
    Webcam,
    FaceDistance,
}

impl Widget {
    pub fn worker(self) -> Worker {
        match self {
            Widget::Playback => Worker::Playback,
            Widget::Webcam => Worker::Webcam,
            Widget::FaceDistance => Worker::FaceDistance,
        }
    }

    pub fn period(self, config: &WorkerConfig) -> Duration {
        match self {
            Widget::Playback => config.playback_poll,
            Widget::Webcam => config.webcam_poll,
            Widget::FaceDistance => config.face_distance_poll,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Widget::Playback => "player status",
            Widget::Webcam => "webcam status",
            Widget::FaceDistance => "face distance",
        }
    }
}

/// Fetch the current state of a panel once.
pub async fn fetch_widget(api: &dyn MoodApi, widget: Widget) -> Result<Update, ApiError> {
    match widget {
        Widget::Playback => api.current_playback().await.map(Update::Playback),
        Widget::Webcam => api.webcam_status().await.map(Update::Webcam),
        Widget::FaceDistance => api
            .face_distance()
            .await
            .map(|reading| Update::FaceDistance(reading.distance)),
    }
}

pub struct StatusPoller {
    api: Arc<dyn MoodApi>,
    event_sender: EventSender,
    widget: Widget,
    period: Duration,
    classifier: ErrorClassifier,
    failing: bool,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn MoodApi>,
        event_sender: EventSender,
        widget: Widget,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            api,
            event_sender,
            widget,
            period: widget.period(config),
            classifier: ErrorClassifier::new(),
            failing: false,
        }
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = ticker.tick() => {}
            }
            // A poll still waiting on the service is dropped on shutdown.
            let result = tokio::select! {
                _ = shutdown.recv() => break,
                result = fetch_widget(self.api.as_ref(), self.widget) => result,
            };
            self.report(result).await;
        }
    }

    /// Forward a poll result. Only the first failure in a row is surfaced;
    /// repeats are logged at debug level until a poll succeeds again.
    async fn report(&mut self, result: Result<Update, ApiError>) {
        let worker = self.widget.worker();
        match result {
            Ok(update) => {
                if self.failing {
                    self.failing = false;
                    self.event_sender
                        .send(
                            worker,
                            format!("Reconnected to {}", self.widget.label()),
                            EventType::Success,
                            LogLevel::Info,
                        )
                        .await;
                }
                self.event_sender.send_update(worker, update).await;
            }
            Err(e) => {
                let level = if self.failing {
                    LogLevel::Debug
                } else {
                    self.classifier.classify_api_error(&e)
                };
                self.failing = true;
                self.event_sender
                    .send(
                        worker,
                        format!("Failed to read {}: {}", self.widget.label(), e),
                        EventType::Error,
                        level,
                    )
                    .await;
                self.event_sender
                    .report_if_unauthenticated(worker, &e)
                    .await;
            }
        }
    }
}

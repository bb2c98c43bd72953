//! Push channel listener
//!
//! Holds the `db-updates` stream open and turns every database-change message
//! into a refresh request for the song sync worker.

use super::core::{EventSender, WorkerConfig};
use crate::api::MoodApi;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventType, Worker};
use crate::logging::LogLevel;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Why a single connection ended.
#[derive(Debug, PartialEq, Eq)]
enum Disconnect {
    /// The stream closed or failed; try again later.
    Dropped,
    /// The song sync worker is gone, nothing left to notify.
    NoReceiver,
    Shutdown,
}

pub struct PushListener {
    api: Arc<dyn MoodApi>,
    event_sender: EventSender,
    notify: mpsc::Sender<()>,
    reconnect_delay: Duration,
    classifier: ErrorClassifier,
}

impl PushListener {
    pub fn new(
        api: Arc<dyn MoodApi>,
        event_sender: EventSender,
        notify: mpsc::Sender<()>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            api,
            event_sender,
            notify,
            reconnect_delay: config.push_reconnect_delay,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Listen until shutdown, reconnecting after a fixed delay whenever the
    /// channel drops.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            match self.listen_once(&mut shutdown).await {
                Disconnect::Shutdown | Disconnect::NoReceiver => break,
                Disconnect::Dropped => {}
            }

            tokio::select! {
                _ = shutdown.recv() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
    }

    async fn listen_once(&self, shutdown: &mut broadcast::Receiver<()>) -> Disconnect {
        let connect = tokio::select! {
            _ = shutdown.recv() => return Disconnect::Shutdown,
            result = self.api.db_updates() => result,
        };

        let mut stream = match connect {
            Ok(stream) => {
                self.event_sender
                    .send(
                        Worker::PushListener,
                        "Listening for library updates".to_string(),
                        EventType::Success,
                        LogLevel::Debug,
                    )
                    .await;
                stream
            }
            Err(e) => {
                self.event_sender
                    .send(
                        Worker::PushListener,
                        format!("Push channel unavailable: {}", e),
                        EventType::Error,
                        self.classifier.classify_api_error(&e),
                    )
                    .await;
                self.event_sender
                    .report_if_unauthenticated(Worker::PushListener, &e)
                    .await;
                return Disconnect::Dropped;
            }
        };

        loop {
            let next = tokio::select! {
                _ = shutdown.recv() => return Disconnect::Shutdown,
                next = stream.next() => next,
            };

            match next {
                Some(Ok(message)) if message.is_db_update() => {
                    if self.notify.send(()).await.is_err() {
                        return Disconnect::NoReceiver;
                    }
                }
                // Other message types carry nothing for the song list.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.event_sender
                        .send(
                            Worker::PushListener,
                            format!("Push channel error: {}", e),
                            EventType::Error,
                            LogLevel::Debug,
                        )
                        .await;
                }
                None => {
                    self.event_sender
                        .send(
                            Worker::PushListener,
                            "Push channel closed, reconnecting".to_string(),
                            EventType::Waiting,
                            LogLevel::Debug,
                        )
                        .await;
                    return Disconnect::Dropped;
                }
            }
        }
    }
}

//! Spawning of the background workers behind a session

use crate::api::MoodApi;
use crate::consts::cli_consts::COMMAND_QUEUE_SIZE;
use crate::workers::auth_gate::run_auth_gate;
use crate::workers::controls::{ControlCommand, ControlHandler};
use crate::workers::core::{EventSender, WorkerConfig};
use crate::workers::push::PushListener;
use crate::workers::song_sync::SongSyncWorker;
use crate::workers::widgets::{StatusPoller, Widget};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Handles to the workers of a mounted dashboard.
pub struct DashboardWorkers {
    pub join_handles: Vec<JoinHandle<()>>,
    /// Keyboard actions for the control handler.
    pub controls: mpsc::Sender<ControlCommand>,
}

/// Check the session once in the background.
pub fn start_auth_gate(api: Arc<dyn MoodApi>, event_sender: EventSender) -> JoinHandle<()> {
    tokio::spawn(run_auth_gate(api, event_sender))
}

/// Mount the dashboard: song sync with its push listener, the three status
/// pollers, and the control handler. Everything stops on `shutdown`.
pub fn start_dashboard_workers(
    api: Arc<dyn MoodApi>,
    event_sender: EventSender,
    shutdown: &broadcast::Sender<()>,
    config: &WorkerConfig,
) -> DashboardWorkers {
    let mut join_handles = Vec::new();

    let (push_tx, push_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
    let song_sync = SongSyncWorker::new(api.clone(), event_sender.clone(), config);
    join_handles.push(tokio::spawn(song_sync.run(shutdown.subscribe(), push_rx)));

    let listener = PushListener::new(api.clone(), event_sender.clone(), push_tx, config);
    join_handles.push(tokio::spawn(listener.run(shutdown.subscribe())));

    for widget in [Widget::Playback, Widget::Webcam, Widget::FaceDistance] {
        let poller = StatusPoller::new(api.clone(), event_sender.clone(), widget, config);
        join_handles.push(tokio::spawn(poller.run(shutdown.subscribe())));
    }

    let (controls, commands) = mpsc::channel(COMMAND_QUEUE_SIZE);
    let handler = ControlHandler::new(api, event_sender, commands, config);
    join_handles.push(tokio::spawn(handler.run(shutdown.subscribe())));

    DashboardWorkers {
        join_handles,
        controls,
    }
}

/// Mount only the song list workers, for consoles without a dashboard.
pub fn start_song_workers(
    api: Arc<dyn MoodApi>,
    event_sender: EventSender,
    shutdown: &broadcast::Sender<()>,
    config: &WorkerConfig,
) -> Vec<JoinHandle<()>> {
    let (push_tx, push_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
    let song_sync = SongSyncWorker::new(api.clone(), event_sender.clone(), config);
    let listener = PushListener::new(api, event_sender, push_tx, config);
    vec![
        tokio::spawn(song_sync.run(shutdown.subscribe(), push_rx)),
        tokio::spawn(listener.run(shutdown.subscribe())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMoodApi;
    use crate::api::models::{FaceDistance, WebcamStatus};
    use crate::events::{Event, Update};
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    /// Unmounting stops every worker, including ones blocked on the network.
    async fn test_dashboard_workers_stop_on_shutdown() {
        let mut api = MockMoodApi::new();
        api.expect_enjoyed_songs().returning(|| Ok(vec![]));
        api.expect_db_updates()
            .returning(|| Ok(futures::stream::pending().boxed()));
        api.expect_current_playback().returning(|| Ok(None));
        api.expect_webcam_status()
            .returning(|| Ok(WebcamStatus::default()));
        api.expect_face_distance()
            .returning(|| Ok(FaceDistance::default()));
        let (tx, mut rx) = mpsc::channel::<Event>(256);
        let (shutdown_tx, _) = broadcast::channel(1);

        let workers = start_dashboard_workers(
            Arc::new(api),
            EventSender::new(tx),
            &shutdown_tx,
            &WorkerConfig::default(),
        );
        assert_eq!(workers.join_handles.len(), 6);

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();
        for handle in workers.join_handles {
            handle.await.unwrap();
        }

        let mut saw_songs = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event.update, Some(Update::SongsFetched { .. })) {
                saw_songs = true;
            }
        }
        assert!(saw_songs);
        assert!(workers.controls.is_closed());
    }
}

//! Song list synchronization
//!
//! Mount, push notifications and the fallback poll all go through the same
//! refresh request. Every request gets its own sequence number and its own
//! fetch; the dashboard drops responses older than the last one it applied.

use super::core::{EventSender, WorkerConfig};
use crate::api::MoodApi;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventType, Update, Worker};
use crate::logging::LogLevel;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// What caused a refresh request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum RefreshTrigger {
    Mount,
    Push,
    Poll,
}

/// Issues fetch-and-replace requests and tracks the ones still running.
pub struct SongRefresher {
    api: Arc<dyn MoodApi>,
    event_sender: EventSender,
    classifier: ErrorClassifier,
    last_seq: u64,
    in_flight: JoinSet<()>,
}

impl SongRefresher {
    pub fn new(api: Arc<dyn MoodApi>, event_sender: EventSender) -> Self {
        Self {
            api,
            event_sender,
            classifier: ErrorClassifier::new(),
            last_seq: 0,
            in_flight: JoinSet::new(),
        }
    }

    /// Start a fetch. Requests already in flight are left running; whichever
    /// carries the highest sequence number wins on the dashboard.
    pub fn request_refresh(&mut self, trigger: RefreshTrigger) -> u64 {
        self.last_seq += 1;
        let seq = self.last_seq;
        let api = self.api.clone();
        let events = self.event_sender.clone();
        let classifier = self.classifier.clone();

        self.in_flight.spawn(async move {
            events
                .send_update(Worker::SongSync, Update::FetchStarted { seq })
                .await;

            match api.enjoyed_songs().await {
                Ok(songs) => {
                    events
                        .send_event(
                            Event::new(
                                Worker::SongSync,
                                format!("Fetched {} songs ({} #{})", songs.len(), trigger, seq),
                                EventType::Refresh,
                                LogLevel::Debug,
                            )
                            .with_update(Update::SongsFetched { seq, songs }),
                        )
                        .await;
                }
                Err(e) => {
                    events
                        .send_event(
                            Event::new(
                                Worker::SongSync,
                                format!("Failed to fetch songs: {}", e),
                                EventType::Error,
                                classifier.classify_api_error(&e),
                            )
                            .with_update(Update::SongsFetchFailed { seq }),
                        )
                        .await;
                    events.report_if_unauthenticated(Worker::SongSync, &e).await;
                }
            }
        });

        seq
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Wait for one running fetch to finish.
    pub async fn reap_one(&mut self) -> Option<()> {
        self.in_flight.join_next().await.map(|_| ())
    }

    /// Cancel every running fetch.
    pub fn abort_all(&mut self) {
        self.in_flight.abort_all();
    }
}

/// Worker driving the three refresh triggers for one mounted dashboard.
pub struct SongSyncWorker {
    refresher: SongRefresher,
    config: WorkerConfig,
}

impl SongSyncWorker {
    pub fn new(api: Arc<dyn MoodApi>, event_sender: EventSender, config: &WorkerConfig) -> Self {
        Self {
            refresher: SongRefresher::new(api, event_sender),
            config: config.clone(),
        }
    }

    /// Run until shutdown. `push_notifications` delivers one `()` per push message.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<()>,
        mut push_notifications: mpsc::Receiver<()>,
    ) {
        self.refresher.request_refresh(RefreshTrigger::Mount);

        let period = self.config.song_poll_interval;
        let mut poll = interval_at(Instant::now() + period, period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut push_open = true;

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = poll.tick() => {
                    self.refresher.request_refresh(RefreshTrigger::Poll);
                }
                notification = push_notifications.recv(), if push_open => {
                    match notification {
                        Some(()) => {
                            self.refresher.request_refresh(RefreshTrigger::Push);
                        }
                        None => push_open = false,
                    }
                }
                Some(()) = self.refresher.reap_one(), if self.refresher.has_in_flight() => {}
            }
        }

        self.refresher.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMoodApi;
    use crate::api::error::ApiError;
    use crate::api::models::Song;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_api(calls: Arc<AtomicUsize>) -> MockMoodApi {
        let mut api = MockMoodApi::new();
        api.expect_enjoyed_songs().returning(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::<Song>::new())
        });
        api
    }

    fn drain(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    /// A push arriving while a poll is still running gets a fetch of its own.
    async fn test_push_during_in_flight_poll_is_not_lost() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(32);
        let mut refresher =
            SongRefresher::new(Arc::new(counting_api(calls.clone())), EventSender::new(tx));

        let poll_seq = refresher.request_refresh(RefreshTrigger::Poll);
        // The poll has not had a chance to run yet.
        let push_seq = refresher.request_refresh(RefreshTrigger::Push);
        assert_eq!((poll_seq, push_seq), (1, 2));

        while refresher.reap_one().await.is_some() {}
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let mut fetched: Vec<u64> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e.update {
                Some(Update::SongsFetched { seq, .. }) => Some(seq),
                _ => None,
            })
            .collect();
        fetched.sort();
        assert_eq!(fetched, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_fetch_reports_its_sequence() {
        let mut api = MockMoodApi::new();
        api.expect_enjoyed_songs().returning(|| {
            Err(ApiError::Http {
                status: 502,
                message: "bad gateway".to_string(),
            })
        });
        let (tx, mut rx) = mpsc::channel(8);
        let mut refresher = SongRefresher::new(Arc::new(api), EventSender::new(tx));

        refresher.request_refresh(RefreshTrigger::Mount);
        while refresher.reap_one().await.is_some() {}

        let events = drain(&mut rx);
        assert_eq!(events[0].update, Some(Update::FetchStarted { seq: 1 }));
        assert_eq!(events[1].update, Some(Update::SongsFetchFailed { seq: 1 }));
        assert_eq!(events[1].log_level, LogLevel::Warn);
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_refused_session_asks_ui_to_leave_dashboard() {
        let mut api = MockMoodApi::new();
        api.expect_enjoyed_songs().returning(|| {
            Err(ApiError::Http {
                status: 401,
                message: "token expired".to_string(),
            })
        });
        let (tx, mut rx) = mpsc::channel(8);
        let mut refresher = SongRefresher::new(Arc::new(api), EventSender::new(tx));

        refresher.request_refresh(RefreshTrigger::Poll);
        while refresher.reap_one().await.is_some() {}

        let updates: Vec<Update> = drain(&mut rx).into_iter().filter_map(|e| e.update).collect();
        assert_eq!(
            updates,
            vec![
                Update::FetchStarted { seq: 1 },
                Update::SongsFetchFailed { seq: 1 },
                Update::SessionExpired,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_then_poll_every_period() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, _rx) = mpsc::channel(256);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (_push_tx, push_rx) = mpsc::channel(8);
        let worker = SongSyncWorker::new(
            Arc::new(counting_api(calls.clone())),
            EventSender::new(tx),
            &WorkerConfig::default(),
        );
        let handle = tokio::spawn(worker.run(shutdown_tx.subscribe(), push_rx));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_notification_triggers_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, _rx) = mpsc::channel(256);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (push_tx, push_rx) = mpsc::channel(8);
        let worker = SongSyncWorker::new(
            Arc::new(counting_api(calls.clone())),
            EventSender::new(tx),
            &WorkerConfig::default(),
        );
        let handle = tokio::spawn(worker.run(shutdown_tx.subscribe(), push_rx));

        tokio::time::sleep(Duration::from_millis(10)).await;
        push_tx.send(()).await.unwrap();
        push_tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // A closed push channel leaves the poll running.
        drop(push_tx);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    /// No request goes out once the dashboard is unmounted.
    async fn test_shutdown_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, _rx) = mpsc::channel(256);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (push_tx, push_rx) = mpsc::channel(8);
        let worker = SongSyncWorker::new(
            Arc::new(counting_api(calls.clone())),
            EventSender::new(tx),
            &WorkerConfig::default(),
        );
        let handle = tokio::spawn(worker.run(shutdown_tx.subscribe(), push_rx));

        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
        let after_unmount = calls.load(Ordering::SeqCst);

        let _ = push_tx.send(()).await;
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_unmount);
    }
}

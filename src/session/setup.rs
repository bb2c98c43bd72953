//! Session setup and initialization

use crate::api::MoodApi;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::events::Event;
use crate::runtime::start_auth_gate;
use crate::workers::core::{EventSender, WorkerConfig};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    pub api: Arc<dyn MoodApi>,
    /// Cloned into every worker started later in the session
    pub event_sender: EventSender,
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all workers
    pub shutdown_sender: broadcast::Sender<()>,
    pub worker_config: WorkerConfig,
}

/// Create the event and shutdown channels and start the session check.
///
/// Nothing else is requested from the service until the check reports an
/// authenticated session.
pub fn setup_session(api: Arc<dyn MoodApi>, worker_config: WorkerConfig) -> SessionData {
    let (sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let event_sender = EventSender::new(sender);
    let (shutdown_sender, _) = broadcast::channel(1);

    let join_handles = vec![start_auth_gate(api.clone(), event_sender.clone())];

    SessionData {
        api,
        event_sender,
        event_receiver,
        join_handles,
        shutdown_sender,
        worker_config,
    }
}

//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::commands::print_song_list;
use crate::events::{AuthOutcome, Update};
use crate::mood::Emotion;
use crate::pretty::print_cmd_warn;
use crate::runtime::start_song_workers;
use crate::ui::dashboard::{GateState, ViewState};
use std::error::Error;

/// Runs the application in headless mode
///
/// Worker events go to the `log` facade, and the ranked song list is printed
/// whenever a newer response is applied. Ctrl+C stops every worker.
pub async fn run_headless_mode(
    mut session: SessionData,
    mood: Option<Emotion>,
) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", session.api.environment());

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let mut view = ViewState::new(mood);

    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                event.log();
                let Some(update) = event.update else { continue };
                match update {
                    Update::AuthResolved(outcome) => {
                        view.gate_resolved(&outcome);
                        match outcome {
                            AuthOutcome::Authenticated => {
                                session.join_handles.extend(start_song_workers(
                                    session.api.clone(),
                                    session.event_sender.clone(),
                                    &session.shutdown_sender,
                                    &session.worker_config,
                                ));
                            }
                            AuthOutcome::Redirect { auth_url } => {
                                print_cmd_warn!(
                                    "Not authenticated",
                                    "Log in at {}",
                                    auth_url.as_deref().unwrap_or("the web app")
                                );
                                let _ = session.shutdown_sender.send(());
                            }
                        }
                    }
                    Update::FetchStarted { seq } => view.fetch_started(seq),
                    Update::SongsFetched { seq, songs } => {
                        if view.fetch_succeeded(seq, songs) {
                            print_song_list(&view.ranked, view.mood);
                        }
                    }
                    Update::SongsFetchFailed { seq } => view.fetch_failed(seq),
                    Update::SessionExpired if view.gate != GateState::Redirecting => {
                        view.gate_resolved(&AuthOutcome::Redirect { auth_url: None });
                        print_cmd_warn!(
                            "Session expired",
                            "Run `spotilike login` to log in again."
                        );
                        let _ = session.shutdown_sender.send(());
                    }
                    _ => {}
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    // Wait for workers to finish
    print_session_shutdown();
    for handle in session.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

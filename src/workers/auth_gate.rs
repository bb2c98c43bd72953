//! Session check run before any data is requested

use super::core::EventSender;
use crate::api::MoodApi;
use crate::error_classifier::ErrorClassifier;
use crate::events::{AuthOutcome, Event, EventType, Update, Worker};
use crate::logging::LogLevel;
use std::sync::Arc;

/// Decide whether the dashboard may mount.
///
/// A failed status check counts as unauthenticated. The login URL is looked
/// up only on the redirect path, and its failure is not fatal.
pub async fn check_session(api: &dyn MoodApi, events: &EventSender) -> AuthOutcome {
    let classifier = ErrorClassifier::new();
    match api.auth_status().await {
        Ok(true) => return AuthOutcome::Authenticated,
        Ok(false) => {}
        Err(e) => {
            events
                .send(
                    Worker::AuthGate,
                    format!("Auth status check failed: {}", e),
                    EventType::Error,
                    classifier.classify_api_error(&e),
                )
                .await;
        }
    }

    let auth_url = match api.auth_url().await {
        Ok(url) => url,
        Err(e) => {
            events
                .send(
                    Worker::AuthGate,
                    format!("Could not get login URL: {}", e),
                    EventType::Error,
                    LogLevel::Debug,
                )
                .await;
            None
        }
    };
    AuthOutcome::Redirect { auth_url }
}

/// Run the gate once and report the outcome to the UI.
pub async fn run_auth_gate(api: Arc<dyn MoodApi>, events: EventSender) {
    events
        .send(
            Worker::AuthGate,
            "Checking session...".to_string(),
            EventType::Waiting,
            LogLevel::Debug,
        )
        .await;

    let outcome = check_session(api.as_ref(), &events).await;
    let (message, event_type) = match &outcome {
        AuthOutcome::Authenticated => ("Session authenticated".to_string(), EventType::Success),
        AuthOutcome::Redirect { .. } => (
            "Not authenticated, login required".to_string(),
            EventType::Error,
        ),
    };
    events
        .send_event(
            Event::new(Worker::AuthGate, message, event_type, LogLevel::Info)
                .with_update(Update::AuthResolved(outcome)),
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMoodApi;
    use crate::api::error::ApiError;
    use tokio::sync::mpsc;

    fn sender() -> (EventSender, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(16);
        (EventSender::new(tx), rx)
    }

    #[tokio::test]
    async fn test_authenticated_session_skips_login_url() {
        let mut api = MockMoodApi::new();
        api.expect_auth_status().times(1).returning(|| Ok(true));
        api.expect_auth_url().never();
        let (events, _rx) = sender();

        assert_eq!(
            check_session(&api, &events).await,
            AuthOutcome::Authenticated
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_session_redirects_with_url() {
        let mut api = MockMoodApi::new();
        api.expect_auth_status().returning(|| Ok(false));
        api.expect_auth_url()
            .returning(|| Ok(Some("https://accounts.example/authorize".to_string())));
        let (events, _rx) = sender();

        assert_eq!(
            check_session(&api, &events).await,
            AuthOutcome::Redirect {
                auth_url: Some("https://accounts.example/authorize".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_failed_check_redirects_without_crashing() {
        let mut api = MockMoodApi::new();
        api.expect_auth_status().returning(|| {
            Err(ApiError::Http {
                status: 500,
                message: "boom".to_string(),
            })
        });
        api.expect_auth_url()
            .returning(|| Err(ApiError::Stream(std::io::Error::other("closed"))));
        let (events, mut rx) = sender();

        assert_eq!(
            check_session(&api, &events).await,
            AuthOutcome::Redirect { auth_url: None }
        );
        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::Error);
        assert_eq!(first.log_level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_run_auth_gate_reports_outcome() {
        let mut api = MockMoodApi::new();
        api.expect_auth_status().returning(|| Ok(true));
        let (events, mut rx) = sender();

        run_auth_gate(Arc::new(api), events).await;

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert_eq!(
            last.unwrap().update,
            Some(Update::AuthResolved(AuthOutcome::Authenticated))
        );
    }
}

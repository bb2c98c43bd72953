//! Player Service Client
//!
//! A JSON-over-HTTP client for the local player service, plus the SSE push channel.

use crate::api::error::ApiError;
use crate::api::models::{
    AdjustVolumeRequest, AuthStatus, AuthUrlResponse, CurrentEmotion, CurrentPlayback, FaceDistance,
    PlayMusicRequest, PlayMusicResponse, PlaybackCommand, SetVolumeRequest, SituationAnalysis,
    SituationRequest, Song, SongsResponse, VolumeAdjustment, WebcamStatus,
};
use crate::api::sse::push_messages;
use crate::api::{MoodApi, PushStream};
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use futures::TryStreamExt;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::io::StreamReader;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("spotilike-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
}

impl ApiClient {
    pub fn new(environment: Environment) -> Result<Self, ApiError> {
        // No overall timeout here: the push stream stays open indefinitely.
        // Plain calls get theirs per request.
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.timeout(http::request_timeout()).send().await?;
        Self::handle_response_status(response).await
    }

    /// Decode from the raw body so malformed payloads surface as `ApiError::Decode`.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.build_url(endpoint))).await?;
        Self::decode(response).await
    }

    async fn post_request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.build_url(endpoint)).json(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn post_request_no_response(
        &self,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), ApiError> {
        let mut request = self.client.post(self.build_url(endpoint));
        request = match body {
            Some(body) => request.json(body),
            None => request.header("Content-Type", "application/json"),
        };
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MoodApi for ApiClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn auth_status(&self) -> Result<bool, ApiError> {
        let status: AuthStatus = self.get_request("api/auth/status").await?;
        if let Some(error) = &status.error {
            log::debug!("Auth status reported an error: {}", error);
        }
        Ok(status.authenticated)
    }

    async fn auth_url(&self) -> Result<Option<String>, ApiError> {
        let response: AuthUrlResponse = self.get_request("api/auth/spotify").await?;
        Ok(response.auth_url)
    }

    async fn enjoyed_songs(&self) -> Result<Vec<Song>, ApiError> {
        let response: SongsResponse = self.get_request("api/enjoyed-songs").await?;
        Ok(response.songs)
    }

    async fn db_updates(&self) -> Result<PushStream, ApiError> {
        let response = self
            .client
            .get(self.build_url("api/db-updates"))
            .header("Accept", "text/event-stream")
            .send()
            .await?;
        let response = Self::handle_response_status(response).await?;

        let body = Box::pin(response.bytes_stream().map_err(std::io::Error::other));
        Ok(push_messages(StreamReader::new(body)))
    }

    async fn analyze_situation(&self, situation: &str) -> Result<SituationAnalysis, ApiError> {
        let situation = situation.trim();
        if situation.is_empty() {
            return Err(ApiError::InvalidInput(
                "No situation text provided".to_string(),
            ));
        }
        self.post_request("api/analyze-situation", &SituationRequest { situation })
            .await
    }

    async fn play_music(
        &self,
        request: PlayMusicRequest,
    ) -> Result<PlayMusicResponse, ApiError> {
        if request.sentiment.trim().is_empty() || request.keyword.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "Sentiment and keyword are required".to_string(),
            ));
        }
        self.post_request("api/play-music", &request).await
    }

    async fn current_playback(&self) -> Result<Option<CurrentPlayback>, ApiError> {
        let response = self
            .send(self.client.get(self.build_url("api/current-playback")))
            .await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let value: serde_json::Value = Self::decode(response).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn playback(&self, command: PlaybackCommand) -> Result<(), ApiError> {
        let endpoint = format!("api/playback/{}", command.action());
        self.post_request_no_response(&endpoint, command.body().as_ref())
            .await
    }

    async fn webcam_status(&self) -> Result<WebcamStatus, ApiError> {
        self.get_request("api/webcam/status").await
    }

    async fn current_emotion(&self) -> Result<Option<String>, ApiError> {
        let reading: CurrentEmotion = self.get_request("api/current-emotion").await?;
        Ok(reading.emotion)
    }

    async fn set_webcam(&self, active: bool) -> Result<(), ApiError> {
        let endpoint = if active {
            "api/webcam/start"
        } else {
            "api/webcam/stop"
        };
        self.post_request_no_response(endpoint, None).await
    }

    async fn face_distance(&self) -> Result<FaceDistance, ApiError> {
        self.get_request("api/face-distance").await
    }

    async fn adjust_volume(&self, distance: f64) -> Result<VolumeAdjustment, ApiError> {
        self.post_request("api/adjust-volume", &AdjustVolumeRequest { distance })
            .await
    }

    async fn set_volume(&self, volume_percent: u8) -> Result<(), ApiError> {
        let body = serde_json::to_value(SetVolumeRequest {
            volume_percent: volume_percent.min(100),
        })?;
        self.post_request_no_response("api/set-spotify-volume", Some(&body))
            .await
    }
}

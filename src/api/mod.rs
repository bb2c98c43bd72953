use crate::api::error::ApiError;
use crate::api::models::{
    CurrentPlayback, FaceDistance, PlayMusicRequest, PlayMusicResponse, PlaybackCommand,
    PushMessage, SituationAnalysis, Song, VolumeAdjustment, WebcamStatus,
};
use crate::environment::Environment;
use futures::stream::BoxStream;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod models;
pub mod sse;

#[cfg(test)]
use mockall::automock;

/// Stream of messages from the `db-updates` push channel.
pub type PushStream = BoxStream<'static, Result<PushMessage, ApiError>>;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MoodApi: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Whether the current session is authenticated with the music provider.
    async fn auth_status(&self) -> Result<bool, ApiError>;

    /// Authorization URL to open in a browser to log in.
    async fn auth_url(&self) -> Result<Option<String>, ApiError>;

    /// The enjoyed-songs list, in server order.
    async fn enjoyed_songs(&self) -> Result<Vec<Song>, ApiError>;

    /// Open the push channel announcing database changes.
    async fn db_updates(&self) -> Result<PushStream, ApiError>;

    /// Derive a sentiment and a search keyword from free text.
    async fn analyze_situation(&self, situation: &str) -> Result<SituationAnalysis, ApiError>;

    /// Queue songs matching a sentiment and keyword.
    async fn play_music(&self, request: PlayMusicRequest)
    -> Result<PlayMusicResponse, ApiError>;

    /// Current player state, `None` when nothing is playing.
    async fn current_playback(&self) -> Result<Option<CurrentPlayback>, ApiError>;

    /// Send a transport action to the player.
    async fn playback(&self, command: PlaybackCommand) -> Result<(), ApiError>;

    async fn webcam_status(&self) -> Result<WebcamStatus, ApiError>;

    /// Emotion label last detected on camera.
    async fn current_emotion(&self) -> Result<Option<String>, ApiError>;

    /// Start or stop emotion capture.
    async fn set_webcam(&self, active: bool) -> Result<(), ApiError>;

    async fn face_distance(&self) -> Result<FaceDistance, ApiError>;

    /// Let the service pick a volume from the viewer's distance to the screen.
    async fn adjust_volume(&self, distance: f64) -> Result<VolumeAdjustment, ApiError>;

    async fn set_volume(&self, volume_percent: u8) -> Result<(), ApiError>;
}

//! Wire types for the player service.
//!
//! The service is loosely typed: most fields are optional and a few arrive
//! under several names. Everything here deserializes leniently, except the
//! envelope of a response (`songs`, `authenticated`, ...), whose absence
//! makes the payload malformed.

use crate::mood::Emotion;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// =============================================================================
// SONGS
// =============================================================================

/// A song as ranked by the service, with per-emotion affinity scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSong", into = "RawSong")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Artwork reference, never fetched by the terminal client.
    pub image: Option<String>,
    /// Display string such as "3:24".
    pub duration: String,
    /// Dominant-emotion label as reported by the service.
    pub emotion: Option<String>,
    /// Generic enjoyment score.
    pub score: Option<f64>,
    /// Affinity per emotion. A missing entry means the service did not score it.
    pub affinities: BTreeMap<Emotion, f64>,
}

impl Song {
    pub fn affinity(&self, emotion: Emotion) -> Option<f64> {
        self.affinities.get(&emotion).copied()
    }

    pub fn dominant_emotion(&self) -> Option<Emotion> {
        self.emotion.as_deref().and_then(Emotion::from_label)
    }

    /// Enjoyment score, 0 when the service did not send one.
    pub fn enjoyment(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Song as it appears on the wire: affinities are top-level keys.
///
/// Alternate field names (`_id`, `name`, `enjoyment`, ...) are read from
/// `extra`, so a record carrying both spellings never fails; the canonical
/// name wins.
#[derive(Serialize, Deserialize)]
struct RawSong {
    #[serde(default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    artist: String,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    duration: String,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    emotion: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    score: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawSong {
    fn alias_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.extra.get(*key).and_then(value_text))
    }

    fn alias_label(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.extra.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
    }
}

impl From<RawSong> for Song {
    fn from(raw: RawSong) -> Self {
        let affinities = raw
            .extra
            .iter()
            .filter_map(|(key, value)| {
                let emotion = Emotion::from_label(key)?;
                let score = value.as_f64().filter(|v| v.is_finite())?;
                Some((emotion, score))
            })
            .collect();

        let id = if raw.id.is_empty() {
            raw.alias_text(&["_id"]).unwrap_or_default()
        } else {
            raw.id.clone()
        };
        let title = if raw.title.is_empty() {
            raw.alias_text(&["name"]).unwrap_or_default()
        } else {
            raw.title.clone()
        };
        let image = raw
            .image
            .clone()
            .or_else(|| raw.alias_label(&["album_art", "image_url"]));
        let emotion = raw
            .emotion
            .clone()
            .or_else(|| raw.alias_label(&["dominant_emotion"]));
        let score = raw.score.or_else(|| {
            raw.extra
                .get("enjoyment")
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
        });

        Song {
            id,
            title,
            artist: raw.artist,
            image,
            duration: raw.duration,
            emotion,
            score,
            affinities,
        }
    }
}

impl From<Song> for RawSong {
    fn from(song: Song) -> Self {
        let extra = song
            .affinities
            .into_iter()
            .filter_map(|(emotion, score)| {
                serde_json::Number::from_f64(score)
                    .map(|n| (emotion.to_string(), Value::Number(n)))
            })
            .collect();

        RawSong {
            id: song.id,
            title: song.title,
            artist: song.artist,
            image: song.image,
            duration: song.duration,
            emotion: song.emotion,
            score: song.score,
            extra,
        }
    }
}

/// Text form of a scalar; `None` for null, arrays and objects.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_text)
        .unwrap_or_default())
}

/// A label is kept only when it is a non-empty string.
fn lenient_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite()))
}

/// Keep every readable song; entries that are not song objects are dropped.
fn readable_songs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Song>, D::Error> {
    let entries = Vec::<Value>::deserialize(deserializer)?;
    let total = entries.len();
    let songs: Vec<Song> = entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if songs.len() < total {
        log::debug!("Skipped {} unreadable song records", total - songs.len());
    }
    Ok(songs)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongsResponse {
    #[serde(deserialize_with = "readable_songs")]
    pub songs: Vec<Song>,
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUrlResponse {
    #[serde(default)]
    pub auth_url: Option<String>,
}

// =============================================================================
// PUSH CHANNEL
// =============================================================================

/// A message on the `db-updates` push channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl PushMessage {
    pub fn is_db_update(&self) -> bool {
        self.kind == crate::consts::cli_consts::song_sync::DB_UPDATE_MESSAGE
    }
}

// =============================================================================
// SITUATION ANALYSIS
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SituationRequest<'a> {
    pub situation: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationAnalysis {
    pub sentiment: String,
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayMusicRequest {
    pub sentiment: String,
    pub keyword: String,
    pub num_songs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayedTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayMusicResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub tracks: Vec<PlayedTrack>,
}

// =============================================================================
// PLAYBACK
// =============================================================================

#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RepeatMode {
    #[default]
    Off,
    Track,
    Context,
}

impl RepeatMode {
    /// Next mode in the off → context → track → off cycle.
    pub fn next(self) -> RepeatMode {
        match self {
            RepeatMode::Off => RepeatMode::Context,
            RepeatMode::Context => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Off,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackTrack {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(alias = "title", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub artist: String,
    #[serde(alias = "image", default)]
    pub album_art: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentPlayback {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(alias = "item", default)]
    pub track: Option<PlaybackTrack>,
    #[serde(default)]
    pub progress_ms: u64,
    #[serde(alias = "shuffle", default)]
    pub shuffle_state: bool,
    #[serde(alias = "repeat", default)]
    pub repeat_state: RepeatMode,
    #[serde(default)]
    pub volume_percent: Option<u8>,
}

impl CurrentPlayback {
    /// Fraction of the current track already played, in `[0, 1]`.
    pub fn progress_ratio(&self) -> f64 {
        match &self.track {
            Some(track) if track.duration_ms > 0 => {
                (self.progress_ms as f64 / track.duration_ms as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

/// Transport actions accepted by `/api/playback/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Next,
    Previous,
    Shuffle(bool),
    Repeat(RepeatMode),
    Seek { position_ms: u64 },
}

impl PlaybackCommand {
    pub fn action(&self) -> &'static str {
        match self {
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Next => "next",
            PlaybackCommand::Previous => "previous",
            PlaybackCommand::Shuffle(_) => "shuffle",
            PlaybackCommand::Repeat(_) => "repeat",
            PlaybackCommand::Seek { .. } => "seek",
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            PlaybackCommand::Shuffle(state) => Some(serde_json::json!({ "state": state })),
            PlaybackCommand::Repeat(mode) => Some(serde_json::json!({ "state": mode })),
            PlaybackCommand::Seek { position_ms } => {
                Some(serde_json::json!({ "position_ms": position_ms }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// WEBCAM & VOLUME
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebcamStatus {
    #[serde(default)]
    pub webcam_active: bool,
    #[serde(default)]
    pub current_emotion: Option<String>,
}

/// Last emotion detected by the webcam, `None` before any face was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CurrentEmotion {
    #[serde(default, deserialize_with = "lenient_label")]
    pub emotion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FaceDistance {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdjustVolumeRequest {
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VolumeAdjustment {
    #[serde(alias = "volume_percent", default)]
    pub volume: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetVolumeRequest {
    pub volume_percent: u8,
}

//! One-shot subcommands talking to the player service.

use crate::api::MoodApi;
use crate::api::error::ApiError;
use crate::api::models::{PlayMusicRequest, PlaybackCommand, RepeatMode, Song};
use crate::config::Config;
use crate::environment::Environment;
use crate::mood::{Emotion, emoji_for_label};
use crate::pretty::{handle_cmd_error, print_cmd_error, print_cmd_info, print_cmd_warn};
use crate::ranking::rank_songs;
use std::error::Error;
use std::path::Path;

type CmdResult = Result<(), Box<dyn Error>>;

/// Print an API failure, with a login hint when the session was refused.
fn report_api_error(context: &str, error: ApiError) -> Box<dyn Error> {
    if error.is_unauthenticated() {
        print_cmd_error!(context, "Not logged in. Run `spotilike login` to get a login URL.");
    } else {
        print_cmd_error!(context, "{}", error);
    }
    Box::new(error)
}

/// Report whether the session is authenticated.
pub async fn status(api: &dyn MoodApi) -> CmdResult {
    let authenticated = api
        .auth_status()
        .await
        .map_err(|e| report_api_error("Failed to check session.", e))?;

    if authenticated {
        print_cmd_info!(
            "✅ Authenticated",
            "Connected to {} with a valid session.",
            api.environment().api_url()
        );
    } else {
        print_cmd_warn!(
            "Not authenticated",
            "Run `spotilike login` to get a login URL."
        );
    }
    Ok(())
}

/// Print the provider authorization URL.
pub async fn login(api: &dyn MoodApi) -> CmdResult {
    let url = api
        .auth_url()
        .await
        .map_err(|e| report_api_error("Failed to get login URL.", e))?;
    match url {
        Some(url) => print_cmd_info!("Open this URL in a browser to log in:", "{}", url),
        None => print_cmd_warn!(
            "No login URL",
            "The service did not return one. Log in through the web app."
        ),
    }
    Ok(())
}

/// One line of the song listing.
pub fn format_song_line(position: usize, song: &Song, mood: Option<Emotion>) -> String {
    let score = match mood {
        Some(m) => song.affinity(m),
        None => song.score,
    };
    format!(
        "{:>3}. {} {} - {} [{}] {}",
        position,
        emoji_for_label(song.emotion.as_deref()),
        song.title,
        song.artist,
        song.duration,
        score
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string())
    )
}

pub fn print_song_list(songs: &[Song], mood: Option<Emotion>) {
    let heading = match mood {
        Some(m) => format!("{} songs ranked for {} {}", songs.len(), m.emoji(), m),
        None => format!("{} songs in server order", songs.len()),
    };
    let lines: Vec<String> = songs
        .iter()
        .enumerate()
        .map(|(i, song)| format_song_line(i + 1, song, mood))
        .collect();
    print_cmd_info!(heading, "{}", lines.join("\n"));
}

/// Fetch the enjoyed songs once and print them ranked for `mood`.
pub async fn songs(api: &dyn MoodApi, mood: Option<Emotion>) -> CmdResult {
    let songs = api
        .enjoyed_songs()
        .await
        .map_err(|e| report_api_error("Failed to fetch songs.", e))?;
    print_song_list(&rank_songs(&songs, mood), mood);
    Ok(())
}

/// Turn a free-text situation into a sentiment and keyword, and optionally
/// queue matching songs.
pub async fn analyze(api: &dyn MoodApi, situation: &str, play: bool, num_songs: u32) -> CmdResult {
    let situation = situation.trim();
    if situation.is_empty() {
        print_cmd_error!("❌ Describe your situation first.");
        return Err(Box::from("situation must not be empty"));
    }

    let analysis = api
        .analyze_situation(situation)
        .await
        .map_err(|e| report_api_error("Failed to analyze situation.", e))?;
    print_cmd_info!(
        "Situation analyzed",
        "Sentiment: {}\nKeyword: {}",
        analysis.sentiment,
        analysis.keyword
    );

    if play {
        play_music(api, &analysis.sentiment, &analysis.keyword, num_songs).await?;
    }
    Ok(())
}

pub async fn play_music(
    api: &dyn MoodApi,
    sentiment: &str,
    keyword: &str,
    num_songs: u32,
) -> CmdResult {
    let response = api
        .play_music(PlayMusicRequest {
            sentiment: sentiment.to_string(),
            keyword: keyword.to_string(),
            num_songs,
        })
        .await
        .map_err(|e| report_api_error("Failed to start playback.", e))?;

    let tracks: Vec<String> = response
        .tracks
        .iter()
        .map(|t| format!("  {} - {}", t.name, t.artist))
        .collect();
    let heading = response
        .message
        .unwrap_or_else(|| format!("Queued {} tracks", response.tracks.len()));
    print_cmd_info!(heading, "{}", tracks.join("\n"));
    Ok(())
}

/// Build a transport command from its command-line form.
pub fn parse_playback_command(action: &str, arg: Option<&str>) -> Result<PlaybackCommand, String> {
    let command = match action.to_ascii_lowercase().as_str() {
        "play" => PlaybackCommand::Play,
        "pause" => PlaybackCommand::Pause,
        "next" => PlaybackCommand::Next,
        "previous" | "prev" => PlaybackCommand::Previous,
        "shuffle" => {
            let state = match arg.map(|a| a.to_ascii_lowercase()).as_deref() {
                Some("on") | Some("true") => true,
                Some("off") | Some("false") => false,
                Some(other) => return Err(format!("Invalid shuffle state: {}", other)),
                None => return Err("shuffle needs on or off".to_string()),
            };
            PlaybackCommand::Shuffle(state)
        }
        "repeat" => {
            let mode = arg
                .ok_or_else(|| "repeat needs off, track or context".to_string())?
                .parse::<RepeatMode>()
                .map_err(|_| "repeat needs off, track or context".to_string())?;
            PlaybackCommand::Repeat(mode)
        }
        "seek" => {
            let position_ms = arg
                .ok_or_else(|| "seek needs a position in milliseconds".to_string())?
                .parse::<u64>()
                .map_err(|e| format!("Invalid seek position: {}", e))?;
            PlaybackCommand::Seek { position_ms }
        }
        other => return Err(format!("Unknown playback action: {}", other)),
    };
    Ok(command)
}

pub async fn playback(api: &dyn MoodApi, command: PlaybackCommand) -> CmdResult {
    api.playback(command)
        .await
        .map_err(|e| report_api_error("Playback action failed.", e))?;

    match api.current_playback().await {
        Ok(Some(current)) => {
            let track = current
                .track
                .as_ref()
                .map(|t| format!("{} - {}", t.name, t.artist))
                .unwrap_or_else(|| "unknown track".to_string());
            print_cmd_info!(
                format!("✅ {}", command.action()),
                "{} {}",
                if current.is_playing { "▶" } else { "⏸" },
                track
            );
        }
        Ok(None) => print_cmd_info!(format!("✅ {}", command.action()), "Nothing playing."),
        // The action itself went through.
        Err(e) => log::debug!("Could not read player state: {}", e),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WebcamAction {
    Status,
    Start,
    Stop,
}

pub async fn webcam(api: &dyn MoodApi, action: WebcamAction) -> CmdResult {
    match action {
        WebcamAction::Start | WebcamAction::Stop => {
            api.set_webcam(action == WebcamAction::Start)
                .await
                .map_err(|e| report_api_error("Failed to toggle webcam.", e))?;
        }
        WebcamAction::Status => {}
    }

    let status = api
        .webcam_status()
        .await
        .map_err(|e| report_api_error("Failed to read webcam status.", e))?;
    let detected = status.current_emotion.as_deref();
    print_cmd_info!(
        format!("Webcam {}", if status.webcam_active { "on" } else { "off" }),
        "Detected: {} {}",
        emoji_for_label(detected),
        detected.unwrap_or("no face")
    );
    Ok(())
}

/// Print the emotion the webcam detected last.
pub async fn current_emotion(api: &dyn MoodApi) -> CmdResult {
    let detected = api
        .current_emotion()
        .await
        .map_err(|e| report_api_error("Failed to read current emotion.", e))?;
    match detected.as_deref() {
        Some(label) => print_cmd_info!(
            "Current emotion",
            "{} {}",
            emoji_for_label(Some(label)),
            label
        ),
        None => print_cmd_warn!(
            "No emotion detected",
            "Start the webcam with `spotilike webcam start`."
        ),
    }
    Ok(())
}

/// Set the volume, or let the service pick one from the viewer's distance.
pub async fn volume(api: &dyn MoodApi, percent: Option<u8>, auto: bool) -> CmdResult {
    if let Some(percent) = percent {
        let percent = percent.min(100);
        api.set_volume(percent)
            .await
            .map_err(|e| report_api_error("Failed to set volume.", e))?;
        print_cmd_info!("✅ Volume set", "{}%", percent);
        return Ok(());
    }

    let reading = api
        .face_distance()
        .await
        .map_err(|e| report_api_error("Failed to read face distance.", e))?;
    let Some(distance) = reading.distance else {
        print_cmd_warn!("No face detected", "Is the webcam on? Try `spotilike webcam start`.");
        return Ok(());
    };

    if !auto {
        print_cmd_info!("Face distance", "{:.0} cm", distance);
        return Ok(());
    }

    let adjustment = api
        .adjust_volume(distance)
        .await
        .map_err(|e| report_api_error("Failed to adjust volume.", e))?;
    match adjustment.volume {
        Some(v) => print_cmd_info!("✅ Volume adjusted", "{}% for {:.0} cm", v, distance),
        None => print_cmd_info!("✅ Volume adjusted", "for {:.0} cm", distance),
    }
    Ok(())
}

/// Update the stored settings. Values not given are kept.
pub fn configure(
    config_path: &Path,
    api_url: Option<String>,
    default_mood: Option<Emotion>,
) -> CmdResult {
    let mut config = Config::load_or_default(config_path)
        .map_err(|e| handle_cmd_error!(e, "Failed to load config."))?;

    if let Some(url) = api_url {
        // Reject values the session could not use later.
        url.parse::<Environment>()?;
        config.api_url = Some(url);
    }
    if default_mood.is_some() {
        config.default_mood = default_mood;
    }

    config
        .save(config_path)
        .map_err(|e| handle_cmd_error!(e, "Failed to save config."))?;
    print_cmd_info!(
        "✅ Configuration saved",
        "API URL: {}\nDefault mood: {}\nFile: {}",
        config.api_url.as_deref().unwrap_or("(default)"),
        config
            .default_mood
            .map(|m| m.to_string())
            .unwrap_or_else(|| "(none)".to_string()),
        config_path.display()
    );
    Ok(())
}

mod api;
mod commands;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod mood;
mod pretty;
mod ranking;
mod runtime;
mod session;
mod ui;
mod workers;

use crate::api::{ApiClient, MoodApi};
use crate::commands::WebcamAction;
use crate::config::{Config, api_url_from_env, get_config_path};
use crate::consts::cli_consts::DEFAULT_NUM_SONGS;
use crate::logging::init_cli_logger;
use crate::mood::Emotion;
use crate::pretty::handle_cmd_error;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use crate::ui::UIConfig;
use crate::workers::core::WorkerConfig;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Origin of the player service, e.g. http://127.0.0.1:5001
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the mood dashboard
    Start {
        /// Print activity to the console instead of opening the dashboard
        #[arg(long, default_value_t = false)]
        headless: bool,

        /// Mood to rank songs for when the dashboard opens
        #[arg(long, value_name = "MOOD")]
        mood: Option<Emotion>,

        /// Paint a dark background behind the dashboard
        #[arg(long = "with-background", action = clap::ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Check whether the session is authenticated
    Status,
    /// Print the URL to log in with the music provider
    Login,
    /// List enjoyed songs, ranked for a mood
    Songs {
        #[arg(long, value_name = "MOOD")]
        mood: Option<Emotion>,
    },
    /// Derive a sentiment and keyword from a description of your situation
    Analyze {
        /// Free-text description, e.g. "late night coding session"
        #[arg(required = true, num_args = 1..)]
        situation: Vec<String>,

        /// Queue matching songs right away
        #[arg(long, default_value_t = false)]
        play: bool,

        #[arg(long, default_value_t = DEFAULT_NUM_SONGS)]
        num_songs: u32,
    },
    /// Queue songs for a sentiment and keyword
    Play {
        #[arg(long)]
        sentiment: String,

        #[arg(long)]
        keyword: String,

        #[arg(long, default_value_t = DEFAULT_NUM_SONGS)]
        num_songs: u32,
    },
    /// Control the player: play, pause, next, previous, shuffle, repeat, seek
    Playback {
        action: String,

        /// on/off for shuffle, off/track/context for repeat, milliseconds for seek
        arg: Option<String>,
    },
    /// Show or toggle emotion capture
    Webcam {
        #[arg(value_enum, default_value_t = WebcamAction::Status)]
        action: WebcamAction,
    },
    /// Show the emotion last detected on camera
    #[command(name = "emotion")]
    CurrentEmotion,
    /// Set the volume, or adjust it from the distance to the screen
    Volume {
        /// Volume in percent, 0-100
        percent: Option<u8>,

        /// Let the service pick the volume from the face distance
        #[arg(long, conflicts_with = "percent")]
        auto: bool,
    },
    /// Save settings to the configuration file; `--api-url` sets the default origin
    Config {
        #[arg(long, value_name = "MOOD")]
        default_mood: Option<Emotion>,
    },
    /// Remove the configuration file
    ClearConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path = get_config_path()?;

    // Commands that never reach the service.
    match &args.command {
        Command::ClearConfig => {
            println!("Clearing configuration file...");
            return Config::clear(&config_path)
                .map_err(|e| handle_cmd_error!(e, "Failed to remove config.").into());
        }
        Command::Config { default_mood } => {
            return commands::configure(&config_path, args.api_url.clone(), *default_mood);
        }
        _ => {}
    }

    let config = Config::load_or_default(&config_path)
        .map_err(|e| handle_cmd_error!(e, "Failed to load config."))?;
    let environment = config
        .resolve_environment(args.api_url.as_deref(), api_url_from_env().as_deref())
        .map_err(|e| handle_cmd_error!(e, "Invalid API URL."))?;
    let api: Arc<dyn MoodApi> = Arc::new(ApiClient::new(environment)?);

    let is_tui = matches!(args.command, Command::Start { headless: false, .. });
    if !is_tui {
        init_cli_logger();
    }

    match args.command {
        Command::Start {
            headless,
            mood,
            with_background,
        } => {
            let mood = mood.or(config.default_mood);
            let worker_config = WorkerConfig::default();
            let session = setup_session(api, worker_config.clone());
            if headless {
                run_headless_mode(session, mood).await
            } else {
                run_tui_mode(session, UIConfig::new(with_background, mood, worker_config)).await
            }
        }
        Command::Status => commands::status(api.as_ref()).await,
        Command::Login => commands::login(api.as_ref()).await,
        Command::Songs { mood } => {
            commands::songs(api.as_ref(), mood.or(config.default_mood)).await
        }
        Command::Analyze {
            situation,
            play,
            num_songs,
        } => commands::analyze(api.as_ref(), &situation.join(" "), play, num_songs).await,
        Command::Play {
            sentiment,
            keyword,
            num_songs,
        } => commands::play_music(api.as_ref(), &sentiment, &keyword, num_songs).await,
        Command::Playback { action, arg } => {
            let command = commands::parse_playback_command(&action, arg.as_deref())?;
            commands::playback(api.as_ref(), command).await
        }
        Command::Webcam { action } => commands::webcam(api.as_ref(), action).await,
        Command::CurrentEmotion => commands::current_emotion(api.as_ref()).await,
        Command::Volume { percent, auto } => commands::volume(api.as_ref(), percent, auto).await,
        Command::Config { .. } | Command::ClearConfig => Ok(()),
    }
}

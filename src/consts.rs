pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains the configuration constants for the dashboard,
    //! organized by functional area.

    // =============================================================================
    // SERVICE CONFIGURATION
    // =============================================================================

    /// Origin of the player service when nothing else is configured.
    pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";

    /// Environment variable overriding the configured service origin.
    pub const API_URL_ENV_VAR: &str = "SPOTILIKE_API_URL";

    /// Directory under $HOME holding the configuration file.
    pub const CONFIG_DIR: &str = ".spotilike";

    /// Name of the configuration file.
    pub const CONFIG_FILE: &str = "config.json";

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events coming from workers
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum number of buffered transport/webcam/volume commands
    pub const COMMAND_QUEUE_SIZE: usize = 16;

    // =============================================================================
    // HTTP CONFIGURATION
    // =============================================================================

    pub mod http {
        use std::time::Duration;

        /// Connect timeout for every request (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Overall timeout for plain request/response calls (seconds).
        /// Not applied to the push stream, which stays open indefinitely.
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // SYNCHRONIZATION CONFIGURATION
    // =============================================================================

    /// Song list refresh timing
    pub mod song_sync {
        use std::time::Duration;

        /// Fallback poll period for the song list (seconds)
        pub const POLL_INTERVAL_SECS: u64 = 30;

        /// Delay before reopening a closed push stream (seconds). Fixed, no backoff.
        pub const PUSH_RECONNECT_DELAY_SECS: u64 = 3;

        /// Message type on the push channel that triggers a refresh
        pub const DB_UPDATE_MESSAGE: &str = "db_update";

        pub const fn poll_interval() -> Duration {
            Duration::from_secs(POLL_INTERVAL_SECS)
        }

        pub const fn push_reconnect_delay() -> Duration {
            Duration::from_secs(PUSH_RECONNECT_DELAY_SECS)
        }
    }

    /// Widget polling timing
    pub mod widgets {
        use std::time::Duration;

        /// Player status poll period (milliseconds)
        pub const PLAYBACK_POLL_MS: u64 = 1_000;

        /// Webcam status poll period (milliseconds)
        pub const WEBCAM_POLL_MS: u64 = 3_000;

        /// Face distance poll period (milliseconds)
        pub const FACE_DISTANCE_POLL_MS: u64 = 2_000;

        /// Delay before re-reading webcam status after a toggle (milliseconds)
        pub const WEBCAM_TOGGLE_SETTLE_MS: u64 = 1_000;

        /// Seek step for the arrow keys (milliseconds)
        pub const SEEK_STEP_MS: u64 = 10_000;

        /// Volume step for the +/- keys (percent)
        pub const VOLUME_STEP: u8 = 5;

        pub const fn playback_poll() -> Duration {
            Duration::from_millis(PLAYBACK_POLL_MS)
        }

        pub const fn webcam_poll() -> Duration {
            Duration::from_millis(WEBCAM_POLL_MS)
        }

        pub const fn face_distance_poll() -> Duration {
            Duration::from_millis(FACE_DISTANCE_POLL_MS)
        }

        pub const fn webcam_toggle_settle() -> Duration {
            Duration::from_millis(WEBCAM_TOGGLE_SETTLE_MS)
        }
    }

    // =============================================================================
    // SITUATION ANALYSIS
    // =============================================================================

    /// Default number of songs requested from play-music
    pub const DEFAULT_NUM_SONGS: u32 = 5;
}

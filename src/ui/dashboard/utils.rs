//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Worker;
use crate::mood::Emotion;
use ratatui::prelude::Color;

/// Get a ratatui color for a worker based on its type
pub fn get_worker_color(worker: &Worker) -> Color {
    match worker {
        Worker::AuthGate => Color::LightMagenta,
        Worker::SongSync => Color::Cyan,
        Worker::PushListener => Color::LightBlue,
        Worker::Playback => Color::Green,
        Worker::Webcam => Color::Yellow,
        Worker::FaceDistance => Color::LightYellow,
        Worker::Controls => Color::White,
    }
}

pub fn emotion_color(emotion: Emotion) -> Color {
    match emotion {
        Emotion::Happy => Color::Yellow,
        Emotion::Sad => Color::Blue,
        Emotion::Angry => Color::Red,
        Emotion::Surprise => Color::Magenta,
        Emotion::Fear => Color::LightMagenta,
        Emotion::Disgust => Color::Green,
        Emotion::Neutral => Color::Gray,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" -> "MM-DD HH:MM"
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// "m:ss" for a millisecond position.
pub fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("error sending request") || msg.contains("Connection refused") {
        return "Service unreachable - is the backend running?".to_string();
    }
    if msg.contains("operation timed out") || msg.contains("TimedOut") {
        return "Request timed out".to_string();
    }
    msg.to_string()
}

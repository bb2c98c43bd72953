//! Emotion categories shared by the ranking, the webcam widget and the CLI.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// One of the seven emotion categories the service scores songs against.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprise,
    Fear,
    Disgust,
    Neutral,
}

impl Emotion {
    /// All categories in selector order.
    pub fn all() -> Vec<Emotion> {
        Emotion::iter().collect()
    }

    /// Parse a free-form label coming from the service ("Happy", " sad ").
    pub fn from_label(label: &str) -> Option<Emotion> {
        label.trim().parse().ok()
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Surprise => "😲",
            Emotion::Fear => "😨",
            Emotion::Disgust => "🤢",
            Emotion::Neutral => "😐",
        }
    }
}

/// Emoji for an arbitrary detected-emotion label, with a placeholder for unknown labels.
pub fn emoji_for_label(label: Option<&str>) -> &'static str {
    label
        .and_then(Emotion::from_label)
        .map(|e| e.emoji())
        .unwrap_or("👤")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Emotion::from_label("Happy"), Some(Emotion::Happy));
        assert_eq!(Emotion::from_label(" DISGUST "), Some(Emotion::Disgust));
        assert_eq!(Emotion::from_label("skipped"), None);
        assert_eq!(Emotion::from_label(""), None);
    }

    #[test]
    fn test_display_matches_wire_name() {
        for emotion in Emotion::all() {
            let wire = serde_json::to_string(&emotion).unwrap();
            assert_eq!(wire, format!("\"{}\"", emotion));
        }
        assert_eq!(Emotion::all().len(), 7);
    }

    #[test]
    fn test_emoji_for_unknown_label() {
        assert_eq!(emoji_for_label(None), "👤");
        assert_eq!(emoji_for_label(Some("confused")), "👤");
        assert_eq!(emoji_for_label(Some("sad")), "😢");
    }
}

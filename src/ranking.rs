//! Client-side mood ranking of the song list.
//!
//! With a mood selected, songs are ordered by:
//! 1. the mood's affinity score, descending (a song without a score for the
//!    mood sorts after every song that has one);
//! 2. whether the song's dominant emotion is the mood;
//! 3. the generic enjoyment score, descending, missing counting as 0.
//!
//! Songs equal on all three keep their server order. Without a mood the
//! server order is kept as is.

use crate::api::models::Song;
use crate::mood::Emotion;
use std::cmp::Ordering;

/// Order two songs for `mood`. `Ordering::Less` means `a` ranks first.
pub fn compare_for_mood(a: &Song, b: &Song, mood: Emotion) -> Ordering {
    compare_affinity(a.affinity(mood), b.affinity(mood))
        .then_with(|| matches_mood(b, mood).cmp(&matches_mood(a, mood)))
        .then_with(|| b.enjoyment().total_cmp(&a.enjoyment()))
}

/// Descending by score; absent scores after present ones, equal among themselves.
fn compare_affinity(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn matches_mood(song: &Song, mood: Emotion) -> bool {
    song.dominant_emotion() == Some(mood)
}

/// Produce the ranked view of `songs` for the current mood selection.
///
/// Always returns the same songs, only reordered.
pub fn rank_songs(songs: &[Song], mood: Option<Emotion>) -> Vec<Song> {
    let mut ranked = songs.to_vec();
    if let Some(mood) = mood {
        // Stable: full ties keep server order.
        ranked.sort_by(|a, b| compare_for_mood(a, b, mood));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song(value: serde_json::Value) -> Song {
        serde_json::from_value(value).unwrap()
    }

    fn ids(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_sorts_descending_by_mood_score() {
        let songs = vec![
            song(json!({"id": "a", "happy": 0.2})),
            song(json!({"id": "b", "happy": 0.9})),
            song(json!({"id": "c", "happy": 0.5})),
        ];
        let ranked = rank_songs(&songs, Some(Emotion::Happy));
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_equal_score_prefers_dominant_emotion_match() {
        let songs = vec![
            song(json!({"id": "first", "happy": 0.9, "emotion": "sad", "score": 2})),
            song(json!({"id": "second", "happy": 0.9, "emotion": "happy", "score": 1})),
        ];
        let ranked = rank_songs(&songs, Some(Emotion::Happy));
        assert_eq!(ids(&ranked), vec!["second", "first"]);
    }

    #[test]
    fn test_missing_scores_fall_through_to_tie_breaks() {
        let songs = vec![
            song(json!({"id": "low", "emotion": "sad", "score": 1})),
            song(json!({"id": "high", "emotion": "sad", "score": 7})),
            song(json!({"id": "match", "emotion": "Happy"})),
        ];
        let ranked = rank_songs(&songs, Some(Emotion::Happy));
        assert_eq!(ids(&ranked), vec!["match", "high", "low"]);
    }

    #[test]
    fn test_scored_songs_rank_before_unscored() {
        let songs = vec![
            song(json!({"id": "unscored", "emotion": "happy", "score": 100})),
            song(json!({"id": "zero", "happy": 0.0})),
        ];
        let ranked = rank_songs(&songs, Some(Emotion::Happy));
        assert_eq!(ids(&ranked), vec!["zero", "unscored"]);
    }

    #[test]
    fn test_missing_enjoyment_counts_as_zero() {
        let songs = vec![
            song(json!({"id": "none"})),
            song(json!({"id": "negative", "score": -1})),
            song(json!({"id": "positive", "score": 0.5})),
        ];
        let ranked = rank_songs(&songs, Some(Emotion::Fear));
        assert_eq!(ids(&ranked), vec!["positive", "none", "negative"]);
    }

    #[test]
    fn test_full_ties_keep_server_order() {
        let songs = vec![
            song(json!({"id": "x", "sad": 0.3})),
            song(json!({"id": "y", "sad": 0.3})),
            song(json!({"id": "z", "sad": 0.3})),
        ];
        let ranked = rank_songs(&songs, Some(Emotion::Sad));
        assert_eq!(ids(&ranked), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_no_mood_keeps_server_order() {
        let songs = vec![
            song(json!({"id": "b", "happy": 0.1, "score": 1})),
            song(json!({"id": "a", "happy": 0.9, "score": 9})),
        ];
        assert_eq!(rank_songs(&songs, None), songs);
    }

    #[test]
    fn test_ranking_is_idempotent_and_keeps_every_song() {
        let songs = vec![
            song(json!({"id": "1", "angry": 0.4, "emotion": "angry", "score": 3})),
            song(json!({"id": "2", "emotion": "angry"})),
            song(json!({"id": "3", "angry": 0.4, "score": 5})),
            song(json!({"id": "4", "score": 2})),
            song(json!({"id": "4", "score": 2})),
            song(json!({"id": "5", "angry": 0.8})),
        ];
        for mood in Emotion::all() {
            let once = rank_songs(&songs, Some(mood));
            let twice = rank_songs(&once, Some(mood));
            assert_eq!(once, twice, "not idempotent for {}", mood);

            let mut original = ids(&songs);
            let mut reordered = ids(&once);
            original.sort();
            reordered.sort();
            assert_eq!(original, reordered);
        }
        let ranked = rank_songs(&songs, Some(Emotion::Angry));
        assert_eq!(ids(&ranked), vec!["5", "1", "3", "2", "4", "4"]);
    }

    #[test]
    fn test_comparator_is_antisymmetric() {
        let a = song(json!({"id": "a", "neutral": 0.5, "emotion": "neutral"}));
        let b = song(json!({"id": "b", "score": 10}));
        assert_eq!(
            compare_for_mood(&a, &b, Emotion::Neutral),
            compare_for_mood(&b, &a, Emotion::Neutral).reverse()
        );
        assert_eq!(compare_for_mood(&a, &a, Emotion::Neutral), Ordering::Equal);
    }
}

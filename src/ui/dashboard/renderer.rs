//! Dashboard main renderer

use super::components::{footer, header, logs, mood_bar, sensors, songs};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(18, 18, 18))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);
    mood_bar::render_mood_bar(f, main_chunks[1], state);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(main_chunks[2]);

    songs::render_songs_panel(f, content_chunks[0], state);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Fill(1)])
        .split(content_chunks[1]);

    sensors::render_sensors_panel(f, side_chunks[0], state);
    logs::render_logs_panel(f, side_chunks[1], state);
    footer::render_footer(f, main_chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{CurrentPlayback, PlaybackTrack, Song, WebcamStatus};
    use crate::environment::Environment;
    use crate::mood::Emotion;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::collections::BTreeMap;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_dashboard_renders_songs_and_player() {
        let mut state = DashboardState::new(Environment::Local, Some(Emotion::Happy), true);
        state.view.fetch_succeeded(
            1,
            vec![Song {
                id: "1".to_string(),
                title: "Walking on Sunshine".to_string(),
                artist: "Katrina".to_string(),
                image: None,
                duration: "3:58".to_string(),
                emotion: Some("happy".to_string()),
                score: Some(4.0),
                affinities: BTreeMap::from([(Emotion::Happy, 0.93)]),
            }],
        );
        state.playback = Some(CurrentPlayback {
            is_playing: true,
            track: Some(PlaybackTrack {
                name: "Walking on Sunshine".to_string(),
                artist: "Katrina".to_string(),
                duration_ms: 238_000,
                ..PlaybackTrack::default()
            }),
            progress_ms: 60_000,
            ..CurrentPlayback::default()
        });
        state.webcam = Some(WebcamStatus {
            webcam_active: true,
            current_emotion: Some("happy".to_string()),
        });

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render_dashboard(f, &state)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Walking on Sunshine"));
        assert!(text.contains("0.93"));
        assert!(text.contains("MOOD: HAPPY"));
        assert!(text.contains("1:00 / 3:58"));
    }

    #[test]
    fn test_empty_dashboard_renders() {
        let state = DashboardState::new(Environment::Local, None, false);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_dashboard(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Loading songs..."));
    }
}

//! Dashboard header component
//!
//! Renders the title and the now-playing gauge

use super::super::state::DashboardState;
use super::super::utils::format_ms;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title_text = format!(
        "SPOTILIKE v{}  ·  {}",
        env!("CARGO_PKG_VERSION"),
        state.environment.api_url()
    );
    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let (label, color, percent) = match &state.playback {
        Some(playback) => match &playback.track {
            Some(track) => {
                let icon = if playback.is_playing { "▶" } else { "⏸" };
                let label = format!(
                    "{} {} - {}  {} / {}",
                    icon,
                    track.name,
                    track.artist,
                    format_ms(playback.progress_ms),
                    format_ms(track.duration_ms)
                );
                let color = if playback.is_playing {
                    Color::LightGreen
                } else {
                    Color::Gray
                };
                (label, color, (playback.progress_ratio() * 100.0) as u16)
            }
            None => ("Nothing playing".to_string(), Color::DarkGray, 0),
        },
        None => ("Player idle".to_string(), Color::DarkGray, 0),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .percent(percent.min(100))
        .label(label);

    f.render_widget(gauge, header_chunks[1]);
}

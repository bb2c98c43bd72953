//! Webcam, face distance and volume panel

use super::super::state::DashboardState;
use crate::mood::emoji_for_label;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph};

pub fn render_sensors_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(3)])
        .split(area);

    let mut lines = Vec::new();

    let (webcam_text, webcam_color) = match &state.webcam {
        Some(status) if status.webcam_active => ("ON", Color::LightGreen),
        Some(_) => ("OFF", Color::Gray),
        None => ("unknown", Color::DarkGray),
    };
    lines.push(Line::from(vec![
        Span::styled("Webcam: ", Style::default().fg(Color::Gray)),
        Span::styled(
            webcam_text,
            Style::default()
                .fg(webcam_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let detected = state
        .webcam
        .as_ref()
        .and_then(|s| s.current_emotion.as_deref());
    lines.push(Line::from(vec![
        Span::styled("Detected: ", Style::default().fg(Color::Gray)),
        Span::raw(format!(
            "{} {}",
            emoji_for_label(detected),
            detected.unwrap_or("no face")
        )),
    ]));

    let distance_text = match state.face_distance {
        Some(d) => format!("{:.0} cm", d),
        None => "-".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Distance: ", Style::default().fg(Color::Gray)),
        Span::styled(distance_text, Style::default().fg(Color::LightYellow)),
    ]));

    if let Some(playback) = &state.playback {
        lines.push(Line::from(vec![
            Span::styled("Shuffle: ", Style::default().fg(Color::Gray)),
            Span::raw(if playback.shuffle_state { "on" } else { "off" }),
            Span::styled("  Repeat: ", Style::default().fg(Color::Gray)),
            Span::raw(playback.repeat_state.to_string()),
        ]));
    }

    let block = Block::default()
        .title("SENSORS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));
    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let volume = state.volume.unwrap_or(0).min(100);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("Volume")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::LightBlue)),
        )
        .gauge_style(Style::default().fg(Color::LightBlue))
        .percent(volume as u16)
        .label(match state.volume {
            Some(v) => format!("{}%", v),
            None => "-".to_string(),
        });
    f.render_widget(gauge, chunks[1]);
}

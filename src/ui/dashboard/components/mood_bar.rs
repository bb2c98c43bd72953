//! Mood selector strip

use super::super::state::DashboardState;
use super::super::utils::emotion_color;
use crate::mood::Emotion;
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_mood_bar(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let selected = state.view.mood;
    let mut spans = vec![mood_span("0", "all", Color::Gray, selected.is_none())];

    for (i, emotion) in Emotion::all().into_iter().enumerate() {
        spans.push(Span::raw(" "));
        spans.push(mood_span(
            &(i + 1).to_string(),
            &format!("{} {}", emotion.emoji(), emotion),
            emotion_color(emotion),
            selected == Some(emotion),
        ));
    }

    let title = match selected {
        Some(mood) => format!("MOOD: {}", mood.to_string().to_uppercase()),
        None => "MOOD: SERVER ORDER".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn mood_span(key: &str, label: &str, color: Color, active: bool) -> Span<'static> {
    let style = if active {
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    Span::styled(format!("[{}] {}", key, label), style)
}

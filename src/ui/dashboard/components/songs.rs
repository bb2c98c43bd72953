//! Ranked song table

use super::super::state::DashboardState;
use super::super::utils::emotion_color;
use crate::mood::{Emotion, emoji_for_label};
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Padding, Paragraph, Row, Table, TableState};

pub fn render_songs_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let view = &state.view;
    let spinner = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let title = if view.loading {
        format!(
            "ENJOYED SONGS ({}) {}",
            view.ranked.len(),
            spinner[state.tick % spinner.len()]
        )
    } else {
        format!("ENJOYED SONGS ({})", view.ranked.len())
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    if view.ranked.is_empty() {
        let text = if view.loading || view.last_applied_seq == 0 {
            "Loading songs..."
        } else {
            "No enjoyed songs yet"
        };
        f.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let mood = view.mood;
    let header_cells = ["#", "Title", "Artist", "Time", "Mood", "Score"]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Gray)));
    let header = Row::new(header_cells).bottom_margin(1);

    let rows = view.ranked.iter().enumerate().map(|(i, song)| {
        let label_color = song
            .dominant_emotion()
            .map(emotion_color)
            .unwrap_or(Color::DarkGray);
        let mood_cell = format!(
            "{} {}",
            emoji_for_label(song.emotion.as_deref()),
            song.emotion.as_deref().unwrap_or("-")
        );
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(song.title.clone()),
            Cell::from(song.artist.clone()),
            Cell::from(song.duration.clone()),
            Cell::from(mood_cell).style(Style::default().fg(label_color)),
            Cell::from(score_text(song, mood)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(38),
            Constraint::Percentage(28),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut table_state = TableState::default().with_selected(Some(state.selected_song));
    f.render_stateful_widget(table, area, &mut table_state);
}

/// Affinity for the selected mood, or the enjoyment score without one.
fn score_text(song: &crate::api::models::Song, mood: Option<Emotion>) -> String {
    let value = match mood {
        Some(m) => song.affinity(m),
        None => song.score,
    };
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

//! Activity panel: the most recent worker events, newest on top.

use super::super::state::DashboardState;
use super::super::utils::{clean_http_error_message, format_compact_timestamp, get_worker_color};
use crate::events::{Event as WorkerEvent, EventType, Worker};
use crate::logging::LogLevel;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem};

fn worker_tag(worker: Worker) -> &'static str {
    match worker {
        Worker::AuthGate => "auth",
        Worker::SongSync => "sync",
        Worker::PushListener => "push",
        Worker::Playback => "play",
        Worker::Webcam => "cam ",
        Worker::FaceDistance => "dist",
        Worker::Controls => "ctrl",
    }
}

fn message_style(event: &WorkerEvent) -> Style {
    match (event.event_type, event.log_level) {
        (EventType::Error, LogLevel::Error) => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        (EventType::Error, LogLevel::Warn) => Style::default().fg(Color::Yellow),
        (EventType::Error, _) => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::Gray),
    }
}

fn log_item(event: &WorkerEvent) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{} ", format_compact_timestamp(&event.timestamp)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} ", worker_tag(event.worker)),
            Style::default().fg(get_worker_color(&event.worker)),
        ),
        Span::styled(clean_http_error_message(&event.msg), message_style(event)),
    ]))
}

pub fn render_logs_panel(f: &mut Frame, area: Rect, state: &DashboardState) {
    let visible = area.height.saturating_sub(2) as usize;

    let items: Vec<ListItem> = if state.activity_logs.is_empty() {
        vec![ListItem::new(Span::styled(
            "Waiting for activity...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .activity_logs
            .iter()
            .rev()
            .take(visible.max(1))
            .map(log_item)
            .collect()
    };

    let block = Block::default()
        .title(format!("ACTIVITY ({})", state.activity_logs.len()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_and_errors_are_styled_apart() {
        let warn = WorkerEvent::new(
            Worker::SongSync,
            "502".to_string(),
            EventType::Error,
            LogLevel::Warn,
        );
        let error = WorkerEvent::new(
            Worker::SongSync,
            "401".to_string(),
            EventType::Error,
            LogLevel::Error,
        );
        assert_ne!(message_style(&warn), message_style(&error));
    }
}

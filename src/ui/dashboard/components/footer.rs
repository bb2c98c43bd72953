//! Dashboard footer component
//!
//! Renders the key help line

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub const KEY_HELP: &str = "[Q] Quit  [0-7/Tab] Mood  [↑↓] Select  [Space] Play/Pause  [N/P] Next/Prev  [S] Shuffle  [R] Repeat  [←→] Seek  [+/-] Volume  [A] Auto volume  [W] Webcam";

pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect) {
    let footer = Paragraph::new(KEY_HELP)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}

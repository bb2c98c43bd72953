//! Login screen module

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Shown when the session is not authenticated with the music provider.
pub fn render_login(f: &mut Frame, auth_url: Option<&str>, rechecking: bool) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Not logged in to Spotify",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match auth_url {
        Some(url) => {
            lines.push(Line::from("Open this URL in a browser to log in:"));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                url.to_string(),
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::UNDERLINED),
            )));
        }
        None => lines.push(Line::from(
            "The service did not provide a login URL. Log in through the web app.",
        )),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(if rechecking {
        "Checking session..."
    } else {
        "Press Enter once logged in, Esc to exit"
    }));

    let block = Block::default()
        .title("Login")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(block);

    f.render_widget(paragraph, f.area());
}

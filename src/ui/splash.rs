//! Splash screen, shown while the session check is in flight.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

pub const LOGO_NAME: &str = r#"
  ███████╗ ██████╗   ██████╗  ████████╗ ██╗ ██╗      ██╗ ██╗  ██╗ ███████╗
  ██╔════╝ ██╔══██╗ ██╔═══██╗ ╚══██╔══╝ ██║ ██║      ██║ ██║ ██╔╝ ██╔════╝
  ███████╗ ██████╔╝ ██║   ██║    ██║    ██║ ██║      ██║ █████╔╝  █████╗
  ╚════██║ ██╔═══╝  ██║   ██║    ██║    ██║ ██║      ██║ ██╔═██╗  ██╔══╝
  ███████║ ██║      ╚██████╔╝    ██║    ██║ ███████╗ ██║ ██║  ██╗ ███████╗
  ╚══════╝ ╚═╝       ╚═════╝     ╚═╝    ╚═╝ ╚══════╝ ╚═╝ ╚═╝  ╚═╝ ╚══════╝
"#;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

fn status_line(tick: usize) -> Line<'static> {
    Line::styled(
        format!(
            "{} Checking session...   v{}",
            SPINNER[tick % SPINNER.len()],
            env!("CARGO_PKG_VERSION")
        ),
        Style::default().fg(Color::Gray),
    )
}

pub fn render_splash(f: &mut Frame, tick: usize) {
    let logo = Text::styled(
        LOGO_NAME.trim_matches('\n'),
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
    );
    let logo_height = logo.height() as u16;

    let [logo_area, _, status_area] = Layout::vertical([
        Constraint::Length(logo_height),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .areas(f.area());

    f.render_widget(Paragraph::new(logo).alignment(Alignment::Center), logo_area);
    f.render_widget(
        Paragraph::new(status_line(tick)).alignment(Alignment::Center),
        status_area,
    );
}

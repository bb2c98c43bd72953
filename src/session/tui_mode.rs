//! TUI mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::ui::{self, UIConfig};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the application in TUI mode
///
/// Sets up the terminal, runs the UI until the user quits, restores the
/// terminal and waits for every worker to stop.
pub async fn run_tui_mode(session: SessionData, ui_config: UIConfig) -> Result<(), Box<dyn Error>> {
    print_session_starting("TUI", session.api.environment());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ui::App::new(
        session.api.clone(),
        session.event_sender.clone(),
        session.event_receiver,
        session.shutdown_sender.clone(),
        ui_config,
    );

    let result = ui::run(&mut terminal, &mut app).await;

    // Clean up the terminal after running the application
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Workers must stop even when the UI loop failed.
    let _ = session.shutdown_sender.send(());
    result?;

    print_session_shutdown();
    for handle in session.join_handles.into_iter().chain(app.take_join_handles()) {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

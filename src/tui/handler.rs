//! Event loop for the TUI form.

use std::io;
use std::time::Duration;

use anyhow::Result;
use is_terminal::IsTerminal;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;

use crate::config::Config;
use crate::handlers::{ask, AskInput};

use super::{
    app::{Action, App},
    events::TuiEvent,
    ui::render_ui,
};

/// Run the form until the user quits.
pub async fn run_tui_form(cfg: &Config, model: &str, initial: AskInput) -> Result<()> {
    if !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&initial, model.to_string());
    let result = run_app(&mut terminal, &mut app, cfg, model).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    cfg: &Config,
    model: &str,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Some(tui_event) = TuiEvent::from_crossterm(event::read()?) else {
            continue;
        };

        match app.handle_event(tui_event) {
            Action::None => {}
            Action::Quit => break,
            Action::Submit(input) => {
                // Show the busy state before blocking on the request.
                terminal.draw(|frame| render_ui(frame, app))?;
                tracing::info!(doc = ?input.doc, "submitting question from form");
                let result = ask::answer(cfg, model, &input).await;
                app.finish(result);
                tracing::debug!(response = %app.output_text(), "form query finished");
            }
        }
    }
    Ok(())
}

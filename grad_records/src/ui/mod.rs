//! Terminal user interface
//!
//! A navigation panel of tables, one browser tab per open table, and modal
//! dialogs for editing records and reporting errors.

pub mod app;
pub mod dialog;
pub mod draw;
pub mod keys;
pub mod message;

use std::io::{self, Stdout};

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;

pub use app::{App, Focus};
pub use message::{MessageBox, MessageLevel};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Take over the terminal, run the event loop until the user quits, and
/// restore the terminal even when the loop fails
pub async fn run(app: &mut App) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, app).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();

    while !app.should_quit() {
        terminal.draw(|frame| draw::render(frame, app))?;

        match events.next().await {
            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                app.handle_key(key).await;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
            None => break,
        }
    }

    tracing::info!("Event loop finished");
    Ok(())
}

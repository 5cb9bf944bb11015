//! Rendering

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap,
};
use ratatui::Frame;

use crate::ui::app::{App, Focus};
use crate::ui::dialog::EditorDialog;
use crate::ui::keys::hints;
use crate::ui::message::MessageBox;

const NAV_WIDTH: u16 = 28;
const TITLE: &str = "Graduate Records";

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    render_navigation(frame, app, columns[0]);
    render_browser(frame, app, columns[1]);
    render_status(frame, app, rows[1]);

    if let Some(dialog) = app.dialog() {
        render_dialog(frame, dialog, size);
    }
    if let Some(message) = app.message() {
        render_message(frame, message, size);
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_navigation(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .nav_entries()
        .into_iter()
        .map(|name| ListItem::new(name.to_string()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(TITLE)
                .border_style(border_style(app.focus() == Focus::Navigation)),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.nav_state);
}

fn render_browser(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.tabs().is_empty() {
        let hint = Paragraph::new("Select a table in the navigation panel and press Enter.")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).border_style(border_style(false)))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let titles: Vec<Line> = app
        .tabs()
        .iter()
        .map(|t| Line::from(t.browser.table().to_string()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let focus = app.focus();
    let active = app.active_index();
    let tab = &mut app.tabs[active];

    tab.search.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search (/)")
            .border_style(border_style(focus == Focus::Search)),
    );
    tab.search.set_cursor_line_style(Style::default());
    tab.search.set_cursor_style(if focus == Focus::Search {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });
    frame.render_widget(&tab.search, chunks[1]);

    let listing = tab.browser.rows();
    let header = Row::new(
        listing
            .columns
            .iter()
            .map(|c| Cell::from(c.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let body: Vec<Row> = (0..listing.len())
        .map(|r| {
            Row::new(
                (0..listing.columns.len())
                    .map(|c| Cell::from(listing.cell(r, c).to_string()))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let count = listing.columns.len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, count); listing.columns.len().max(1)];

    let title = match tab.browser.filter() {
        Some(term) => format!("{} [{} rows matching \"{}\"]", tab.browser.table(), listing.len(), term),
        None => format!("{} [{} rows]", tab.browser.table(), listing.len()),
    };

    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style(focus == Focus::Browser)),
        )
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    tab.table_state.select(tab.browser.selected());
    frame.render_stateful_widget(table, chunks[2], &mut tab.table_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if !app.status().is_empty() {
        spans.push(Span::styled(
            format!("{}  ", app.status()),
            Style::default().fg(Color::Green),
        ));
    }
    spans.push(Span::styled(hints(app.mode()), Style::default().fg(Color::Gray)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_dialog(frame: &mut Frame, dialog: &EditorDialog, size: Rect) {
    let inputs = dialog.inputs();
    let height = (inputs.len() as u16 * 3 + 2).min(size.height);
    let area = centered_rect(60, height, size);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(dialog.form().title())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); inputs.len()])
        .split(inner);

    for (input, slot) in inputs.iter().zip(slots.iter()) {
        frame.render_widget(input, *slot);
    }
}

fn render_message(frame: &mut Frame, message: &MessageBox, size: Rect) {
    let area = centered_rect(50, 7, size);
    let color = message.level.color();

    let text = vec![
        Line::from(message.text.clone()),
        Line::from(""),
        Line::from(Span::styled("Enter to dismiss", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(message.title.clone())
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `r`
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::catalog::TableCatalog;
    use crate::db::DatabaseConnection;
    use crate::records::RecordStore;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    async fn app() -> App {
        let conn = DatabaseConnection::in_memory().await.unwrap();
        for sql in [
            "CREATE TABLE Specialty (Speciality_ID INTEGER PRIMARY KEY, Name TEXT)",
            "INSERT INTO Specialty VALUES (1, 'Physics')",
        ] {
            conn.execute(sql, &[]).await.unwrap();
        }
        App::new(RecordStore::new(conn), TableCatalog::default())
    }

    #[test]
    fn centered_rect_fits() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 10, outer);
        assert_eq!(inner.height, 10);
        assert_eq!(inner.y, 15);
        assert_eq!(inner.width, 50);
    }

    #[tokio::test]
    async fn navigation_lists_catalog() {
        let mut app = app().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Graduates"));
        assert!(text.contains("ScientificSupervisors"));
        assert!(text.contains("Show all tables"));
    }

    #[tokio::test]
    async fn open_table_shows_rows() {
        let mut app = app().await;
        app.open_table("Specialty").await;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Speciality_ID"));
        assert!(text.contains("Physics"));
        assert!(text.contains("Specialty [1 rows]"));
    }

    #[tokio::test]
    async fn missing_table_shows_error_box() {
        let mut app = app().await;
        app.open_table("Donations").await;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Table 'Donations' does not exist."));
    }
}

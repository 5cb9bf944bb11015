//! Application state and message handling
//!
//! Every database call is awaited inline; failures become message boxes and
//! the application keeps running.

use crossterm::event::KeyEvent;
use ratatui::widgets::{ListState, TableState};
use tui_textarea::TextArea;

use crate::catalog::TableCatalog;
use crate::records::{
    FormMode, RecordEditor, RecordStore, SearchOutcome, SubmitOutcome, TableBrowser,
};
use crate::ui::dialog::EditorDialog;
use crate::ui::keys::{map_key, Mode, Msg};
use crate::ui::message::MessageBox;

/// Label of the navigation entry that opens every table
pub const SHOW_ALL: &str = "Show all tables";

/// Which pane has focus when no modal is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Navigation,
    Browser,
    Search,
}

/// An open table: its listing, search box and scroll state
pub struct BrowserTab {
    pub browser: TableBrowser,
    pub search: TextArea<'static>,
    pub table_state: TableState,
}

impl BrowserTab {
    fn new(browser: TableBrowser) -> Self {
        Self {
            browser,
            search: TextArea::default(),
            table_state: TableState::default(),
        }
    }

    pub fn search_text(&self) -> String {
        self.search.lines().concat()
    }
}

pub struct App {
    store: RecordStore,
    catalog: TableCatalog,
    pub(crate) nav_state: ListState,
    pub(crate) tabs: Vec<BrowserTab>,
    pub(crate) active: usize,
    focus: Focus,
    dialog: Option<EditorDialog>,
    message: Option<MessageBox>,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(store: RecordStore, catalog: TableCatalog) -> Self {
        Self {
            store,
            catalog,
            nav_state: ListState::default().with_selected(Some(0)),
            tabs: Vec::new(),
            active: 0,
            focus: Focus::Navigation,
            dialog: None,
            message: None,
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// Navigation entries: every table, then the open-all entry
    pub fn nav_entries(&self) -> Vec<&str> {
        let mut entries = self.catalog.names();
        entries.push(SHOW_ALL);
        entries
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The mode keys are currently mapped in
    pub fn mode(&self) -> Mode {
        if self.message.is_some() {
            Mode::Message
        } else if self.dialog.is_some() {
            Mode::Dialog
        } else {
            match self.focus {
                Focus::Navigation => Mode::Navigation,
                Focus::Browser => Mode::Browser,
                Focus::Search => Mode::Search,
            }
        }
    }

    pub fn message(&self) -> Option<&MessageBox> {
        self.message.as_ref()
    }

    pub fn dialog(&self) -> Option<&EditorDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut EditorDialog> {
        self.dialog.as_mut()
    }

    pub fn tabs(&self) -> &[BrowserTab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> Option<&BrowserTab> {
        self.tabs.get(self.active)
    }

    fn active_tab_mut(&mut self) -> Option<&mut BrowserTab> {
        self.tabs.get_mut(self.active)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Map and handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if let Some(msg) = map_key(self.mode(), key) {
            self.update(msg).await;
        }
    }

    /// Apply a message to the application state
    pub async fn update(&mut self, msg: Msg) {
        tracing::trace!(?msg, "update");
        match msg {
            Msg::Quit => self.should_quit = true,
            Msg::Dismiss => self.message = None,
            Msg::SwitchFocus => self.switch_focus(),
            Msg::Up => self.move_selection(false),
            Msg::Down => self.move_selection(true),
            Msg::PreviousTab => self.cycle_tab(false),
            Msg::NextTab => self.cycle_tab(true),
            Msg::OpenSelected => self.open_selected().await,
            Msg::FocusSearch => {
                if !self.tabs.is_empty() {
                    self.focus = Focus::Search;
                }
            }
            Msg::SearchInput(key) => {
                if let Some(tab) = self.active_tab_mut() {
                    tab.search.input(key);
                }
            }
            Msg::SubmitSearch => self.search().await,
            Msg::LeaveSearch => self.focus = Focus::Browser,
            Msg::Add => self.open_add().await,
            Msg::Edit => self.open_edit().await,
            Msg::Delete => self.delete().await,
            Msg::Refresh => self.refresh_active().await,
            Msg::CloseTab => self.close_tab(),
            Msg::DialogInput(key) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.input(key);
                }
            }
            Msg::NextField => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.next_field();
                }
            }
            Msg::PreviousField => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.previous_field();
                }
            }
            Msg::SubmitDialog => self.submit_dialog().await,
            Msg::CancelDialog => self.dialog = None,
        }
    }

    /// Open a browser for `table`, or focus it if it is already open
    pub async fn open_table(&mut self, table: &str) {
        self.focus = Focus::Browser;
        if let Some(idx) = self.tabs.iter().position(|t| t.browser.table() == table) {
            self.active = idx;
            return;
        }

        let browser = TableBrowser::new(table, self.catalog.key_column(table));
        self.tabs.push(BrowserTab::new(browser));
        self.active = self.tabs.len() - 1;
        tracing::info!(table, "Opened table");
        self.refresh_active().await;
    }

    /// Open a browser for every catalog table. A table that fails to load
    /// still gets its tab; the first failure is the one reported.
    pub async fn open_all(&mut self) {
        let names: Vec<String> = self.catalog.names().into_iter().map(str::to_string).collect();
        let mut first_error = self.message.take();
        for name in names {
            self.open_table(&name).await;
            if let Some(message) = self.message.take() {
                first_error.get_or_insert(message);
            }
        }
        self.message = first_error;
    }

    async fn open_selected(&mut self) {
        let idx = self.nav_state.selected().unwrap_or(0);
        let table = self.nav_entries().get(idx).map(|s| s.to_string());
        match table.as_deref() {
            Some(SHOW_ALL) => self.open_all().await,
            Some(table) => self.open_table(table).await,
            None => {}
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Navigation if !self.tabs.is_empty() => Focus::Browser,
            Focus::Navigation => Focus::Navigation,
            Focus::Browser | Focus::Search => Focus::Navigation,
        };
    }

    fn move_selection(&mut self, down: bool) {
        match self.focus {
            Focus::Navigation => {
                let len = self.nav_entries().len();
                let current = self.nav_state.selected().unwrap_or(0);
                let next = if down {
                    (current + 1).min(len - 1)
                } else {
                    current.saturating_sub(1)
                };
                self.nav_state.select(Some(next));
            }
            Focus::Browser | Focus::Search => {
                if let Some(tab) = self.active_tab_mut() {
                    if down {
                        tab.browser.select_next();
                    } else {
                        tab.browser.select_previous();
                    }
                }
            }
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        let len = self.tabs.len();
        if len == 0 {
            return;
        }
        self.active = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
    }

    fn close_tab(&mut self) {
        if self.active < self.tabs.len() {
            let tab = self.tabs.remove(self.active);
            tracing::info!(table = tab.browser.table(), "Closed table");
        }
        if self.tabs.is_empty() {
            self.active = 0;
            self.focus = Focus::Navigation;
        } else if self.active >= self.tabs.len() {
            self.active = self.tabs.len() - 1;
        }
    }

    async fn refresh_active(&mut self) {
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        tab.search = TextArea::default();
        match tab.browser.refresh(&self.store).await {
            Ok(rows) => self.status = format!("{}: {} rows", tab.browser.table(), rows),
            Err(e) => self.message = Some(MessageBox::from_error("Query failed", &e)),
        }
    }

    async fn search(&mut self) {
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        let term = tab.search_text();
        match tab.browser.search(&self.store, &term).await {
            Ok(SearchOutcome::All(rows)) => {
                self.status = format!("{}: {} rows", tab.browser.table(), rows);
            }
            Ok(SearchOutcome::Found(rows)) => {
                self.status = format!("{}: {} rows match \"{}\"", tab.browser.table(), rows, term.trim());
            }
            Ok(SearchOutcome::NothingFound) => {
                self.status = format!("{}: no rows match \"{}\"", tab.browser.table(), term.trim());
                self.message = Some(MessageBox::info("Search", "Nothing found."));
            }
            Err(e) => self.message = Some(MessageBox::from_error("Query failed", &e)),
        }
        self.focus = Focus::Browser;
    }

    async fn open_add(&mut self) {
        let Some(tab) = self.tabs.get(self.active) else {
            return;
        };
        let editor = RecordEditor::new(&self.store);
        match editor.open_add(tab.browser.table()).await {
            Ok(form) => self.dialog = Some(EditorDialog::new(form)),
            Err(e) => self.message = Some(MessageBox::from_error("Could not open form", &e)),
        }
    }

    async fn open_edit(&mut self) {
        let Some(tab) = self.tabs.get(self.active) else {
            return;
        };
        let result = match tab.browser.selected_key() {
            Ok(key) => RecordEditor::new(&self.store).open_edit(tab.browser.table(), key).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(form) => self.dialog = Some(EditorDialog::new(form)),
            Err(e) => self.message = Some(MessageBox::from_error("Could not open form", &e)),
        }
    }

    async fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let form = dialog.sync_form();
        let action = match form.mode {
            FormMode::Add => "Could not add record",
            FormMode::Edit { .. } => "Could not save changes",
        };

        let result = RecordEditor::new(&self.store).submit(form).await;
        match result {
            Ok(outcome) => {
                self.dialog = None;
                self.refresh_active().await;
                let done = match outcome {
                    SubmitOutcome::Inserted { key } => format!("Added record {}", key),
                    SubmitOutcome::Updated { key } => format!("Saved record {}", key),
                };
                if self.message.is_none() {
                    self.status = done;
                }
            }
            Err(e) => self.message = Some(MessageBox::from_error(action, &e)),
        }
    }

    async fn delete(&mut self) {
        let Some(tab) = self.tabs.get_mut(self.active) else {
            return;
        };
        match tab.browser.delete_selected(&self.store).await {
            Ok(key) => self.status = format!("{}: deleted record {}", tab.browser.table(), key),
            Err(e) => self.message = Some(MessageBox::from_error("Could not delete record", &e)),
        }
    }
}

//! Table browser
//!
//! Holds the listing of one table. The listing is reloaded in full on every
//! refresh; there is no paging and no incremental update.

use crate::error::{Error, Result};
use crate::records::store::RecordStore;
use crate::records::types::RowSet;

/// Result of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The term was blank and the full listing was restored
    All(usize),
    Found(usize),
    NothingFound,
}

/// The listing and selection of one open table
#[derive(Debug, Clone)]
pub struct TableBrowser {
    table: String,
    key_column: Option<String>,
    rows: RowSet,
    selected: Option<usize>,
    filter: Option<String>,
}

impl TableBrowser {
    /// `key_column` is the catalog key; the first listed column is used
    /// when the catalog has none
    pub fn new(table: &str, key_column: Option<&str>) -> Self {
        Self {
            table: table.to_string(),
            key_column: key_column.map(str::to_string),
            rows: RowSet::default(),
            selected: None,
            filter: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The active search term, if the listing is filtered
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Reload every row, dropping any search filter
    pub async fn refresh(&mut self, store: &RecordStore) -> Result<usize> {
        self.filter = None;
        let listing = store.list(&self.table).await;
        self.apply(listing)
    }

    /// Filter rows by a substring of any column; a blank term restores
    /// the full listing
    pub async fn search(&mut self, store: &RecordStore, term: &str) -> Result<SearchOutcome> {
        let term = term.trim();
        if term.is_empty() {
            return self.refresh(store).await.map(SearchOutcome::All);
        }

        self.filter = Some(term.to_string());
        let listing = store.search(&self.table, term).await;
        match self.apply(listing)? {
            0 => Ok(SearchOutcome::NothingFound),
            n => Ok(SearchOutcome::Found(n)),
        }
    }

    fn apply(&mut self, listing: Result<RowSet>) -> Result<usize> {
        match listing {
            Ok(rows) => {
                self.rows = rows;
                self.selected = match self.selected {
                    _ if self.rows.is_empty() => None,
                    Some(idx) => Some(idx.min(self.rows.len() - 1)),
                    None => Some(0),
                };
                Ok(self.rows.len())
            }
            Err(e) => {
                self.rows = RowSet::default();
                self.selected = None;
                self.filter = None;
                tracing::warn!(table = %self.table, error = %e, "Listing failed");
                Err(e)
            }
        }
    }

    pub fn select(&mut self, row: Option<usize>) {
        self.selected = row.filter(|&idx| idx < self.rows.len());
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1).min(self.rows.len() - 1),
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |idx| idx.saturating_sub(1)));
    }

    /// Key of the selected row, read from the first column
    pub fn selected_key(&self) -> Result<&str> {
        self.selected
            .and_then(|idx| self.rows.key_of(idx))
            .ok_or(Error::NoSelection)
    }

    /// Column that deletes are matched on
    pub fn key_column(&self) -> Option<&str> {
        self.key_column
            .as_deref()
            .or_else(|| self.rows.columns.first().map(String::as_str))
    }

    /// Delete the selected row, then reload the listing
    pub async fn delete_selected(&mut self, store: &RecordStore) -> Result<String> {
        let key = self.selected_key()?.to_string();
        let key_column = self.key_column().ok_or(Error::NoSelection)?.to_string();

        store.delete(&self.table, &key_column, &key).await?;
        self.refresh(store).await?;
        Ok(key)
    }
}

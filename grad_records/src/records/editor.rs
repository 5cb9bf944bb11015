//! Generic record editor
//!
//! Backs both the add and the edit dialog. The form is built from the
//! columns discovered when the dialog opens: the key comes first and is
//! read-only, every other column gets one text field.

use crate::error::{Error, Result};
use crate::records::store::RecordStore;
use crate::schema::types::TableSchema;

/// Whether the form creates a row or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { key: String },
}

/// One input of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub column: String,
    pub value: String,
    pub read_only: bool,
}

/// What a successful submit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Inserted { key: String },
    Updated { key: String },
}

/// The state of an open add/edit dialog
#[derive(Debug, Clone)]
pub struct RecordForm {
    pub schema: TableSchema,
    pub mode: FormMode,
    pub fields: Vec<FormField>,
}

impl RecordForm {
    /// Build an add form with the key pre-filled
    pub fn for_add(schema: TableSchema, next_key: i64) -> Self {
        let fields = schema
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| FormField {
                column: column.name.clone(),
                value: if idx == 0 { next_key.to_string() } else { String::new() },
                read_only: idx == 0,
            })
            .collect();

        Self {
            schema,
            mode: FormMode::Add,
            fields,
        }
    }

    /// Build an edit form from the stored values, in column order
    pub fn for_edit(schema: TableSchema, key: &str, values: Vec<String>) -> Self {
        let fields = schema
            .columns
            .iter()
            .zip(values)
            .enumerate()
            .map(|(idx, (column, value))| FormField {
                column: column.name.clone(),
                value,
                read_only: idx == 0,
            })
            .collect();

        Self {
            schema,
            mode: FormMode::Edit { key: key.to_string() },
            fields,
        }
    }

    pub fn table(&self) -> &str {
        &self.schema.name
    }

    /// Dialog title
    pub fn title(&self) -> String {
        match &self.mode {
            FormMode::Add => format!("Add record to {}", self.schema.name),
            FormMode::Edit { .. } => format!("Edit record in {}", self.schema.name),
        }
    }

    /// Replace the value of an editable field; read-only fields are kept
    pub fn set_value(&mut self, column: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.column == column && !f.read_only) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Trimmed values of every field, key first
    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.trim().to_string()).collect()
    }

    /// Check that no field is blank and return the trimmed values.
    ///
    /// When editing, the read-only key is exempt.
    pub fn validate(&self) -> Result<Vec<String>> {
        let values = self.values();
        let key_exempt = matches!(self.mode, FormMode::Edit { .. });

        for (idx, (field, value)) in self.fields.iter().zip(&values).enumerate() {
            if idx == 0 && key_exempt {
                continue;
            }
            if value.is_empty() {
                return Err(Error::EmptyField(field.column.clone()));
            }
        }

        Ok(values)
    }
}

/// Opens and submits record forms against a store
pub struct RecordEditor<'a> {
    store: &'a RecordStore,
}

impl<'a> RecordEditor<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Open an add form for `table`
    pub async fn open_add(&self, table: &str) -> Result<RecordForm> {
        let schema = self.store.schema(table).await?;
        let next_key = self.store.next_key(&schema).await?;

        tracing::debug!(table, next_key, "Opened add form");
        Ok(RecordForm::for_add(schema, next_key))
    }

    /// Open an edit form for the row of `table` with `key`
    pub async fn open_edit(&self, table: &str, key: &str) -> Result<RecordForm> {
        let schema = self.store.schema(table).await?;
        let record = self.store.fetch_record(&schema, key).await?;
        let values = schema
            .columns
            .iter()
            .map(|c| record.text(&c.name).to_string())
            .collect();

        tracing::debug!(table, key, "Opened edit form");
        Ok(RecordForm::for_edit(schema, key, values))
    }

    /// Validate and write the form: blank fields first, then duplicates,
    /// then one INSERT or UPDATE
    pub async fn submit(&self, form: &RecordForm) -> Result<SubmitOutcome> {
        let values = form.validate()?;
        let editable = values.get(1..).unwrap_or(&[]);

        let exclude = match &form.mode {
            FormMode::Add => None,
            FormMode::Edit { key } => Some(key.as_str()),
        };
        if self.store.count_duplicates(&form.schema, editable, exclude).await? > 0 {
            tracing::debug!(table = form.table(), "Rejected duplicate record");
            return Err(Error::DuplicateRecord);
        }

        match &form.mode {
            FormMode::Add => {
                self.store.insert(&form.schema, &values).await?;
                Ok(SubmitOutcome::Inserted {
                    key: values.first().cloned().unwrap_or_default(),
                })
            }
            FormMode::Edit { key } => {
                self.store.update(&form.schema, key, editable).await?;
                Ok(SubmitOutcome::Updated { key: key.clone() })
            }
        }
    }
}

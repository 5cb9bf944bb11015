//! Add/edit dialog
//!
//! One single-line text input per form field. The key input is shown but
//! never receives keys.

use crossterm::event::KeyEvent;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::{CursorMove, TextArea};

use crate::records::editor::RecordForm;

pub struct EditorDialog {
    form: RecordForm,
    inputs: Vec<TextArea<'static>>,
    focused: usize,
}

impl EditorDialog {
    pub fn new(form: RecordForm) -> Self {
        let inputs = form
            .fields
            .iter()
            .map(|field| {
                let mut input = TextArea::new(vec![field.value.clone()]);
                input.move_cursor(CursorMove::End);
                input
            })
            .collect();
        let focused = form.fields.iter().position(|f| !f.read_only).unwrap_or(0);

        let mut dialog = Self {
            form,
            inputs,
            focused,
        };
        dialog.restyle();
        dialog
    }

    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn inputs(&self) -> &[TextArea<'static>] {
        &self.inputs
    }

    /// Feed a key to the focused input unless it is read-only
    pub fn input(&mut self, key: KeyEvent) {
        let read_only = self.form.fields.get(self.focused).map_or(true, |f| f.read_only);
        if !read_only {
            if let Some(input) = self.inputs.get_mut(self.focused) {
                input.input(key);
            }
        }
    }

    pub fn next_field(&mut self) {
        self.step(1);
    }

    pub fn previous_field(&mut self) {
        self.step(self.inputs.len().saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        let len = self.inputs.len();
        if len == 0 {
            return;
        }
        let mut idx = self.focused;
        for _ in 0..len {
            idx = (idx + by) % len;
            if !self.form.fields[idx].read_only {
                self.focused = idx;
                break;
            }
        }
        self.restyle();
    }

    /// Copy the typed text back into the form and return it
    pub fn sync_form(&mut self) -> &RecordForm {
        for (field, input) in self.form.fields.iter_mut().zip(&self.inputs) {
            if !field.read_only {
                field.value = input.lines().concat();
            }
        }
        &self.form
    }

    fn restyle(&mut self) {
        for (idx, (field, input)) in self.form.fields.iter().zip(self.inputs.iter_mut()).enumerate() {
            let focused = idx == self.focused && !field.read_only;
            let title = if field.read_only {
                format!("{} (read-only)", field.column)
            } else {
                field.column.clone()
            };
            let border = if focused {
                Style::default().fg(Color::Cyan)
            } else if field.read_only {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            input.set_block(Block::default().borders(Borders::ALL).title(title).border_style(border));
            input.set_cursor_line_style(Style::default());
            input.set_cursor_style(if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            });
        }
    }
}

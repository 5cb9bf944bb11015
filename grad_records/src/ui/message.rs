//! Modal message box

use ratatui::style::Color;

use crate::error::Error;

/// Severity of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

impl MessageLevel {
    pub fn color(&self) -> Color {
        match self {
            MessageLevel::Info => Color::Cyan,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Error => Color::Red,
        }
    }
}

/// A blocking message; no other input is handled until it is dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub level: MessageLevel,
    pub title: String,
    pub text: String,
}

impl MessageBox {
    pub fn info(title: &str, text: &str) -> Self {
        Self {
            level: MessageLevel::Info,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    pub fn warning(text: &str) -> Self {
        Self {
            level: MessageLevel::Warning,
            title: "Warning".to_string(),
            text: text.to_string(),
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            level: MessageLevel::Error,
            title: "Error".to_string(),
            text: text.to_string(),
        }
    }

    /// Message for a failed action; `action` prefixes unexpected failures
    pub fn from_error(action: &str, error: &Error) -> Self {
        match error {
            e if e.is_validation() => Self::warning(&e.to_string()),
            Error::MissingTable(_) => Self::error(&error.to_string()),
            e => Self::error(&format!("{}: {}", action, e)),
        }
    }
}

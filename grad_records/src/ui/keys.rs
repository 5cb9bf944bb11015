//! Key bindings
//!
//! Keys are mapped to messages per input mode so that typing into a text
//! field never triggers a browser shortcut.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigation,
    Browser,
    Search,
    Dialog,
    Message,
}

/// Everything the user can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Quit,
    SwitchFocus,
    Up,
    Down,
    PreviousTab,
    NextTab,
    OpenSelected,
    FocusSearch,
    Add,
    Edit,
    Delete,
    Refresh,
    CloseTab,
    SearchInput(KeyEvent),
    SubmitSearch,
    LeaveSearch,
    DialogInput(KeyEvent),
    NextField,
    PreviousField,
    SubmitDialog,
    CancelDialog,
    Dismiss,
}

/// Map a key press to a message for the given mode
pub fn map_key(mode: Mode, key: KeyEvent) -> Option<Msg> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Msg::Quit);
    }

    match mode {
        Mode::Message => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Msg::Dismiss),
            _ => None,
        },
        Mode::Dialog => match key.code {
            KeyCode::Enter => Some(Msg::SubmitDialog),
            KeyCode::Esc => Some(Msg::CancelDialog),
            KeyCode::Tab | KeyCode::Down => Some(Msg::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Msg::PreviousField),
            _ => Some(Msg::DialogInput(key)),
        },
        Mode::Search => match key.code {
            KeyCode::Enter => Some(Msg::SubmitSearch),
            KeyCode::Esc | KeyCode::Tab => Some(Msg::LeaveSearch),
            _ => Some(Msg::SearchInput(key)),
        },
        Mode::Navigation => match key.code {
            KeyCode::Char('q') => Some(Msg::Quit),
            KeyCode::Tab => Some(Msg::SwitchFocus),
            KeyCode::Up | KeyCode::Char('k') => Some(Msg::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Msg::Down),
            KeyCode::Enter => Some(Msg::OpenSelected),
            _ => None,
        },
        Mode::Browser => match key.code {
            KeyCode::Char('q') => Some(Msg::Quit),
            KeyCode::Tab | KeyCode::Esc => Some(Msg::SwitchFocus),
            KeyCode::Up | KeyCode::Char('k') => Some(Msg::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Msg::Down),
            KeyCode::Left => Some(Msg::PreviousTab),
            KeyCode::Right => Some(Msg::NextTab),
            KeyCode::Char('/') => Some(Msg::FocusSearch),
            KeyCode::Char('a') => Some(Msg::Add),
            KeyCode::Char('e') | KeyCode::Enter => Some(Msg::Edit),
            KeyCode::Char('d') | KeyCode::Delete => Some(Msg::Delete),
            KeyCode::Char('r') => Some(Msg::Refresh),
            KeyCode::Char('w') => Some(Msg::CloseTab),
            _ => None,
        },
    }
}

/// One-line key help for the status bar
pub fn hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigation => "↑/↓ move  Enter open  Tab browser  q quit",
        Mode::Browser => {
            "↑/↓ select  / search  a add  e edit  d delete  r refresh  ←/→ tabs  w close  Tab nav  q quit"
        }
        Mode::Search => "Enter search (empty shows all)  Esc leave",
        Mode::Dialog => "Tab/↓ next field  Shift-Tab/↑ previous  Enter save  Esc cancel",
        Mode::Message => "Enter dismiss",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[rstest]
    #[case(Mode::Navigation)]
    #[case(Mode::Browser)]
    #[case(Mode::Search)]
    #[case(Mode::Dialog)]
    #[case(Mode::Message)]
    fn ctrl_c_quits_everywhere(#[case] mode: Mode) {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(mode, ctrl_c), Some(Msg::Quit));
    }

    #[test]
    fn letters_are_text_inside_fields() {
        let q = key(KeyCode::Char('q'));
        assert_eq!(map_key(Mode::Dialog, q), Some(Msg::DialogInput(q)));
        assert_eq!(map_key(Mode::Search, q), Some(Msg::SearchInput(q)));
        assert_eq!(map_key(Mode::Browser, q), Some(Msg::Quit));
    }

    #[test]
    fn browser_actions() {
        assert_eq!(map_key(Mode::Browser, key(KeyCode::Char('a'))), Some(Msg::Add));
        assert_eq!(map_key(Mode::Browser, key(KeyCode::Enter)), Some(Msg::Edit));
        assert_eq!(map_key(Mode::Browser, key(KeyCode::Delete)), Some(Msg::Delete));
        assert_eq!(map_key(Mode::Browser, key(KeyCode::Char('/'))), Some(Msg::FocusSearch));
        assert_eq!(map_key(Mode::Browser, key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn message_box_swallows_other_keys() {
        assert_eq!(map_key(Mode::Message, key(KeyCode::Char('a'))), None);
        assert_eq!(map_key(Mode::Message, key(KeyCode::Esc)), Some(Msg::Dismiss));
    }

    #[test]
    fn escape_never_quits() {
        assert_eq!(map_key(Mode::Browser, key(KeyCode::Esc)), Some(Msg::SwitchFocus));
        assert_eq!(map_key(Mode::Navigation, key(KeyCode::Esc)), None);
        assert_eq!(map_key(Mode::Navigation, key(KeyCode::Char('q'))), Some(Msg::Quit));
    }

    #[test]
    fn dialog_navigation() {
        assert_eq!(map_key(Mode::Dialog, key(KeyCode::BackTab)), Some(Msg::PreviousField));
        assert_eq!(map_key(Mode::Dialog, key(KeyCode::Down)), Some(Msg::NextField));
        assert_eq!(map_key(Mode::Dialog, key(KeyCode::Enter)), Some(Msg::SubmitDialog));
    }
}

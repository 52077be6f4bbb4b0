//! Form events and their key bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Events the form reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Char(char),
    /// Bracketed paste content
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Ctrl+U
    ClearField,
    NextField,
    PrevField,
    /// Enter: next field, or submit from the question field
    Enter,
    /// Ctrl+S
    Submit,
    ScrollUp,
    ScrollDown,
    Quit,
}

impl TuiEvent {
    pub fn from_crossterm(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Self::from_key(key),
            Event::Paste(text) => Some(TuiEvent::Paste(text)),
            _ => None,
        }
    }

    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let event = match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => TuiEvent::Quit,
            KeyCode::Char('s') if ctrl => TuiEvent::Submit,
            KeyCode::Char('u') if ctrl => TuiEvent::ClearField,
            KeyCode::Char(_) if ctrl => return None,
            KeyCode::Char(c) => TuiEvent::Char(c),
            KeyCode::Esc => TuiEvent::Quit,
            KeyCode::Enter => TuiEvent::Enter,
            KeyCode::Tab | KeyCode::Down => TuiEvent::NextField,
            KeyCode::BackTab | KeyCode::Up => TuiEvent::PrevField,
            KeyCode::Backspace => TuiEvent::Backspace,
            KeyCode::Delete => TuiEvent::Delete,
            KeyCode::Left => TuiEvent::Left,
            KeyCode::Right => TuiEvent::Right,
            KeyCode::Home => TuiEvent::Home,
            KeyCode::End => TuiEvent::End,
            KeyCode::PageUp => TuiEvent::ScrollUp,
            KeyCode::PageDown => TuiEvent::ScrollDown,
            _ => return None,
        };
        Some(event)
    }
}

//! Form state for the TUI.

use std::path::PathBuf;

use anyhow::Result;

use crate::handlers::AskInput;
use crate::query::{join_responses, QueryResponse};
use crate::utils::unicode::{next_boundary, prev_boundary, width_before};

use super::events::TuiEvent;

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiKey,
    Document,
    Question,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::ApiKey, Field::Document, Field::Question];

    pub fn next(self) -> Self {
        match self {
            Field::ApiKey => Field::Document,
            Field::Document => Field::Question,
            Field::Question => Field::ApiKey,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::ApiKey => Field::Question,
            Field::Document => Field::ApiKey,
            Field::Question => Field::Document,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Field::ApiKey => "Google Gemini API key",
            Field::Document => "Document (PDF, Word, Excel)",
            Field::Question => "Ask something about the document",
        }
    }
}

/// Single-line text input with a byte-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    /// Cursor position (byte index, always on a char boundary)
    pub cursor: usize,
    /// Render every character as `*`
    pub masked: bool,
}

impl InputField {
    pub fn new(value: impl Into<String>, masked: bool) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor, masked }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let clean: String = s.chars().filter(|c| !c.is_control()).collect();
        self.value.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = prev_boundary(&self.value, self.cursor);
        self.value.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        let end = next_boundary(&self.value, self.cursor);
        self.value.replace_range(self.cursor..end, "");
    }

    pub fn left(&mut self) {
        self.cursor = prev_boundary(&self.value, self.cursor);
    }

    pub fn right(&mut self) {
        self.cursor = next_boundary(&self.value, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Text as shown on screen.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Terminal column of the cursor within the displayed text.
    pub fn cursor_column(&self) -> usize {
        if self.masked {
            self.value[..self.cursor].chars().count()
        } else {
            width_before(&self.value, self.cursor)
        }
    }
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(AskInput),
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub api_key: InputField,
    pub document: InputField,
    pub question: InputField,
    pub focus: Field,
    /// Answers, failures, validation messages and errors; anything but an answer shows in red
    pub output: Vec<QueryResponse>,
    pub output_scroll: u16,
    pub status_message: String,
    pub is_busy: bool,
    pub model: String,
}

impl App {
    pub fn new(initial: &AskInput, model: String) -> Self {
        let document = initial
            .doc
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let focus = if initial.api_key.is_empty() {
            Field::ApiKey
        } else if document.is_empty() {
            Field::Document
        } else {
            Field::Question
        };

        let mut app = Self {
            api_key: InputField::new(initial.api_key.clone(), true),
            document: InputField::new(document, false),
            question: InputField::new(initial.question.clone(), false),
            focus,
            output: Vec::new(),
            output_scroll: 0,
            status_message: String::new(),
            is_busy: false,
            model,
        };
        app.update_status_message();
        app
    }

    pub fn field(&self, field: Field) -> &InputField {
        match field {
            Field::ApiKey => &self.api_key,
            Field::Document => &self.document,
            Field::Question => &self.question,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut InputField {
        match field {
            Field::ApiKey => &mut self.api_key,
            Field::Document => &mut self.document,
            Field::Question => &mut self.question,
        }
    }

    fn focused_mut(&mut self) -> &mut InputField {
        self.field_mut(self.focus)
    }

    pub fn ask_input(&self) -> AskInput {
        let doc = self.document.value.trim();
        AskInput {
            api_key: self.api_key.value.trim().to_string(),
            doc: (!doc.is_empty()).then(|| PathBuf::from(doc)),
            question: self.question.value.clone(),
        }
    }

    /// Apply an input event to the form.
    pub fn handle_event(&mut self, event: TuiEvent) -> Action {
        if self.is_busy {
            return match event {
                TuiEvent::Quit => Action::Quit,
                _ => Action::None,
            };
        }
        match event {
            TuiEvent::Char(c) => self.focused_mut().insert(c),
            TuiEvent::Paste(s) => self.focused_mut().insert_str(&s),
            TuiEvent::Backspace => self.focused_mut().backspace(),
            TuiEvent::Delete => self.focused_mut().delete(),
            TuiEvent::Left => self.focused_mut().left(),
            TuiEvent::Right => self.focused_mut().right(),
            TuiEvent::Home => self.focused_mut().home(),
            TuiEvent::End => self.focused_mut().end(),
            TuiEvent::ClearField => self.focused_mut().clear(),
            TuiEvent::NextField => self.focus = self.focus.next(),
            TuiEvent::PrevField => self.focus = self.focus.prev(),
            TuiEvent::ScrollUp => self.output_scroll = self.output_scroll.saturating_sub(5),
            TuiEvent::ScrollDown => self.output_scroll = self.output_scroll.saturating_add(5),
            TuiEvent::Enter => {
                if self.focus == Field::Question {
                    return self.begin_submit();
                }
                self.focus = self.focus.next();
            }
            TuiEvent::Submit => return self.begin_submit(),
            TuiEvent::Quit => return Action::Quit,
        }
        Action::None
    }

    /// Validate the form; on success mark the app busy and hand back the input.
    pub fn begin_submit(&mut self) -> Action {
        let input = self.ask_input();
        match input.validate() {
            Ok(()) => {
                self.is_busy = true;
                self.output.clear();
                self.output_scroll = 0;
                self.update_status_message();
                Action::Submit(input)
            }
            Err(message) => {
                self.output = vec![QueryResponse::Failed(message.to_string())];
                self.focus = if input.api_key.is_empty() { Field::ApiKey } else { Field::Question };
                Action::None
            }
        }
    }

    /// Show the outcome of a submitted query.
    pub fn finish(&mut self, result: Result<Vec<QueryResponse>>) {
        self.output = match result {
            Ok(responses) => responses,
            Err(e) => vec![QueryResponse::Failed(format!("Error: {e:#}"))],
        };
        self.output_scroll = 0;
        self.is_busy = false;
        self.update_status_message();
    }

    /// The answer pane as plain text.
    pub fn output_text(&self) -> String {
        join_responses(&self.output)
    }

    pub fn update_status_message(&mut self) {
        self.status_message = if self.is_busy {
            format!("Asking {}...", self.model)
        } else {
            format!(
                "Model: {} | Tab next field | Enter/Ctrl+S submit | PgUp/PgDn scroll | Esc quit",
                self.model
            )
        };
    }
}

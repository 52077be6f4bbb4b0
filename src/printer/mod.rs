//! Printers: text and markdown (termimad).

use owo_colors::OwoColorize;
use termimad::MadSkin;

use crate::query::QueryResponse;

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        if let Some(c) = self.color {
            match c {
                "cyan" => println!("{}", text.cyan()),
                "red" => println!("{}", text.red()),
                _ => println!("{}", text),
            }
        } else {
            println!("{}", text);
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) { self.skin.print_text(text); println!(); }
}

/// Print per-chunk responses in order. Failure messages go out in red.
pub fn print_responses(responses: &[QueryResponse], markdown: bool) {
    let many = responses.len() > 1;
    for (i, response) in responses.iter().enumerate() {
        if many {
            TextPrinter { color: Some("cyan") }.print(&format!("--- part {} of {} ---", i + 1, responses.len()));
        }
        match response {
            QueryResponse::Answer(text) if markdown => MarkdownPrinter::default().print(text),
            QueryResponse::Answer(text) => TextPrinter { color: None }.print(text),
            other => TextPrinter { color: Some("red") }.print(&other.to_string()),
        }
        if many && i + 1 < responses.len() {
            println!();
        }
    }
}

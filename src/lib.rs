//! Ask Google Gemini questions about PDF, Word and Excel documents.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod printer;
pub mod query;
pub mod tui;
pub mod utils;

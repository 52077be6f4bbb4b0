//! Ask handler: extract the document, query every chunk, print the answers.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;
use crate::llm::{CompletionBackend, GeminiClient};
use crate::printer::print_responses;
use crate::query::{CallClock, DocumentQueryClient, QueryOptions, QueryResponse};
use crate::utils::document::extract_chunks;

pub const MISSING_KEY_MESSAGE: &str = "Please enter your Google Gemini API key.";
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query.";

/// What the user filled in: key, optional document, question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskInput {
    pub api_key: String,
    pub doc: Option<PathBuf>,
    pub question: String,
}

impl AskInput {
    /// The user-facing message for the first missing field, if any.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.api_key.trim().is_empty() {
            return Err(MISSING_KEY_MESSAGE);
        }
        if self.question.trim().is_empty() {
            return Err(EMPTY_QUERY_MESSAGE);
        }
        Ok(())
    }
}

/// Chunks for `doc`, or a single empty chunk when no document was given.
pub fn load_chunks(doc: Option<&Path>, options: &QueryOptions) -> Result<Vec<String>> {
    match doc {
        Some(path) => extract_chunks(path, options.chunk_size),
        None => Ok(vec![String::new()]),
    }
}

/// Run the question against every chunk with an already-built client.
pub async fn answer_with<B: CompletionBackend>(
    client: &DocumentQueryClient<B>,
    doc: Option<&Path>,
    question: &str,
) -> Result<Vec<QueryResponse>> {
    let chunks = load_chunks(doc, client.options())?;
    let mut clock = CallClock::new();
    Ok(client.query_all(&mut clock, &chunks, question.trim()).await)
}

/// Build the Gemini-backed client from config and answer `input`.
pub async fn answer(cfg: &Config, model: &str, input: &AskInput) -> Result<Vec<QueryResponse>> {
    let backend = GeminiClient::from_config(cfg, &input.api_key, model)?;
    let client = DocumentQueryClient::new(backend, cfg.query_options());
    answer_with(&client, input.doc.as_deref(), &input.question).await
}

pub struct AskHandler;

impl AskHandler {
    pub async fn run(cfg: &Config, model: &str, input: &AskInput, markdown: bool) -> Result<()> {
        if let Err(message) = input.validate() {
            anyhow::bail!(message);
        }
        let responses = answer(cfg, model, input).await?;
        print_responses(&responses, markdown);
        Ok(())
    }
}

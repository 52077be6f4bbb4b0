//! Document query client: one prompt per chunk, bounded retries with backoff.

use std::{fmt, num::NonZeroUsize, time::Duration};

use tokio::time::{sleep, Instant};

use crate::llm::{CompletionBackend, CompletionError};
use crate::utils::document::combine_doc_and_prompt;

pub const MALFORMED_MESSAGE: &str = "Failed to extract content from the AI response.";
pub const EXHAUSTED_MESSAGE: &str =
    "Resource exhausted or internal server error. Please try again later.";

/// Retry settings for transient service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts, including the first one.
    pub retries: u32,
    /// Floor for the elapsed time fed into the backoff formula.
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Units per chunk; `None` sends the whole document in one request.
    pub chunk_size: Option<NonZeroUsize>,
    /// `None` gives up on the first transient failure.
    pub backoff: Option<BackoffPolicy>,
    /// Pause between consecutive chunk requests.
    pub call_interval: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            chunk_size: None,
            backoff: Some(BackoffPolicy::default()),
            call_interval: Duration::from_secs(1),
        }
    }
}

/// Time of the most recent API call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallClock {
    last_call: Option<Instant>,
}

impl CallClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self) {
        self.last_call = Some(Instant::now());
    }

    pub fn last_call(&self) -> Option<Instant> {
        self.last_call
    }

    /// Time since the last call; zero if no call has been made yet.
    pub fn elapsed(&self) -> Duration {
        self.last_call.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }
}

/// One chunk paired with the user's question.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    pub chunk: &'a str,
    pub question: &'a str,
}

impl<'a> QueryRequest<'a> {
    pub fn new(chunk: &'a str, question: &'a str) -> Self {
        Self { chunk, question }
    }

    pub fn prompt(&self) -> String {
        combine_doc_and_prompt(self.chunk, self.question)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    Answer(String),
    Malformed,
    Exhausted,
    Failed(String),
}

impl QueryResponse {
    pub fn is_answer(&self) -> bool {
        matches!(self, QueryResponse::Answer(_))
    }
}

impl fmt::Display for QueryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResponse::Answer(text) => f.write_str(text),
            QueryResponse::Malformed => f.write_str(MALFORMED_MESSAGE),
            QueryResponse::Exhausted => f.write_str(EXHAUSTED_MESSAGE),
            QueryResponse::Failed(message) => f.write_str(message),
        }
    }
}

/// `min(max_delay, 2^attempt * elapsed)`, saturating.
pub fn backoff_delay(attempt: u32, elapsed: Duration, max_delay: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    elapsed.saturating_mul(factor).min(max_delay)
}

/// Concatenate per-chunk responses in order, separated by a blank line.
pub fn join_responses(responses: &[QueryResponse]) -> String {
    responses
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct DocumentQueryClient<B> {
    backend: B,
    options: QueryOptions,
}

impl<B: CompletionBackend> DocumentQueryClient<B> {
    pub fn new(backend: B, options: QueryOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send one chunk and question, retrying transient failures per the backoff policy.
    pub async fn query(&self, clock: &mut CallClock, request: QueryRequest<'_>) -> QueryResponse {
        let prompt = request.prompt();
        let attempts = self.options.backoff.map(|b| b.retries.max(1)).unwrap_or(1);

        for attempt in 0..attempts {
            clock.mark();
            tracing::debug!(attempt, attempts, "calling completion backend");
            match self.backend.generate(&prompt).await {
                Ok(text) => return QueryResponse::Answer(text),
                Err(CompletionError::Malformed(reason)) => {
                    tracing::warn!(%reason, "malformed completion response");
                    return QueryResponse::Malformed;
                }
                Err(CompletionError::Fatal(message)) => {
                    tracing::warn!(%message, "completion request failed");
                    return QueryResponse::Failed(message);
                }
                Err(CompletionError::Transient { status, message }) => {
                    tracing::warn!(status, %message, attempt, "transient completion failure");
                    let Some(policy) = self.options.backoff else { break };
                    if attempt + 1 >= attempts {
                        break;
                    }
                    let elapsed = clock.elapsed().max(policy.min_delay);
                    let delay = backoff_delay(attempt, elapsed, policy.max_delay);
                    tracing::debug!(?delay, "backing off before retry");
                    sleep(delay).await;
                }
            }
        }

        QueryResponse::Exhausted
    }

    /// Query every chunk in order, pausing `call_interval` between calls.
    pub async fn query_all(
        &self,
        clock: &mut CallClock,
        chunks: &[String],
        question: &str,
    ) -> Vec<QueryResponse> {
        let mut responses = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                let since = clock.elapsed();
                if since < self.options.call_interval {
                    sleep(self.options.call_interval - since).await;
                }
            }
            tracing::info!(chunk = i + 1, total = chunks.len(), "querying chunk");
            responses.push(self.query(clock, QueryRequest::new(chunk, question)).await);
        }
        responses
    }
}

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "docquery", about = "Ask Google Gemini questions about a PDF, Word or Excel document", version)]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
pub struct Cli {
    /// The question to ask about the document.
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Document to query (.pdf, .docx, .xlsx, or plain text).
    #[arg(short = 'f', long = "doc", value_name = "FILE")]
    pub doc: Option<PathBuf>,

    /// Google Gemini API key (defaults to GEMINI_API_KEY).
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Gemini model to use.
    #[arg(long)]
    pub model: Option<String>,

    /// Split the document into chunks of N pages/paragraphs/sheets (0 disables chunking).
    #[arg(long = "chunk-size", value_name = "N")]
    pub chunk_size: Option<usize>,

    /// Total attempts per request on rate-limit or server errors.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    /// Lower bound for the backoff base delay, in milliseconds.
    #[arg(long = "min-delay-ms", value_name = "MS")]
    pub min_delay_ms: Option<u64>,

    /// Upper bound for any single backoff delay, in milliseconds.
    #[arg(long = "max-delay-ms", value_name = "MS")]
    pub max_delay_ms: Option<u64>,

    /// Pause between consecutive chunk requests, in milliseconds.
    #[arg(long = "call-interval-ms", value_name = "MS")]
    pub call_interval_ms: Option<u64>,

    /// Give up on the first rate-limit or server error.
    #[arg(long = "no-backoff")]
    pub no_backoff: bool,

    /// Render answers as Markdown.
    #[arg(long)]
    pub md: bool,
    /// Print answers as plain text.
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// Open the interactive form.
    ///
    /// Logging is off in the form unless RUST_LOG is set; redirect stderr when enabling it.
    #[arg(long)]
    pub tui: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

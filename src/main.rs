use std::io::{self, Read};

use anyhow::Result;
use is_terminal::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docquery::{
    cli::Cli,
    config::Config,
    handlers::{AskHandler, AskInput},
    tui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let stdin_is_tty = io::stdin().is_terminal();

    // Question from stdin when piped; positional argument appended after it.
    let mut question_from_stdin = String::new();
    if !stdin_is_tty {
        io::stdin().read_to_string(&mut question_from_stdin)?;
    }
    let arg_question = args.question.clone().unwrap_or_default();
    let question = match (question_from_stdin.trim().is_empty(), arg_question.is_empty()) {
        (false, false) => format!("{}\n\n{}", question_from_stdin.trim_end(), arg_question),
        (false, true) => question_from_stdin.trim_end().to_string(),
        _ => arg_question,
    };

    let use_tui = args.tui || (question.trim().is_empty() && stdin_is_tty && io::stdout().is_terminal());
    init_tracing(use_tui);

    let mut cfg = Config::load();
    apply_overrides(&mut cfg, &args);

    let model = args.model.clone().unwrap_or_else(|| cfg.model());
    let input = AskInput {
        api_key: args.api_key.clone().or_else(|| cfg.api_key()).unwrap_or_default(),
        doc: args.doc.clone(),
        question,
    };
    tracing::debug!(model = %model, options = ?cfg.query_options(), "resolved configuration");

    if use_tui {
        return tui::run_tui_form(&cfg, &model, input).await;
    }

    let markdown = if args.no_md {
        false
    } else if args.md {
        true
    } else {
        cfg.get_bool("PRETTIFY_MARKDOWN")
    };
    AskHandler::run(&cfg, &model, &input, markdown).await
}

/// Log to stderr; silent in the form unless RUST_LOG asks otherwise.
fn init_tracing(tui_mode: bool) {
    let default_filter = if tui_mode { "off" } else { "docquery=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// CLI flags take precedence over the rc file and environment.
fn apply_overrides(cfg: &mut Config, args: &Cli) {
    if let Some(n) = args.chunk_size {
        cfg.set("CHUNK_SIZE", n.to_string());
    }
    if let Some(n) = args.retries {
        cfg.set("MAX_RETRIES", n.to_string());
    }
    if let Some(ms) = args.min_delay_ms {
        cfg.set("MIN_DELAY_MS", ms.to_string());
    }
    if let Some(ms) = args.max_delay_ms {
        cfg.set("MAX_DELAY_MS", ms.to_string());
    }
    if let Some(ms) = args.call_interval_ms {
        cfg.set("CALL_INTERVAL_MS", ms.to_string());
    }
    if args.no_backoff {
        cfg.set("ENABLE_BACKOFF", "false");
    }
}

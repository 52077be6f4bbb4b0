use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

use crate::query::{BackoffPolicy, QueryOptions};

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then the rc file at `config_path`, then environment variables named like a config key.
    pub fn load_from(config_path: &Path) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    if let Some((k, v)) = parse_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse::<u32>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    fn get_millis(&self, key: &str, fallback: u64) -> Duration {
        Duration::from_millis(self.get_u64(key).unwrap_or(fallback))
    }

    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<String> {
        self.get("GEMINI_API_KEY").filter(|s| !s.trim().is_empty())
    }

    pub fn model(&self) -> String {
        self.get("DEFAULT_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn api_base_url(&self) -> String {
        match self.get("API_BASE_URL") {
            Some(url) if url != "default" && !url.trim().is_empty() => {
                url.trim_end_matches('/').to_string()
            }
            _ => DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("REQUEST_TIMEOUT").unwrap_or(60))
    }

    /// Assemble the query client options. `CHUNK_SIZE=0` turns chunking off.
    pub fn query_options(&self) -> QueryOptions {
        let chunk_size = self.get_usize("CHUNK_SIZE").and_then(NonZeroUsize::new);
        let backoff = if self.get_bool("ENABLE_BACKOFF") {
            Some(BackoffPolicy {
                retries: self.get_u32("MAX_RETRIES").unwrap_or(3).max(1),
                min_delay: self.get_millis("MIN_DELAY_MS", 1000),
                max_delay: self.get_millis("MAX_DELAY_MS", 16_000),
            })
        } else {
            None
        };
        QueryOptions {
            chunk_size,
            backoff,
            call_interval: self.get_millis("CALL_INTERVAL_MS", 1000),
        }
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "GEMINI_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "REQUEST_TIMEOUT",
        "CHUNK_SIZE",
        "MAX_RETRIES",
        "MIN_DELAY_MS",
        "MAX_DELAY_MS",
        "CALL_INTERVAL_MS",
        "ENABLE_BACKOFF",
        "PRETTIFY_MARKDOWN",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("docquery").join(".docqueryrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Numbers
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("CHUNK_SIZE".into(), "0".into());
    m.insert("MAX_RETRIES".into(), "3".into());
    m.insert("MIN_DELAY_MS".into(), "1000".into());
    m.insert("MAX_DELAY_MS".into(), "16000".into());
    m.insert("CALL_INTERVAL_MS".into(), "1000".into());

    // Strings
    m.insert("DEFAULT_MODEL".into(), DEFAULT_MODEL.into());
    m.insert("API_BASE_URL".into(), "default".into());

    // Bools as strings
    m.insert("ENABLE_BACKOFF".into(), "true".into());
    m.insert("PRETTIFY_MARKDOWN".into(), "false".into());

    m
}

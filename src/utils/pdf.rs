//! PDF text extraction utilities.
//!
//! - Prefer external `pdftotext` (quiet, UTF-8, layout) when available with stderr suppressed.
//! - Fallback to `pdf-extract` and temporarily suppress stderr on Unix to avoid glyph warnings.
//! - `pdftotext` separates pages with form feeds; `pdf-extract` is asked for pages directly.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Result;
use pdf_extract::extract_text_by_pages;

/// Extract the text of every page of a PDF file, in page order.
///
/// # Notes
///
/// - Scanned PDFs without a text layer yield empty pages, not an error.
/// - Corrupted or non-PDF files return an error.
pub fn extract_pdf_pages(path: &Path) -> Result<Vec<String>> {
    // Strategy A: external `pdftotext`, writing to stdout ("-").
    if let Ok(output) = Command::new("pdftotext")
        .arg("-q")
        .arg("-enc")
        .arg("UTF-8")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .stderr(Stdio::null())
        .output()
    {
        if output.status.success() {
            let raw = String::from_utf8_lossy(&output.stdout);
            tracing::debug!(path = %path.display(), "extracted PDF text with pdftotext");
            return Ok(split_pages(&raw));
        }
    }

    // Strategy B: pdf-extract, with its glyph warnings kept off the terminal.
    let pages = with_stderr_suppressed_unix(|| extract_text_by_pages(path))
        .unwrap_or_else(|_| extract_text_by_pages(path))
        .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), pages = pages.len(), "extracted PDF text with pdf-extract");

    if pages.is_empty() {
        return Ok(vec![String::new()]);
    }
    Ok(pages
        .into_iter()
        .map(|page| page.trim_matches(['\r', '\n']).to_string())
        .collect())
}

/// Split raw PDF text on form feeds. A trailing form feed does not start a new page.
fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|page| page.trim_end_matches(['\r', '\n']).to_string())
        .collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[cfg(unix)]
fn with_stderr_suppressed_unix<F, T>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> T,
{
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::io::AsRawFd;

    extern "C" {
        fn dup(fd: i32) -> i32;
        fn dup2(oldfd: i32, newfd: i32) -> i32;
        fn close(fd: i32) -> i32;
    }

    let null = OpenOptions::new().write(true).open("/dev/null")?;
    let null_fd = null.as_raw_fd();

    unsafe {
        let stderr_fd = 2;
        let saved = dup(stderr_fd);
        if saved == -1 {
            return Err(io::Error::last_os_error());
        }

        if dup2(null_fd, stderr_fd) == -1 {
            let _ = close(saved);
            return Err(io::Error::last_os_error());
        }

        let result = f();

        let _ = dup2(saved, stderr_fd);
        let _ = close(saved);

        Ok(result)
    }
}

#[cfg(not(unix))]
fn with_stderr_suppressed_unix<F, T>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> T,
{
    Ok(f())
}

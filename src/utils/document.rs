//! Document processing: format dispatch, chunking, and prompt assembly.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{bail, Result};

use super::{office, pdf};

const SUPPORTED: &str = ".pdf, .docx, .xlsx, .md, .txt, .rst, .log, .csv, and files without extension";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    Spreadsheet,
    Text,
}

impl DocumentKind {
    /// Pick the extractor from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Word),
            "xlsx" => Ok(DocumentKind::Spreadsheet),
            "md" | "txt" | "rst" | "log" | "csv" | "" => Ok(DocumentKind::Text),
            _ => bail!("Unsupported file type: .{}\nCurrently supported: {}", extension, SUPPORTED),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Word => "Word",
            DocumentKind::Spreadsheet => "Excel",
            DocumentKind::Text => "text",
        }
    }
}

/// Read a document into its ordered units (pages, paragraphs, sheets or lines).
pub fn extract_units(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        bail!("Document file '{}' does not exist", path.display());
    }
    if !path.is_file() {
        bail!("'{}' is not a file", path.display());
    }

    let kind = DocumentKind::from_path(path)?;
    let units = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_pages(path)?,
        DocumentKind::Word => office::extract_docx_paragraphs(path)?,
        DocumentKind::Spreadsheet => office::extract_xlsx_sheets(path)?,
        DocumentKind::Text => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", path.display(), e))?
            .lines()
            .map(str::to_string)
            .collect(),
    };

    tracing::info!(path = %path.display(), kind = kind.label(), units = units.len(), "extracted document");
    Ok(units)
}

/// Full document text: units joined by newlines.
pub fn extract_text(path: &Path) -> Result<String> {
    Ok(extract_units(path)?.join("\n"))
}

/// Group consecutive units into chunks of at most `chunk_size` units.
///
/// Joining the returned chunks with `"\n"` reproduces `units.join("\n")`.
pub fn chunk_units(units: &[String], chunk_size: NonZeroUsize) -> Vec<String> {
    units
        .chunks(chunk_size.get())
        .map(|group| group.join("\n"))
        .collect()
}

/// Extract a document and split it into chunks; `None` keeps it whole.
///
/// Always returns at least one chunk so an empty document still yields one request.
pub fn extract_chunks(path: &Path, chunk_size: Option<NonZeroUsize>) -> Result<Vec<String>> {
    let units = extract_units(path)?;
    let chunks = match chunk_size {
        Some(size) => chunk_units(&units, size),
        None => vec![units.join("\n")],
    };
    if chunks.is_empty() {
        return Ok(vec![String::new()]);
    }
    Ok(chunks)
}

/// Combine document content with the user's question.
///
/// # Format
///
/// ```text
/// Document content: [doc_content]
///
/// User question: [user_prompt]
/// ```
pub fn combine_doc_and_prompt(doc_content: &str, user_prompt: &str) -> String {
    format!("Document content: {}\n\nUser question: {}", doc_content, user_prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn units(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a.PDF")).unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("a.docx")).unwrap(), DocumentKind::Word);
        assert_eq!(DocumentKind::from_path(Path::new("a.xlsx")).unwrap(), DocumentKind::Spreadsheet);
        assert_eq!(DocumentKind::from_path(Path::new("README")).unwrap(), DocumentKind::Text);
        let err = DocumentKind::from_path(Path::new("a.pptx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type: .pptx"));
    }

    #[test]
    fn chunk_size_one_gives_one_unit_per_chunk() {
        let chunks = chunk_units(&units(&["p1", "p2", "p3"]), size(1));
        assert_eq!(chunks, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn chunks_rejoin_to_original_text() {
        let source = units(&["a", "b", "", "c", "d e", "f", "g"]);
        let original = source.join("\n");
        for n in 1..=9 {
            let chunks = chunk_units(&source, size(n));
            assert_eq!(chunks.join("\n"), original, "chunk size {n}");
            assert_eq!(chunks.len(), source.len().div_ceil(n));
        }
    }

    #[test]
    fn no_chunk_exceeds_chunk_size() {
        let source = units(&["1", "2", "3", "4", "5"]);
        let chunks = chunk_units(&source, size(2));
        assert_eq!(chunks, vec!["1\n2", "3\n4", "5"]);
    }

    #[test]
    fn empty_units_produce_no_chunks() {
        assert!(chunk_units(&[], size(3)).is_empty());
    }

    #[test]
    fn extract_chunks_from_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "p1\np2\np3\n").unwrap();

        let chunks = extract_chunks(file.path(), Some(size(1))).unwrap();
        assert_eq!(chunks, vec!["p1", "p2", "p3"]);

        let whole = extract_chunks(file.path(), None).unwrap();
        assert_eq!(whole, vec!["p1\np2\np3"]);
    }

    #[test]
    fn empty_document_still_yields_one_chunk() {
        let file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        assert_eq!(extract_chunks(file.path(), Some(size(4))).unwrap(), vec![String::new()]);
    }

    #[test]
    fn missing_file_and_directory_are_errors() {
        let err = extract_units(Path::new("does/not/exist.txt")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let dir = tempfile::tempdir().unwrap();
        let err = extract_units(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }

    #[test]
    fn combine_format() {
        assert_eq!(
            combine_doc_and_prompt("File content here", "Summarize this"),
            "Document content: File content here\n\nUser question: Summarize this"
        );
    }
}

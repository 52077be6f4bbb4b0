//! Word (.docx) and Excel (.xlsx) text extraction.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader};

/// One unit per paragraph, in document order. Tables are skipped.
pub fn extract_docx_paragraphs(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file '{}'", path.display()))?;
    docx_paragraphs(&data).with_context(|| format!("Failed to parse Word document '{}'", path.display()))
}

fn docx_paragraphs(data: &[u8]) -> Result<Vec<String>> {
    let doc = docx_rs::read_docx(data).map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut paragraphs = Vec::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }
    Ok(paragraphs)
}

/// One unit per worksheet: a `Sheet: <name>` header followed by its non-empty rows.
pub fn extract_xlsx_sheets(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file '{}'", path.display()))?;
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(data))
        .with_context(|| format!("Failed to open spreadsheet '{}'", path.display()))?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(sheet = %sheet_name, error = %e, "skipping unreadable worksheet");
                continue;
            }
        };
        let rows = range.rows().map(|row| row.iter().map(format_cell).collect::<Vec<_>>());
        sheets.push(render_sheet(&sheet_name, rows));
    }
    Ok(sheets)
}

fn format_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}

fn render_sheet<I>(name: &str, rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = format!("Sheet: {name}");
    for row in rows {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        out.push('\n');
        out.push_str(&row.join(" | "));
    }
    out
}

use std::fs::File;
use std::io::Write;
use std::num::NonZeroUsize;

use anyhow::Result;
use docquery::utils::{extract_chunks, extract_text, DocumentKind};
use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn one() -> Option<NonZeroUsize> {
    NonZeroUsize::new(1)
}

fn write_docx(dir: &TempDir, paragraphs: &[&str]) -> Result<std::path::PathBuf> {
    let path = dir.path().join("sample.docx");
    let mut doc = Docx::new();
    for text in paragraphs {
        doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    doc.build().pack(File::create(&path)?)?;
    Ok(path)
}

/// A PDF with one line of Courier text per page.
fn write_pdf(dir: &TempDir, pages: &[&str]) -> Result<std::path::PathBuf> {
    let path = dir.path().join("sample.pdf");
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(&path)?;
    Ok(path)
}

/// A minimal OOXML workbook, one worksheet per entry, using inline strings.
fn write_xlsx(dir: &TempDir, sheets: &[(&str, &[&[&str]])]) -> Result<std::path::PathBuf> {
    const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    let path = dir.path().join("sample.xlsx");
    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default();

    let mut overrides = String::new();
    let mut sheet_entries = String::new();
    let mut sheet_rels = String::new();
    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        sheet_entries.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
        sheet_rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
        )
        .as_bytes(),
    )?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
        )
        .as_bytes(),
    )?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>{sheet_entries}</sheets></workbook>"#
        )
        .as_bytes(),
    )?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}">{sheet_rels}</Relationships>"#
        )
        .as_bytes(),
    )?;

    for (i, (_, rows)) in sheets.iter().enumerate() {
        let mut data = String::new();
        for (r, row) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, cell) in row.iter().enumerate() {
                let col = (b'A' + c as u8) as char;
                data.push_str(&format!(
                    r#"<c r="{col}{}" t="inlineStr"><is><t>{cell}</t></is></c>"#,
                    r + 1
                ));
            }
            data.push_str("</row>");
        }
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{MAIN_NS}"><sheetData>{data}</sheetData></worksheet>"#
            )
            .as_bytes(),
        )?;
    }

    zip.finish()?;
    Ok(path)
}

#[test]
fn pdf_pages_become_chunks_in_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_pdf(&dir, &["p1", "p2", "p3"])?;

    assert_eq!(DocumentKind::from_path(&path)?, DocumentKind::Pdf);
    let chunks = extract_chunks(&path, one())?;
    let pages: Vec<&str> = chunks.iter().map(|c| c.trim()).collect();
    assert_eq!(pages, vec!["p1", "p2", "p3"]);

    let pairs = extract_chunks(&path, NonZeroUsize::new(2))?;
    assert_eq!(pairs.len(), 2);
    assert!(pairs[0].contains("p1") && pairs[0].contains("p2"));
    assert_eq!(pairs[1].trim(), "p3");

    Ok(())
}

#[test]
fn xlsx_sheets_become_chunks_in_workbook_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_xlsx(
        &dir,
        &[
            ("People", &[&["name", "role"], &["Ada", "engineer"]]),
            ("Totals", &[&["region", "sales"], &["north", "12"]]),
        ],
    )?;

    assert_eq!(DocumentKind::from_path(&path)?, DocumentKind::Spreadsheet);
    assert_eq!(
        extract_chunks(&path, one())?,
        vec![
            "Sheet: People\nname | role\nAda | engineer",
            "Sheet: Totals\nregion | sales\nnorth | 12",
        ]
    );
    assert_eq!(extract_chunks(&path, None)?.len(), 1);

    Ok(())
}

#[test]
fn docx_paragraphs_become_chunks_in_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_docx(&dir, &["p1", "p2", "p3"])?;

    assert_eq!(DocumentKind::from_path(&path)?, DocumentKind::Word);
    assert_eq!(extract_chunks(&path, one())?, vec!["p1", "p2", "p3"]);
    assert_eq!(extract_chunks(&path, NonZeroUsize::new(2))?, vec!["p1\np2", "p3"]);
    assert_eq!(extract_text(&path)?, "p1\np2\np3");

    Ok(())
}

#[test]
fn whole_document_when_chunking_disabled() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.md");
    File::create(&path)?.write_all("# Title\n\nBody line\n".as_bytes())?;

    assert_eq!(extract_chunks(&path, None)?, vec!["# Title\n\nBody line"]);

    Ok(())
}

#[test]
fn chunks_rejoin_to_extracted_text() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lines.txt");
    let body: String = (1..=10).map(|i| format!("line {i}\n")).collect();
    File::create(&path)?.write_all(body.as_bytes())?;

    let text = extract_text(&path)?;
    for n in 1..=11 {
        let chunks = extract_chunks(&path, NonZeroUsize::new(n))?;
        assert_eq!(chunks.join("\n"), text);
        assert!(chunks.iter().all(|c| c.lines().count() <= n));
    }

    Ok(())
}

#[test]
fn invalid_pdf_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.pdf");
    File::create(&path)?.write_all(b"This is not a PDF file")?;

    assert!(extract_chunks(&path, one()).is_err());
    Ok(())
}

#[test]
fn unsupported_and_missing_files_are_errors() {
    let err = extract_chunks(std::path::Path::new("slides.pptx"), one()).unwrap_err();
    assert!(err.to_string().contains("does not exist"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slides.pptx");
    File::create(&path).unwrap();
    let err = extract_chunks(&path, one()).unwrap_err();
    assert!(err.to_string().contains("Unsupported file type: .pptx"));
}

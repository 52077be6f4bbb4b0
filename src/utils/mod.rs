//! Utilities (document extraction and chunking, text helpers).

pub mod document;
pub mod office;
pub mod pdf;
pub mod unicode;

pub use document::{chunk_units, combine_doc_and_prompt, extract_chunks, extract_text, extract_units, DocumentKind};

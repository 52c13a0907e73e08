use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{DocumentKind, ExtractError};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from the main document part, one line per `w:p`.
pub(super) fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(invalid)?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(invalid)?
        .read_to_string(&mut xml)
        .map_err(invalid)?;

    let paragraphs = paragraphs_from_xml(&xml)?;
    Ok(paragraphs.join("\n"))
}

/// A paragraph still being read: its slot in the output and whether a `w:t` is open.
struct OpenParagraph {
    slot: usize,
    in_text: bool,
}

/// Walks WordprocessingML and collects the text of every paragraph in document order.
///
/// Paragraphs nest (text boxes inside a run); each one keeps the slot of its
/// opening tag, so an outer paragraph precedes the text boxes it anchors.
/// `mc:Fallback` subtrees repeat their `mc:Choice` sibling and are skipped.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<OpenParagraph> = Vec::new();

    loop {
        match reader.read_event().map_err(invalid)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    open.push(OpenParagraph {
                        slot: paragraphs.len(),
                        in_text: false,
                    });
                    paragraphs.push(String::new());
                }
                b"t" => {
                    if let Some(p) = open.last_mut() {
                        p.in_text = true;
                    }
                }
                b"Fallback" => {
                    let end = e.to_end().into_owned();
                    reader.read_to_end(end.name()).map_err(invalid)?;
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => push_str(&mut paragraphs, &open, "\t"),
                b"br" | b"cr" => push_str(&mut paragraphs, &open, "\n"),
                _ => {}
            },
            Event::Text(t) if in_text(&open) => {
                let text = t.unescape().map_err(invalid)?;
                push_str(&mut paragraphs, &open, &text);
            }
            Event::CData(t) if in_text(&open) => {
                push_str(&mut paragraphs, &open, &String::from_utf8_lossy(&t));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    open.pop();
                }
                b"t" => {
                    if let Some(p) = open.last_mut() {
                        p.in_text = false;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn in_text(open: &[OpenParagraph]) -> bool {
    open.last().is_some_and(|p| p.in_text)
}

/// Appends to the innermost open paragraph; text outside any paragraph is dropped.
fn push_str(paragraphs: &mut [String], open: &[OpenParagraph], text: &str) {
    if let Some(p) = open.last() {
        paragraphs[p.slot].push_str(text);
    }
}

fn invalid<E: std::fmt::Display>(e: E) -> ExtractError {
    ExtractError::Invalid {
        kind: DocumentKind::Docx,
        reason: e.to_string(),
    }
}

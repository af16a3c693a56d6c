//! Text extraction from document bytes

use crate::error::{MatcherError, Result};
use crate::input::file_detector::FileType;
use pulldown_cmark::{html, Parser};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use std::sync::LazyLock;

/// Upper bound on the decompressed size of `word/document.xml`.
const MAX_DOCX_XML_BYTES: u64 = 50 * 1024 * 1024;
const DOCX_BODY: &str = "word/document.xml";

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            MatcherError::ExtractionFailure(format!("Could not read PDF: {}", e))
        })?;

        if text.trim().is_empty() {
            return Err(MatcherError::ExtractionFailure(
                "PDF contains no extractable text; it may be image-based (scanned)".to_string(),
            ));
        }
        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| MatcherError::ExtractionFailure(format!("Could not open DOCX: {}", e)))?;

        let entry = archive.by_name(DOCX_BODY).map_err(|e| {
            MatcherError::ExtractionFailure(format!("DOCX is missing {}: {}", DOCX_BODY, e))
        })?;

        let mut xml = Vec::new();
        entry
            .take(MAX_DOCX_XML_BYTES)
            .read_to_end(&mut xml)
            .map_err(|e| MatcherError::ExtractionFailure(format!("Could not read DOCX: {}", e)))?;
        if xml.len() as u64 >= MAX_DOCX_XML_BYTES {
            return Err(MatcherError::ExtractionFailure(format!(
                "{} exceeds {} bytes",
                DOCX_BODY, MAX_DOCX_XML_BYTES
            )));
        }

        let text = docx_body_text(&xml)?;
        if text.trim().is_empty() {
            return Err(MatcherError::ExtractionFailure(
                "DOCX contains no text".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Concatenate `w:t` runs; every paragraph ends with a newline.
fn docx_body_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t.unescape().map_err(|e| {
                    MatcherError::ExtractionFailure(format!("Malformed DOCX text: {}", e))
                })?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MatcherError::ExtractionFailure(format!(
                    "Malformed DOCX XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = String::from_utf8_lossy(bytes);
        let parser = Parser::new(&markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ");

        let stripped = HTML_TAG_RE.replace_all(&text, "");
        let unescaped = stripped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        unescaped
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Route `bytes` to the extractor for `file_type`.
pub fn extract_text(bytes: &[u8], file_type: FileType) -> Result<String> {
    match file_type {
        FileType::Pdf => PdfExtractor.extract(bytes),
        FileType::Docx => DocxExtractor.extract(bytes),
        FileType::Text => PlainTextExtractor.extract(bytes),
        FileType::Markdown => MarkdownExtractor.extract(bytes),
        FileType::Unknown => Err(MatcherError::UnsupportedFormat(
            "only PDF, DOCX, TXT and Markdown files can be read".to_string(),
        )),
    }
}

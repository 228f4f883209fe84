//! DOCX reader: unzips `word/document.xml` and walks its runs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";
/// Cap on the inflated size of the document part. Real resumes stay far below.
const MAX_DOCUMENT_XML_BYTES: u64 = 8 * 1024 * 1024;

/// Returns one line per paragraph; tabs and breaks inside runs are kept.
pub(super) fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Failure(format!("not a DOCX archive: {e}")))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Failure(format!("missing {DOCUMENT_PART}: {e}")))?;
    if part.size() > MAX_DOCUMENT_XML_BYTES {
        return Err(too_large());
    }

    // The declared size can lie; bound the inflated stream as well.
    let mut xml = String::new();
    (&mut part)
        .take(MAX_DOCUMENT_XML_BYTES + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Failure(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    if xml.len() as u64 > MAX_DOCUMENT_XML_BYTES {
        return Err(too_large());
    }

    paragraphs_from_xml(&xml)
}

fn too_large() -> ExtractionError {
    ExtractionError::Failure(format!(
        "{DOCUMENT_PART} inflates past {} MiB",
        MAX_DOCUMENT_XML_BYTES / (1024 * 1024)
    ))
}

fn paragraphs_from_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::Failure(format!("malformed document XML: {e}")))?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| ExtractionError::Failure(format!("bad text run: {e}")))?;
                out.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// Builds a minimal DOCX whose body holds one paragraph per entry.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", FileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }
}

//! Document Extractor — turns uploaded PDF / DOCX / TXT bytes into plain text.
//!
//! Never panics on malformed input: every failure comes back as an
//! `ExtractionError` so a batch caller can skip the one bad document.

use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

mod docx;


#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    #[error("unsupported document type '{0}' (expected .pdf, .docx or .txt)")]
    UnsupportedFormat(String),

    #[error("could not extract text: {0}")]
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Resolves the kind from the filename extension, falling back to the
    /// declared content type when the filename has no extension.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Result<Self, ExtractionError> {
        match extension(filename) {
            Some(ext) => Self::from_extension(&ext)
                .ok_or_else(|| ExtractionError::UnsupportedFormat(format!(".{ext}"))),
            None => content_type
                .and_then(Self::from_content_type)
                .ok_or_else(|| {
                    ExtractionError::UnsupportedFormat(
                        content_type.unwrap_or("unknown").to_string(),
                    )
                }),
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            // Legacy .doc is attempted as DOCX; a binary .doc fails extraction.
            "docx" | "doc" => Some(Self::Docx),
            "txt" | "text" | "md" => Some(Self::Txt),
            _ => None,
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/msword" => Some(Self::Docx),
            "text/plain" | "text/markdown" => Some(Self::Txt),
            _ => None,
        }
    }
}

fn extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// An uploaded document as received. Its text is derived once, by `extract`.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeDocument {
    /// Detects the document kind and extracts its text.
    pub fn extract(&self) -> Result<ExtractedDocument, ExtractionError> {
        let kind = DocumentKind::detect(&self.filename, self.content_type.as_deref())?;
        let text = extract_text(&self.bytes, kind)?;
        Ok(ExtractedDocument { kind, text })
    }

    /// `extract` on the blocking pool; PDF parsing is CPU-bound.
    pub async fn extract_blocking(self) -> Result<ExtractedDocument, ExtractionError> {
        tokio::task::spawn_blocking(move || self.extract())
            .await
            .unwrap_or_else(|e| Err(ExtractionError::Failure(format!("extraction task failed: {e}"))))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    pub text: String,
}

/// Extracts plain text from `bytes`. Blank output counts as a failure.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes)?,
        DocumentKind::Docx => docx::extract_docx(bytes)?,
        DocumentKind::Txt => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::Failure(
            "document contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs.
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| ExtractionError::Failure("PDF parser crashed on malformed input".to_string()))?
        .map_err(|e| ExtractionError::Failure(format!("invalid PDF: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::detect("CV.PDF", None), Ok(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect("resume.docx", None), Ok(DocumentKind::Docx));
        assert_eq!(DocumentKind::detect("old.doc", None), Ok(DocumentKind::Docx));
        assert_eq!(DocumentKind::detect("notes.txt", None), Ok(DocumentKind::Txt));
    }

    #[test]
    fn test_detect_rejects_unknown_extension() {
        let err = DocumentKind::detect("candidate_c.rtf", Some("text/plain")).unwrap_err();
        assert_eq!(err, ExtractionError::UnsupportedFormat(".rtf".to_string()));
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            DocumentKind::detect("resume", Some("application/pdf")),
            Ok(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect("", Some("text/plain; charset=utf-8")),
            Ok(DocumentKind::Txt)
        );
        assert!(matches!(
            DocumentKind::detect("resume", Some("image/png")),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            DocumentKind::detect("resume", None),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        assert_eq!(extension(".profile"), None);
        assert_eq!(extension("dir.d/resume"), None);
        assert_eq!(extension("a/b/c.TXT"), Some("txt".to_string()));
    }

    #[test]
    fn test_txt_is_decoded_lossily() {
        let text = extract_text(b"Python \xff developer", DocumentKind::Txt).unwrap();
        assert!(text.starts_with("Python "));
        assert!(text.ends_with(" developer"));
    }

    #[test]
    fn test_blank_text_is_a_failure() {
        assert!(matches!(
            extract_text(b"  \n\t ", DocumentKind::Txt),
            Err(ExtractionError::Failure(_))
        ));
    }

    #[test]
    fn test_malformed_pdf_is_a_failure_not_a_panic() {
        let result = extract_text(b"%PDF-1.4\nthis is not really a pdf", DocumentKind::Pdf);
        assert!(matches!(result, Err(ExtractionError::Failure(_))));
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let bytes = fixtures::pdf_with_text("PyTorch engineer");
        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert!(text.contains("PyTorch engineer"), "got {text:?}");
    }

    #[tokio::test]
    async fn test_pdf_resume_document_extract_blocking() {
        let doc = ResumeDocument {
            filename: "candidate_a.PDF".to_string(),
            content_type: Some("application/octet-stream".to_string()),
            bytes: Bytes::from(fixtures::pdf_with_text("Senior ML engineer, AWS")),
        };
        let extracted = doc.extract_blocking().await.unwrap();
        assert_eq!(extracted.kind, DocumentKind::Pdf);
        assert!(extracted.text.contains("Senior ML engineer, AWS"));
    }

    #[test]
    fn test_resume_document_extract() {
        let doc = ResumeDocument {
            filename: "candidate_a.txt".to_string(),
            content_type: None,
            bytes: Bytes::from_static(b"Senior ML engineer: Python, PyTorch"),
        };
        let extracted = doc.extract().unwrap();
        assert_eq!(extracted.kind, DocumentKind::Txt);
        assert!(extracted.text.contains("PyTorch"));
    }

    #[tokio::test]
    async fn test_extract_blocking_reports_unsupported() {
        let doc = ResumeDocument {
            filename: "candidate.rtf".to_string(),
            content_type: None,
            bytes: Bytes::from_static(b"{\\rtf1 hello}"),
        };
        assert!(matches!(
            doc.extract_blocking().await,
            Err(ExtractionError::UnsupportedFormat(_))
        ));
    }
}

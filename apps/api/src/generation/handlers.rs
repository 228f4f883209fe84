//! Axum route handlers for the recruiting API.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, FromRequest, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::{DocumentKind, ResumeDocument};
use crate::generation::email::generate_email;
use crate::generation::job_description::generate_job_description;
use crate::generation::scoring::{score_resumes, ScoringLimits};
use crate::models::email::{EmailMode, EmailRequest};
use crate::models::job_description::JobDescriptionRequest;
use crate::models::scoring::ScoreReport;
use crate::state::AppState;

/// `Json` whose rejections come back in the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateJdResponse {
    pub job_description: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct UploadJdResponse {
    pub jd_text: String,
    pub filename: String,
    pub format: DocumentKind,
}

#[derive(Debug, Serialize)]
pub struct ScoreResumesResponse {
    #[serde(flatten)]
    pub report: ScoreReport,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateEmailResponse {
    pub email: String,
    pub mode: EmailMode,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /jd/generate
pub async fn handle_generate_jd(
    State(state): State<AppState>,
    AppJson(request): AppJson<JobDescriptionRequest>,
) -> Result<Json<GenerateJdResponse>, AppError> {
    let job_description = generate_job_description(state.llm.as_ref(), &request).await?;
    Ok(Json(GenerateJdResponse {
        job_description,
        model: state.llm.model().to_string(),
    }))
}

/// POST /jd/upload
///
/// Multipart with a single `file` part. Returns the extracted text so the
/// client can review it before scoring.
pub async fn handle_upload_jd(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadJdResponse>, AppError> {
    let mut file = None;
    for part in read_parts(multipart?).await? {
        let name = part.name.clone();
        match name.as_str() {
            "file" | "jd_file" if part.is_present() => {
                if file.is_some() {
                    return Err(AppError::Validation(
                        "upload exactly one file".to_string(),
                    ));
                }
                file = Some(part.into_document());
            }
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    let document = file.ok_or_else(|| AppError::Validation("a 'file' part is required".to_string()))?;
    let filename = document.filename.clone();
    let extracted = document.extract_blocking().await?;

    Ok(Json(UploadJdResponse {
        jd_text: extracted.text,
        filename,
        format: extracted.kind,
    }))
}

/// POST /resumes/score
///
/// Multipart fields: `jd_text` or `jd_file` (optionally `jd_mode` = text|file)
/// and one or more `resumes` files. Per-resume failures are reported inline.
pub async fn handle_score_resumes(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScoreResumesResponse>, AppError> {
    let mut jd_mode = None;
    let mut jd_text = None;
    let mut jd_file = None;
    let mut resumes = Vec::new();

    for part in read_parts(multipart?).await? {
        let name = part.name.clone();
        match name.as_str() {
            "jd_mode" => jd_mode = Some(part.text()?),
            "jd_text" => jd_text = Some(part.text()?),
            "jd_file" if part.is_present() => jd_file = Some(part.into_document()),
            "resumes" | "resumes[]" if part.is_present() => resumes.push(part.into_document()),
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    if resumes.is_empty() {
        return Err(AppError::Validation(
            "at least one resume must be uploaded".to_string(),
        ));
    }
    if resumes.len() > state.config.max_resumes {
        return Err(AppError::Validation(format!(
            "at most {} resumes are allowed per request",
            state.config.max_resumes
        )));
    }

    let jd = match resolve_jd_source(jd_mode.as_deref(), jd_text, jd_file)? {
        JdSource::Text(text) => text,
        JdSource::File(document) => document.extract_blocking().await?.text,
    };

    let report = score_resumes(
        Arc::clone(&state.llm),
        &jd,
        resumes,
        ScoringLimits::from(&state.config),
    )
    .await;

    Ok(Json(ScoreResumesResponse {
        report,
        model: state.llm.model().to_string(),
    }))
}

/// POST /email/generate
pub async fn handle_generate_email(
    State(state): State<AppState>,
    AppJson(request): AppJson<EmailRequest>,
) -> Result<Json<GenerateEmailResponse>, AppError> {
    let email = generate_email(state.llm.as_ref(), &request).await?;
    Ok(Json(GenerateEmailResponse {
        email,
        mode: request.mode,
        model: state.llm.model().to_string(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart helpers
// ────────────────────────────────────────────────────────────────────────────

struct UploadedPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedPart {
    /// Browsers send an empty, nameless part for an unset file input.
    fn is_present(&self) -> bool {
        !(self.data.is_empty() && self.filename.as_deref().map_or(true, str::is_empty))
    }

    fn text(&self) -> Result<String, AppError> {
        String::from_utf8(self.data.to_vec())
            .map_err(|_| AppError::Validation(format!("field '{}' is not valid UTF-8", self.name)))
    }

    fn into_document(self) -> ResumeDocument {
        ResumeDocument {
            filename: self.filename.unwrap_or_default(),
            content_type: self.content_type,
            bytes: self.data,
        }
    }
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<UploadedPart>, AppError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        parts.push(UploadedPart {
            name,
            filename,
            content_type,
            data,
        });
    }
    Ok(parts)
}

enum JdSource {
    Text(String),
    File(ResumeDocument),
}

fn resolve_jd_source(
    mode: Option<&str>,
    text: Option<String>,
    file: Option<ResumeDocument>,
) -> Result<JdSource, AppError> {
    let text = text.filter(|t| !t.trim().is_empty());
    match mode.map(str::trim) {
        Some("text") => text
            .map(JdSource::Text)
            .ok_or_else(|| AppError::Validation("jd_text is required when jd_mode='text'".to_string())),
        Some("file") => file
            .map(JdSource::File)
            .ok_or_else(|| AppError::Validation("jd_file is required when jd_mode='file'".to_string())),
        Some("") | None => file
            .map(JdSource::File)
            .or(text.map(JdSource::Text))
            .ok_or_else(|| AppError::Validation("provide jd_text or jd_file".to_string())),
        Some(other) => Err(AppError::Validation(format!(
            "jd_mode must be 'file' or 'text', got '{other}'"
        ))),
    }
}

//! Candidate emails: interview invitations and rejections.

use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    render, shorten, ACCEPT_DEFAULT_MAX_WORDS, ACCEPT_DEFAULT_TONE, ACCEPT_EMAIL_TEMPLATE,
    EMAIL_CONTEXT_TEMPLATE, MAX_EMBEDDED_CHARS, REJECT_DEFAULT_MAX_WORDS, REJECT_DEFAULT_TONE,
    REJECT_EMAIL_TEMPLATE,
};
use crate::llm_client::prompts::PLAIN_OUTPUT_INSTRUCTION;
use crate::llm_client::{GenerationConfig, TextGenerator};
use crate::models::email::{EmailMode, EmailRequest};

/// Builds the email prompt for `request.mode`. Pure: same input, same prompt.
pub fn build_email_prompt(request: &EmailRequest) -> String {
    let role = request.role.trim();
    let company = request.company.trim();
    let role_line = if company.is_empty() {
        role.to_string()
    } else {
        format!("{role} at {company}")
    };

    let context = request
        .jd_text
        .as_deref()
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .map(|jd| {
            render(
                EMAIL_CONTEXT_TEMPLATE,
                &[("jd_text", shorten(jd, MAX_EMBEDDED_CHARS))],
            )
        })
        .unwrap_or_default();

    let (template, default_tone, default_max_words) = match request.mode {
        EmailMode::Accept => (
            ACCEPT_EMAIL_TEMPLATE,
            ACCEPT_DEFAULT_TONE,
            ACCEPT_DEFAULT_MAX_WORDS,
        ),
        EmailMode::Reject => (
            REJECT_EMAIL_TEMPLATE,
            REJECT_DEFAULT_TONE,
            REJECT_DEFAULT_MAX_WORDS,
        ),
    };

    let tone = non_blank(&request.tone).unwrap_or(default_tone);
    let max_words = request.max_words.unwrap_or(default_max_words).to_string();
    let interview_date = non_blank(&request.interview_date).unwrap_or("TBD");
    let location = non_blank(&request.location).unwrap_or("Online");

    render(
        template,
        &[
            ("plain_output", PLAIN_OUTPUT_INSTRUCTION),
            ("candidate_name", request.candidate_name.trim()),
            ("role_line", role_line.as_str()),
            ("context", context.as_str()),
            ("interview_date", interview_date),
            ("location", location),
            ("tone", tone),
            ("max_words", max_words.as_str()),
        ],
    )
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn generate_email(
    llm: &dyn TextGenerator,
    request: &EmailRequest,
) -> Result<String, AppError> {
    request.validate()?;

    let prompt = build_email_prompt(request);
    let email = llm.generate(&prompt, &GenerationConfig::email()).await?;

    info!(
        "Generated {:?} email for candidate '{}'",
        request.mode,
        request.candidate_name.trim()
    );
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::LlmError;

    fn request(mode: EmailMode) -> EmailRequest {
        EmailRequest {
            mode,
            candidate_name: "Priya Shah".to_string(),
            role: "Machine Learning Engineer".to_string(),
            company: "Tech Innovations Inc.".to_string(),
            jd_text: None,
            interview_date: Some("2026-11-03 10:00 IST".to_string()),
            location: None,
            tone: None,
            max_words: None,
        }
    }

    #[test]
    fn test_accept_prompt_is_an_invitation() {
        let prompt = build_email_prompt(&request(EmailMode::Accept));
        assert!(prompt.contains("interview invitation"));
        assert!(prompt.contains("Priya Shah"));
        assert!(prompt.contains("Machine Learning Engineer at Tech Innovations Inc."));
        assert!(prompt.contains("2026-11-03 10:00 IST"));
        assert!(prompt.contains("Location/mode: Online"));
        assert!(prompt.contains("under 180 words"));
        assert!(!prompt.contains("rejection"));
    }

    #[test]
    fn test_reject_prompt_is_empathetic() {
        let prompt = build_email_prompt(&request(EmailMode::Reject));
        assert!(prompt.contains("empathetic rejection"));
        assert!(prompt.contains("Respectful and encouraging"));
        assert!(prompt.contains("under 130 words"));
        assert!(!prompt.contains("Interview date/time"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let req = request(EmailMode::Accept);
        assert_eq!(build_email_prompt(&req), build_email_prompt(&req));
        let req = request(EmailMode::Reject);
        assert_eq!(build_email_prompt(&req), build_email_prompt(&req));
    }

    #[test]
    fn test_overrides_and_context() {
        let mut req = request(EmailMode::Accept);
        req.company = String::new();
        req.interview_date = None;
        req.tone = Some("Upbeat and casual".to_string());
        req.max_words = Some(90);
        req.jd_text = Some("We need PyTorch depth.".to_string());

        let prompt = build_email_prompt(&req);
        assert!(prompt.contains("Role: Machine Learning Engineer\n"));
        assert!(prompt.contains("Interview date/time: TBD"));
        assert!(prompt.contains("Tone: Upbeat and casual."));
        assert!(prompt.contains("under 90 words"));
        assert!(prompt.contains("do not repeat it"));
        assert!(prompt.contains("We need PyTorch depth."));
    }

    #[tokio::test]
    async fn test_generate_email() {
        let llm = ScriptedGenerator::new()
            .on("interview invitation", "Subject: Interview invitation\n\nHi Priya,");
        let email = generate_email(&llm, &request(EmailMode::Accept))
            .await
            .unwrap();
        assert!(email.starts_with("Subject:"));
    }

    #[tokio::test]
    async fn test_model_error_is_surfaced() {
        let llm = ScriptedGenerator::new().otherwise(Err(LlmError::Api {
            status: 400,
            message: "bad request".to_string(),
        }));
        let err = generate_email(&llm, &request(EmailMode::Reject))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModelError(_)));
    }
}

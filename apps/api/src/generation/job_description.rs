//! Job description drafting: request → prompt → model → Markdown text.

use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{render, JD_HEADINGS, JD_PROMPT_TEMPLATE};
use crate::llm_client::{GenerationConfig, TextGenerator};
use crate::models::job_description::JobDescriptionRequest;

/// Builds the drafting prompt. Every supplied field appears verbatim;
/// blank optional fields are left out rather than rendered empty.
pub fn build_jd_prompt(request: &JobDescriptionRequest) -> String {
    let mut inputs = vec![format!("Job Title: {}", request.title.trim())];
    if let Some(years) = request.experience {
        inputs.push(format!("Experience (years): {years}"));
    }
    if !request.skills.is_empty() {
        inputs.push(format!("Must-have Skills: {}", request.skills.join(", ")));
    }
    inputs.push(format!("Company: {}", request.company.trim()));
    inputs.push(format!("Employment Type: {}", request.employment_type()));
    if let Some(industry) = request.industry() {
        inputs.push(format!("Industry: {industry}"));
    }
    if let Some(location) = request.location() {
        inputs.push(format!("Location: {location}"));
    }

    let headings = JD_HEADINGS
        .iter()
        .map(|h| format!("\"{h}\""))
        .collect::<Vec<_>>()
        .join(", ");

    render(
        JD_PROMPT_TEMPLATE,
        &[("headings", headings.as_str()), ("inputs", inputs.join("\n").as_str())],
    )
}

pub async fn generate_job_description(
    llm: &dyn TextGenerator,
    request: &JobDescriptionRequest,
) -> Result<String, AppError> {
    request.validate()?;

    let prompt = build_jd_prompt(request);
    let text = llm
        .generate(&prompt, &GenerationConfig::job_description())
        .await?;

    info!(
        "Generated job description for '{}' ({} chars)",
        request.title.trim(),
        text.len()
    );
    Ok(text)
}

use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";

/// Inputs for drafting a job description. Used once to build a prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobDescriptionRequest {
    pub title: String,
    /// Years of experience required.
    #[serde(default, alias = "years_experience")]
    pub experience: Option<u32>,
    /// Accepts a JSON array or a single comma-separated string.
    #[serde(default, deserialize_with = "skills_list")]
    pub skills: Vec<String>,
    pub company: String,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl JobDescriptionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("company cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn employment_type(&self) -> &str {
        non_blank(&self.employment_type).unwrap_or(DEFAULT_EMPLOYMENT_TYPE)
    }

    pub fn industry(&self) -> Option<&str> {
        non_blank(&self.industry)
    }

    pub fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

fn skills_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = match Option::<SkillsInput>::deserialize(deserializer)? {
        Some(SkillsInput::List(list)) => list,
        Some(SkillsInput::Csv(csv)) => csv.split(',').map(String::from).collect(),
        None => Vec::new(),
    };
    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

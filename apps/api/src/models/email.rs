use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailMode {
    /// Interview invitation.
    Accept,
    Reject,
}

/// Inputs for one candidate email. Maps 1:1 to a generated email.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailRequest {
    #[serde(alias = "status")]
    pub mode: EmailMode,
    pub candidate_name: String,
    #[serde(alias = "job_title")]
    pub role: String,
    #[serde(default)]
    pub company: String,
    /// Job description passed as background for the model.
    #[serde(default)]
    pub jd_text: Option<String>,
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Overrides the default tone line for the mode.
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub max_words: Option<u32>,
}

impl EmailRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.candidate_name.trim().is_empty() {
            return Err(AppError::Validation(
                "candidate_name cannot be empty".to_string(),
            ));
        }
        if self.role.trim().is_empty() {
            return Err(AppError::Validation("role cannot be empty".to_string()));
        }
        if self.max_words == Some(0) {
            return Err(AppError::Validation(
                "max_words must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

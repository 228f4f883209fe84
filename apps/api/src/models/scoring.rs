use serde::Serialize;

use crate::errors::ErrorBody;

/// Outcome of scoring one resume. Produced once per resume per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Upload position within the batch.
    pub index: usize,
    pub candidate: String,
    /// Always within 0..=100.
    pub score: u8,
    pub missing_skills: Vec<String>,
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateFailure {
    pub index: usize,
    pub candidate: String,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateResult {
    Scored(MatchResult),
    Failed(CandidateFailure),
}

impl CandidateResult {
    pub fn index(&self) -> usize {
        match self {
            CandidateResult::Scored(m) => m.index,
            CandidateResult::Failed(f) => f.index,
        }
    }

    pub fn as_scored(&self) -> Option<&MatchResult> {
        match self {
            CandidateResult::Scored(m) => Some(m),
            CandidateResult::Failed(_) => None,
        }
    }
}

/// Aggregated batch result.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    /// Scored entries by descending score, then failures in upload order.
    pub matches: Vec<CandidateResult>,
    /// Upload index of the best-scoring entry.
    pub best_match: Option<usize>,
    pub best_candidate: Option<MatchResult>,
}

//! Resume scoring — one independent extract → prompt → model → parse cycle
//! per resume, run concurrently and aggregated by upload index.
//!
//! A failure in one resume (unreadable file, model error, unparseable reply,
//! deadline) becomes a `Failed` entry for that resume only.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::ResumeDocument;
use crate::generation::prompts::{render, shorten, MAX_EMBEDDED_CHARS, SCORING_PROMPT_TEMPLATE};
use crate::generation::response_parser::{parse_score_card, ScoreCard};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{GenerationConfig, LlmError, TextGenerator};
use crate::models::scoring::{CandidateFailure, CandidateResult, MatchResult, ScoreReport};

/// Builds the scoring prompt. Both texts are shortened before embedding.
pub fn build_scoring_prompt(jd_text: &str, resume_text: &str) -> String {
    render(
        SCORING_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("jd_text", shorten(jd_text.trim(), MAX_EMBEDDED_CHARS)),
            ("resume_text", shorten(resume_text.trim(), MAX_EMBEDDED_CHARS)),
        ],
    )
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringLimits {
    pub concurrency: usize,
    /// Deadline for one resume's full cycle.
    pub candidate_timeout: Duration,
}

impl From<&Config> for ScoringLimits {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.scoring_concurrency.max(1),
            candidate_timeout: config.candidate_timeout,
        }
    }
}

/// Scores every resume against `jd_text`. Never fails as a whole.
pub async fn score_resumes(
    llm: Arc<dyn TextGenerator>,
    jd_text: &str,
    resumes: Vec<ResumeDocument>,
    limits: ScoringLimits,
) -> ScoreReport {
    let jd_text: Arc<str> = Arc::from(jd_text);
    let permits = Arc::new(Semaphore::new(limits.concurrency.max(1)));
    let names: Vec<String> = resumes
        .iter()
        .enumerate()
        .map(|(index, doc)| candidate_name(index, &doc.filename))
        .collect();

    let mut tasks = JoinSet::new();
    for (index, doc) in resumes.into_iter().enumerate() {
        let llm = Arc::clone(&llm);
        let jd_text = Arc::clone(&jd_text);
        let permits = Arc::clone(&permits);

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            let outcome = tokio::time::timeout(
                limits.candidate_timeout,
                score_one(llm.as_ref(), &jd_text, doc),
            )
            .await
            .unwrap_or_else(|_| Err(LlmError::Timeout(limits.candidate_timeout).into()));
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<CandidateResult>> = vec![None; names.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                let candidate = names[index].clone();
                slots[index] = Some(match outcome {
                    Ok(card) => CandidateResult::Scored(MatchResult {
                        index,
                        candidate,
                        score: card.score,
                        missing_skills: card.missing_skills,
                        remarks: card.remarks,
                    }),
                    Err(err) => {
                        warn!("Scoring failed for '{candidate}': {err}");
                        CandidateResult::Failed(CandidateFailure {
                            index,
                            candidate,
                            error: err.body(),
                        })
                    }
                });
            }
            Err(join_err) => warn!("Scoring task aborted: {join_err}"),
        }
    }

    let results = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                let err = AppError::Internal(anyhow::anyhow!("scoring task aborted"));
                CandidateResult::Failed(CandidateFailure {
                    index,
                    candidate: names[index].clone(),
                    error: err.body(),
                })
            })
        })
        .collect();

    let report = rank(results);
    info!(
        "Scored {} resume(s), best match: {:?}",
        report.matches.len(),
        report.best_match
    );
    report
}

async fn score_one(
    llm: &dyn TextGenerator,
    jd_text: &str,
    doc: ResumeDocument,
) -> Result<ScoreCard, AppError> {
    let extracted = doc.extract_blocking().await?;
    let prompt = build_scoring_prompt(jd_text, &extracted.text);
    let reply = llm.generate(&prompt, &GenerationConfig::scoring()).await?;
    Ok(parse_score_card(&reply)?)
}

/// Scored entries by descending score (ties keep upload order), then failures
/// in upload order. The best match is the first scored entry.
pub fn rank(mut results: Vec<CandidateResult>) -> ScoreReport {
    results.sort_by_key(|r| match r.as_scored() {
        Some(m) => (0, std::cmp::Reverse(m.score), r.index()),
        None => (1, std::cmp::Reverse(0), r.index()),
    });

    let best_candidate = results.first().and_then(CandidateResult::as_scored).cloned();
    ScoreReport {
        best_match: best_candidate.as_ref().map(|m| m.index),
        best_candidate,
        matches: results,
    }
}

fn candidate_name(index: usize, filename: &str) -> String {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        format!("resume-{}", index + 1)
    } else {
        trimmed.to_string()
    }
}

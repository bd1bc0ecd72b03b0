use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::analyst::ResumeAnalyst;
use super::dataset::ResumeRecord;

/// Verdict line substituted when the remote call fails for one resume.
pub const FAILURE_PLACEHOLDER: &str = "Error in analysis.";

/// Per-resume verdict, index-aligned with the submitted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub id: i64,
    pub lines: Vec<String>,
    pub tokens_used: u32,
}

impl AnalysisOutcome {
    fn failed(id: i64) -> Self {
        Self {
            id,
            lines: vec![FAILURE_PLACEHOLDER.to_string()],
            tokens_used: 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.tokens_used == 0 && self.lines == [FAILURE_PLACEHOLDER]
    }
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub outcomes: Vec<AnalysisOutcome>,
    pub total_tokens: u64,
    pub elapsed: Duration,
}

/// Dispatches up to `limit` resumes for concurrent analysis and joins on all
/// of them.
///
/// Every launched call resolves to exactly one outcome: a failed call is
/// logged and replaced by the fixed placeholder with zero tokens, so the
/// batch itself never fails and siblings are never cancelled. Outcomes are
/// collected index-aligned, so output order matches submission order
/// regardless of completion order.
pub async fn screen_batch<A>(analyst: &A, records: &[ResumeRecord], limit: usize) -> BatchSummary
where
    A: ResumeAnalyst + ?Sized,
{
    let started = Instant::now();

    let calls = records.iter().take(limit).map(|record| async move {
        match analyst.analyze(&record.text).await {
            Ok(analysis) => AnalysisOutcome {
                id: record.id,
                lines: analysis
                    .verdict
                    .lines()
                    .map(|line| line.to_string())
                    .collect(),
                tokens_used: analysis.total_tokens,
            },
            Err(err) => {
                error!(resume_id = record.id, %err, "error during analysis call");
                AnalysisOutcome::failed(record.id)
            }
        }
    });

    let outcomes = join_all(calls).await;
    let total_tokens = outcomes
        .iter()
        .map(|outcome| u64::from(outcome.tokens_used))
        .sum();
    let elapsed = started.elapsed();

    info!(
        submitted = outcomes.len(),
        total_tokens,
        elapsed_ms = elapsed.as_millis() as u64,
        "screening batch complete"
    );

    BatchSummary {
        outcomes,
        total_tokens,
        elapsed,
    }
}

use std::io::Cursor;
use std::sync::Arc;

use serde::Serialize;

use super::analyst::ResumeAnalyst;
use super::batch::{screen_batch, BatchSummary};
use super::dataset::{DatasetError, ResumeDataset};

/// Where a run's resumes came from, surfaced in API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSource {
    Preloaded,
    Inline,
}

/// Result of one screening run, pairing the batch summary with its source.
#[derive(Debug)]
pub struct ScreeningRun {
    pub source: ResumeSource,
    pub submitted: usize,
    pub summary: BatchSummary,
}

/// Session state for the screening surface: the analyst, the dataset loaded
/// at startup, and the default batch cutoff. Replaces the ambient globals of
/// earlier prototypes with an explicit struct handed to the router.
pub struct ScreeningService<A> {
    analyst: Arc<A>,
    dataset: ResumeDataset,
    batch_limit: usize,
}

impl<A> ScreeningService<A>
where
    A: ResumeAnalyst + 'static,
{
    pub fn new(analyst: Arc<A>, dataset: ResumeDataset, batch_limit: usize) -> Self {
        Self {
            analyst,
            dataset,
            batch_limit,
        }
    }

    pub fn dataset(&self) -> &ResumeDataset {
        &self.dataset
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    /// Screen the preloaded dataset, or an inline CSV payload when one is
    /// supplied. `limit` overrides the configured cutoff for this run only.
    pub async fn run(
        &self,
        limit: Option<usize>,
        inline_csv: Option<String>,
    ) -> Result<ScreeningRun, DatasetError> {
        let limit = limit.unwrap_or(self.batch_limit);

        let (dataset, source) = match inline_csv {
            Some(csv) => {
                let reader = Cursor::new(csv.into_bytes());
                (
                    InlineOrPreloaded::Inline(ResumeDataset::from_reader(reader)?),
                    ResumeSource::Inline,
                )
            }
            None => (InlineOrPreloaded::Preloaded(&self.dataset), ResumeSource::Preloaded),
        };

        let records = dataset.records();
        let submitted = records.len().min(limit);
        let summary = screen_batch(self.analyst.as_ref(), records, limit).await;

        Ok(ScreeningRun {
            source,
            submitted,
            summary,
        })
    }
}

enum InlineOrPreloaded<'a> {
    Inline(ResumeDataset),
    Preloaded(&'a ResumeDataset),
}

impl InlineOrPreloaded<'_> {
    fn records(&self) -> &[super::dataset::ResumeRecord] {
        match self {
            InlineOrPreloaded::Inline(dataset) => dataset.records(),
            InlineOrPreloaded::Preloaded(dataset) => dataset.records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::analyst::{AnalysisError, ResumeAnalysis};
    use async_trait::async_trait;
    use std::io::Cursor;

    struct PassAnalyst;

    #[async_trait]
    impl ResumeAnalyst for PassAnalyst {
        async fn analyze(&self, _resume_text: &str) -> Result<ResumeAnalysis, AnalysisError> {
            Ok(ResumeAnalysis {
                verdict: "Overall: pass".to_string(),
                total_tokens: 3,
            })
        }
    }

    fn preloaded_service() -> ScreeningService<PassAnalyst> {
        let csv = "ID,Resume\n1,teacher in Leeds\n2,teacher in York\n3,teacher in Bath\n";
        let dataset = ResumeDataset::from_reader(Cursor::new(csv)).expect("dataset parses");
        ScreeningService::new(Arc::new(PassAnalyst), dataset, 2)
    }

    #[tokio::test]
    async fn run_defaults_to_the_configured_cutoff() {
        let service = preloaded_service();

        let run = service.run(None, None).await.expect("run succeeds");

        assert_eq!(run.source, ResumeSource::Preloaded);
        assert_eq!(run.submitted, 2);
        assert_eq!(run.summary.outcomes.len(), 2);
    }

    #[tokio::test]
    async fn limit_override_applies_per_run() {
        let service = preloaded_service();

        let run = service.run(Some(3), None).await.expect("run succeeds");

        assert_eq!(run.submitted, 3);
        assert_eq!(run.summary.total_tokens, 9);
    }

    #[tokio::test]
    async fn inline_csv_replaces_the_preloaded_dataset() {
        let service = preloaded_service();
        let inline = "ID,Resume\n42,inline candidate\n".to_string();

        let run = service
            .run(Some(10), Some(inline))
            .await
            .expect("run succeeds");

        assert_eq!(run.source, ResumeSource::Inline);
        assert_eq!(run.summary.outcomes.len(), 1);
        assert_eq!(run.summary.outcomes[0].id, 42);
    }

    #[tokio::test]
    async fn malformed_inline_csv_is_rejected_before_dispatch() {
        let service = preloaded_service();
        let inline = "ID,Resume\nnot-a-number,text\n".to_string();

        let error = service
            .run(None, Some(inline))
            .await
            .expect_err("inline csv must parse");

        assert!(matches!(error, DatasetError::Csv(_)));
    }
}

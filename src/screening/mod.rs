//! Resume screening: dataset ingestion, rubric prompting, concurrent LLM
//! dispatch, and the HTTP surface that exposes batch runs.
//!
//! The dispatcher in [`batch`] is the heart of the module: it fans one
//! analysis call out per resume, joins on all of them, and keeps outcomes
//! index-aligned with the submitted records no matter which call finishes
//! first.

pub mod analyst;
pub mod batch;
pub mod dataset;
pub mod prompt;
pub mod router;
pub mod service;

pub use analyst::{AnalysisError, OpenAiAnalyst, ResumeAnalysis, ResumeAnalyst};
pub use batch::{screen_batch, AnalysisOutcome, BatchSummary, FAILURE_PLACEHOLDER};
pub use dataset::{DatasetError, ResumeDataset, ResumeRecord};
pub use router::screening_router;
pub use service::{ResumeSource, ScreeningRun, ScreeningService};

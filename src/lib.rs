//! Recruit Ease: concurrent LLM eligibility screening for candidate resumes.
//!
//! The crate loads a tabular resume dataset, dispatches each resume to a
//! hosted model for rubric evaluation (location, qualification, experience),
//! and aggregates the verdicts plus token usage for the HTTP and CLI surfaces.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analyst::ResumeAnalyst;
use super::batch::AnalysisOutcome;
use super::dataset::DatasetError;
use super::service::{ResumeSource, ScreeningService};

/// Router builder exposing the batch screening endpoint.
pub fn screening_router<A>(service: Arc<ScreeningService<A>>) -> Router
where
    A: ResumeAnalyst + Send + Sync + 'static,
{
    Router::new()
        .route("/api/v1/screening/run", post(run_handler::<A>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScreeningRunRequest {
    /// Per-run override for the configured batch cutoff.
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Inline CSV export screened instead of the preloaded dataset.
    #[serde(default)]
    pub(crate) resume_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScreeningRunResponse {
    pub(crate) started_at: DateTime<Local>,
    pub(crate) completed_at: DateTime<Local>,
    pub(crate) elapsed_seconds: f64,
    pub(crate) data_source: ResumeSource,
    pub(crate) resumes_submitted: usize,
    pub(crate) total_tokens: u64,
    pub(crate) outcomes: Vec<AnalysisOutcome>,
}

pub(crate) async fn run_handler<A>(
    State(service): State<Arc<ScreeningService<A>>>,
    axum::Json(request): axum::Json<ScreeningRunRequest>,
) -> Response
where
    A: ResumeAnalyst + Send + Sync + 'static,
{
    let started_at = Local::now();

    match service.run(request.limit, request.resume_csv).await {
        Ok(run) => {
            let completed_at = Local::now();
            let response = ScreeningRunResponse {
                started_at,
                completed_at,
                elapsed_seconds: run.summary.elapsed.as_secs_f64(),
                data_source: run.source,
                resumes_submitted: run.submitted,
                total_tokens: run.summary.total_tokens,
                outcomes: run.summary.outcomes,
            };
            (StatusCode::OK, axum::Json(response)).into_response()
        }
        Err(error @ DatasetError::Csv(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::analyst::{AnalysisError, ResumeAnalysis};
    use crate::screening::dataset::ResumeDataset;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use std::io::Cursor;

    struct ScriptedAnalyst;

    #[async_trait]
    impl ResumeAnalyst for ScriptedAnalyst {
        async fn analyze(&self, resume_text: &str) -> Result<ResumeAnalysis, AnalysisError> {
            if resume_text.contains("broken") {
                return Err(AnalysisError::EmptyResponse);
            }
            Ok(ResumeAnalysis {
                verdict: "Name: X\nOverall: pass".to_string(),
                total_tokens: 5,
            })
        }
    }

    fn service() -> Arc<ScreeningService<ScriptedAnalyst>> {
        let csv = "ID,Resume\n1,teacher one\n2,a broken resume\n3,teacher three\n";
        let dataset = ResumeDataset::from_reader(Cursor::new(csv)).expect("dataset parses");
        Arc::new(ScreeningService::new(Arc::new(ScriptedAnalyst), dataset, 21))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn run_endpoint_reports_outcomes_and_totals() {
        let request = ScreeningRunRequest::default();

        let response = run_handler(State(service()), axum::Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data_source"], "preloaded");
        assert_eq!(body["resumes_submitted"], 3);
        // Two passing calls at 5 tokens each; the failed call costs zero.
        assert_eq!(body["total_tokens"], 10);

        let outcomes = body["outcomes"].as_array().expect("outcomes array");
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1]["lines"][0], "Error in analysis.");
        assert_eq!(outcomes[2]["id"], 3);
    }

    #[tokio::test]
    async fn run_endpoint_accepts_inline_csv_and_limit() {
        let request = ScreeningRunRequest {
            limit: Some(1),
            resume_csv: Some("ID,Resume\n7,inline teacher\n8,another inline\n".to_string()),
        };

        let response = run_handler(State(service()), axum::Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data_source"], "inline");
        assert_eq!(body["resumes_submitted"], 1);
        assert_eq!(body["outcomes"][0]["id"], 7);
    }

    #[tokio::test]
    async fn run_endpoint_rejects_malformed_inline_csv() {
        let request = ScreeningRunRequest {
            limit: None,
            resume_csv: Some("ID,Resume\nbad-id,text\n".to_string()),
        };

        let response = run_handler(State(service()), axum::Json(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error string")
            .contains("malformed resume CSV"));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::{rubric_prompt, ANALYSIS_INSTRUCTION};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Free-text verdict plus the token cost reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAnalysis {
    pub verdict: String,
    pub total_tokens: u32,
}

/// Seam between the dispatcher and the hosted model, so batches can be
/// exercised against deterministic fakes.
#[async_trait]
pub trait ResumeAnalyst: Send + Sync {
    async fn analyze(&self, resume_text: &str) -> Result<ResumeAnalysis, AnalysisError>;
}

/// Error enumeration for a single analysis call. The dispatcher collapses all
/// variants into the placeholder outcome; nothing here crosses the batch
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned no completion choices")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completions client used for every live analysis call.
#[derive(Clone)]
pub struct OpenAiAnalyst {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiAnalyst {
    pub fn new(api_key: String, model: String) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ResumeAnalyst for OpenAiAnalyst {
    async fn analyze(&self, resume_text: &str) -> Result<ResumeAnalysis, AnalysisError> {
        let system_prompt = rubric_prompt(resume_text);
        let request_body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: ANALYSIS_INSTRUCTION,
                },
            ],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;
        let total_tokens = completion
            .usage
            .as_ref()
            .map(|usage| usage.total_tokens)
            .unwrap_or(0);

        let verdict = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        debug!(total_tokens, "analysis call succeeded");

        Ok(ResumeAnalysis {
            verdict,
            total_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_parses_verdict_and_usage() {
        let raw = r#"{
            "choices": [{"message": {"content": "**Overall**: pass\n"}}],
            "usage": {"prompt_tokens": 700, "completion_tokens": 42, "total_tokens": 742}
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).expect("response parses");
        assert_eq!(parsed.usage.as_ref().map(|u| u.total_tokens), Some(742));
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("**Overall**: pass\n")
        );
    }

    #[test]
    fn chat_response_tolerates_missing_usage() {
        let raw = r#"{"choices": [{"message": {"content": "fail"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("response parses");
        assert!(parsed.usage.is_none());
    }

    #[test]
    fn api_error_body_extracts_message() {
        let raw = r#"{"error": {"message": "insufficient_quota", "type": "billing"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(raw).expect("error body parses");
        assert_eq!(parsed.error.message, "insufficient_quota");
    }
}

// Google Gemini adapter
// API Reference: https://ai.google.dev/api/generate-content
//
// Auth is the `x-goog-api-key` header; the key must never appear in a URL or
// an error message. Roles are "user" / "model", and the system prompt travels
// as a top-level `system_instruction`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LlmSettings, DEFAULT_GEMINI_BASE_URL};
use crate::llm::provider::LLMAdapter;
use crate::types::{
    AppError, AppResult, GenerationError, LLMMessage, LLMRequest, LLMResponse, TokenUsage,
};

pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    request_timeout: Duration,
}

// Request types for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "system_instruction")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

// Response types
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl GeminiError {
    fn is_invalid_key(&self) -> bool {
        self.details
            .iter()
            .any(|d| d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID"))
            || self.message.contains("API key not valid")
    }
}

impl GoogleAdapter {
    /// Create an adapter against the public Gemini endpoint with default timeouts
    pub fn new(api_key: &str) -> AppResult<Self> {
        Self::with_settings(api_key, &LlmSettings::default())
    }

    pub fn with_settings(api_key: &str, settings: &LlmSettings) -> AppResult<Self> {
        let request_timeout = Duration::from_secs(settings.request_timeout_secs);
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| AppError::HttpClient(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = if settings.base_url.is_empty() {
            DEFAULT_GEMINI_BASE_URL.to_string()
        } else {
            settings.base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url,
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn convert_message(msg: &LLMMessage) -> GeminiContent {
        let role = match msg.role.as_str() {
            "assistant" | "model" => "model",
            _ => "user",
        };
        GeminiContent {
            role: Some(role.to_string()),
            parts: vec![GeminiPart {
                text: Some(msg.content.clone()),
            }],
        }
    }

    fn build_request(request: &LLMRequest) -> GeminiRequest {
        let generation_config = if request.max_tokens.is_some() || request.temperature.is_some() {
            Some(GeminiGenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: request.messages.iter().map(Self::convert_message).collect(),
            system_instruction: request.system_instruction.as_ref().map(|s| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: Some(s.clone()) }],
            }),
            generation_config,
        }
    }

    fn classify_status(status: StatusCode, body: &str) -> GenerationError {
        let parsed = serde_json::from_str::<GeminiErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|r| r.error.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => GenerationError::Quota(message),
            StatusCode::BAD_REQUEST
                if parsed.as_ref().is_some_and(|r| r.error.is_invalid_key()) =>
            {
                GenerationError::Auth(message)
            }
            _ if parsed
                .as_ref()
                .and_then(|r| r.error.status.as_deref())
                == Some("RESOURCE_EXHAUSTED") =>
            {
                GenerationError::Quota(message)
            }
            _ => GenerationError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.request_timeout)
        } else {
            GenerationError::Network(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl LLMAdapter for GoogleAdapter {
    async fn create_chat_completion(
        &self,
        request: &LLMRequest,
    ) -> Result<LLMResponse, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = Self::build_request(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &text));
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| {
                GenerationError::MalformedResponse("no candidates returned".to_string())
            })?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let usage = parsed
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        debug!(
            model = %request.model,
            content_len = content.len(),
            "Gemini completion received"
        );

        Ok(LLMResponse {
            content,
            finish_reason: candidate.finish_reason.unwrap_or_else(|| "STOP".to_string()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn adapter_for(server: &mockito::ServerGuard) -> GoogleAdapter {
        let settings = LlmSettings {
            base_url: server.url(),
            ..LlmSettings::default()
        };
        GoogleAdapter::with_settings("test-key", &settings).unwrap()
    }

    const PATH: &str = "/models/gemini-2.0-flash:generateContent";

    #[test]
    fn test_default_base_url() {
        let adapter = GoogleAdapter::new("test-key").unwrap();
        assert_eq!(adapter.base_url(), DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_request_body_shape() {
        let mut request = LLMRequest::prompt("gemini-2.0-flash", "Hello");
        request.messages.push(LLMMessage::assistant("Hi"));
        request.system_instruction = Some("Be brief".to_string());
        request.temperature = Some(0.5);

        let body = serde_json::to_value(GoogleAdapter::build_request(&request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_generation_config_omitted_when_unset() {
        let request = LLMRequest::prompt("gemini-2.0-flash", "Hello");
        let body = serde_json::to_value(GoogleAdapter::build_request(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("system_instruction").is_none());
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"Generate hypotheses"}]}]}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{"text": "1. Hypothesis 1\n"}, {"text": "2. Hypothesis 2"}]
                        },
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {
                        "promptTokenCount": 5,
                        "candidatesTokenCount": 7,
                        "totalTokenCount": 12
                    }
                }"#,
            )
            .create_async()
            .await;

        let adapter = adapter_for(&server);
        let response = adapter
            .create_chat_completion(&LLMRequest::prompt(
                "gemini-2.0-flash",
                "Generate hypotheses",
            ))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "1. Hypothesis 1\n2. Hypothesis 2");
        assert_eq!(response.finish_reason, "STOP");
        assert_eq!(response.usage.total_tokens, 12);
        assert_eq!(response.usage.completion_tokens, 7);
    }

    async fn error_for(status: usize, body: &str) -> GenerationError {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        adapter_for(&server)
            .create_chat_completion(&LLMRequest::prompt("gemini-2.0-flash", "x"))
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth() {
        let err = error_for(401, r#"{"error":{"code":401,"message":"unauthenticated"}}"#).await;
        assert_eq!(err, GenerationError::Auth("unauthenticated".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_key_maps_to_auth() {
        let body = r#"{"error":{
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [{"reason": "API_KEY_INVALID"}]
        }}"#;
        let err = error_for(400, body).await;
        assert!(matches!(err, GenerationError::Auth(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_quota() {
        let body = r#"{"error":{"code":429,"message":"slow down","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = error_for(429, body).await;
        assert_eq!(err, GenerationError::Quota("slow down".to_string()));
    }

    #[tokio::test]
    async fn test_other_status_maps_to_api_error() {
        let err = error_for(500, "upstream exploded").await;
        assert_eq!(
            err,
            GenerationError::Api {
                status: 500,
                message: "upstream exploded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_payloads() {
        for body in ["not json", r#"{"candidates": []}"#] {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("POST", PATH)
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;

            let err = adapter_for(&server)
                .create_chat_completion(&LLMRequest::prompt("gemini-2.0-flash", "x"))
                .await
                .unwrap_err();
            assert!(matches!(err, GenerationError::MalformedResponse(_)), "{:?}", err);
        }
    }

    #[tokio::test]
    async fn test_candidate_without_text_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)
            .create_async()
            .await;

        let response = adapter_for(&server)
            .create_chat_completion(&LLMRequest::prompt("gemini-2.0-flash", "x"))
            .await
            .unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.finish_reason, "SAFETY");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let settings = LlmSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 2,
            ..LlmSettings::default()
        };
        let adapter = GoogleAdapter::with_settings("test-key", &settings).unwrap();
        let err = adapter
            .create_chat_completion(&LLMRequest::prompt("gemini-2.0-flash", "x"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, GenerationError::Network(_) | GenerationError::Timeout(_)),
            "{:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_api_key() {
        let settings = LlmSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 2,
            ..LlmSettings::default()
        };
        let adapter = GoogleAdapter::with_settings("SECRET-KEY-123", &settings).unwrap();
        let err = adapter
            .create_chat_completion(&LLMRequest::prompt("gemini-2.0-flash", "x"))
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("SECRET-KEY-123"), "{}", err);
        assert!(!format!("{:?}", err).contains("SECRET-KEY-123"), "{:?}", err);
    }

    #[tokio::test]
    async fn test_api_key_is_not_sent_in_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Missing)
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#)
            .create_async()
            .await;

        let response = adapter_for(&server)
            .create_chat_completion(&LLMRequest::prompt("gemini-2.0-flash", "x"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "ok");
    }
}

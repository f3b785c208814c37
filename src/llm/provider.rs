use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ResearchConfig;
use crate::llm::google::GoogleAdapter;
use crate::types::{AppResult, GenerationError, LLMRequest, LLMResponse};

/// A hosted text-generation backend.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: &LLMRequest,
    ) -> Result<LLMResponse, GenerationError>;
}

/// Prompt-in, text-out facade over an [`LLMAdapter`].
///
/// Applies the configured generation settings to every call and bounds each
/// call with a timeout, so a stalled backend cannot block a pipeline forever.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    timeout: Duration,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl LLM {
    /// Gemini-backed client for an already validated credential
    pub fn gemini(api_key: &str, config: &ResearchConfig) -> AppResult<Self> {
        let adapter = GoogleAdapter::with_settings(api_key, &config.llm)?;
        Ok(Self::with_adapter(Arc::new(adapter), config))
    }

    pub fn with_adapter(adapter: Arc<dyn LLMAdapter>, config: &ResearchConfig) -> Self {
        Self {
            adapter,
            timeout: config.request_timeout(),
            max_tokens: config.llm.max_output_tokens,
            temperature: config.llm.temperature,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn create_chat_completion(
        &self,
        request: &LLMRequest,
    ) -> Result<LLMResponse, GenerationError> {
        let call = self.adapter.create_chat_completion(request);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }

    /// Send a single prompt to `model_name` and return the generated text.
    pub async fn generate(
        &self,
        prompt: &str,
        model_name: &str,
    ) -> Result<String, GenerationError> {
        let mut request = LLMRequest::prompt(model_name, prompt);
        request.max_tokens = self.max_tokens;
        request.temperature = self.temperature;

        let response = self.create_chat_completion(&request).await?;
        debug!(
            model = %model_name,
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Generated content"
        );
        Ok(response.content)
    }
}

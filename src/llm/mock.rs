// Test doubles for the generation boundary

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::provider::LLMAdapter;
use crate::types::{GenerationError, LLMRequest, LLMResponse, TokenUsage};

/// Replays queued results in order and records every request it receives.
///
/// Once the queue is exhausted each further call returns an empty reply.
pub(crate) struct ScriptedAdapter {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedAdapter {
    pub(crate) fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub(crate) fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| r.messages.into_iter().next().map(|m| m.content))
            .collect()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn create_chat_completion(
        &self,
        request: &LLMRequest,
    ) -> Result<LLMResponse, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()));

        reply.map(|content| LLMResponse {
            content,
            finish_reason: "STOP".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

/// Never answers within any reasonable timeout.
pub(crate) struct HangingAdapter;

#[async_trait]
impl LLMAdapter for HangingAdapter {
    async fn create_chat_completion(
        &self,
        _request: &LLMRequest,
    ) -> Result<LLMResponse, GenerationError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(GenerationError::Network("unreachable".to_string()))
    }
}

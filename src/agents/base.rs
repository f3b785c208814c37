// Shared plumbing for the role agents

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ResearchConfig;
use crate::extract::{render_numbered_list, ExtractionMode};
use crate::llm::{LLMAdapter, LLM};
use crate::models::Hypothesis;
use crate::types::{AppError, AppResult, GenerationError};

/// Generation client, model and extraction settings one role agent runs with.
#[derive(Clone)]
pub(crate) struct AgentCore {
    agent: &'static str,
    llm: LLM,
    model_name: String,
    extraction: ExtractionMode,
}

impl AgentCore {
    /// Build a Gemini-backed core. Fails before any network activity when the
    /// credential is missing.
    pub(crate) fn from_config(agent: &'static str, config: &ResearchConfig) -> AppResult<Self> {
        let api_key = config
            .credential()
            .ok_or(AppError::MissingCredential { agent })?;
        let llm = LLM::gemini(api_key, config)?;
        Ok(Self::build(agent, llm, config))
    }

    pub(crate) fn with_adapter(
        agent: &'static str,
        config: &ResearchConfig,
        adapter: Arc<dyn LLMAdapter>,
    ) -> AppResult<Self> {
        if config.credential().is_none() {
            return Err(AppError::MissingCredential { agent });
        }
        Ok(Self::build(agent, LLM::with_adapter(adapter, config), config))
    }

    fn build(agent: &'static str, llm: LLM, config: &ResearchConfig) -> Self {
        info!(agent, model = %config.model_name, "Agent initialized");
        Self {
            agent,
            llm,
            model_name: config.model_name.clone(),
            extraction: config.extraction,
        }
    }

    pub(crate) fn model_name(&self) -> &str {
        &self.model_name
    }

    pub(crate) fn extraction(&self) -> ExtractionMode {
        self.extraction
    }

    pub(crate) async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(agent = self.agent, prompt_len = prompt.len(), "Sending prompt");
        self.llm.generate(prompt, &self.model_name).await
    }
}

/// Hypotheses as they appear inside a prompt.
pub(crate) fn format_hypotheses(hypotheses: &[Hypothesis]) -> String {
    if hypotheses.is_empty() {
        "(none)".to_string()
    } else {
        render_numbered_list(hypotheses)
    }
}

//! Theorist Agent
//!
//! Proposes testable hypotheses for a research problem.

use std::sync::Arc;

use tracing::{error, info};

use crate::agents::base::AgentCore;
use crate::config::ResearchConfig;
use crate::extract::extract_hypotheses_with;
use crate::llm::LLMAdapter;
use crate::models::Hypothesis;
use crate::types::AppResult;

#[derive(Clone)]
pub struct TheoristAgent {
    core: AgentCore,
}

impl TheoristAgent {
    pub fn new(config: &ResearchConfig) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::from_config("TheoristAgent", config)?,
        })
    }

    pub fn with_adapter(config: &ResearchConfig, adapter: Arc<dyn LLMAdapter>) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::with_adapter("TheoristAgent", config, adapter)?,
        })
    }

    pub fn model_name(&self) -> &str {
        self.core.model_name()
    }

    /// Generate hypotheses for `research_problem`.
    ///
    /// Returns an empty list when generation fails or the reply holds no list items.
    pub async fn generate_hypotheses(&self, research_problem: &str) -> Vec<Hypothesis> {
        let prompt = Self::create_prompt(research_problem);

        match self.core.generate(&prompt).await {
            Ok(response) => {
                let hypotheses = extract_hypotheses_with(&response, self.core.extraction());
                info!(count = hypotheses.len(), "Generated hypotheses");
                hypotheses
            }
            Err(e) => {
                error!(error = %e, "Error generating hypotheses");
                Vec::new()
            }
        }
    }

    fn create_prompt(research_problem: &str) -> String {
        format!(
            "You are a brilliant scientist. \
             Generate a few testable hypotheses for the following research problem:\n\
             {research_problem}\n\
             Provide the hypotheses as a numbered list."
        )
    }
}

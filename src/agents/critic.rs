//! Critic Agent
//!
//! Refines hypotheses in light of the experiment narrative.

use std::sync::Arc;

use tracing::{error, info};

use crate::agents::base::{format_hypotheses, AgentCore};
use crate::config::ResearchConfig;
use crate::extract::extract_hypotheses_with;
use crate::llm::LLMAdapter;
use crate::models::Hypothesis;
use crate::types::AppResult;

#[derive(Clone)]
pub struct CriticAgent {
    core: AgentCore,
}

impl CriticAgent {
    pub fn new(config: &ResearchConfig) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::from_config("CriticAgent", config)?,
        })
    }

    pub fn with_adapter(config: &ResearchConfig, adapter: Arc<dyn LLMAdapter>) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::with_adapter("CriticAgent", config, adapter)?,
        })
    }

    /// Refine `hypotheses` given the experiment results.
    ///
    /// Returns an empty list when generation fails or the reply holds no list items.
    pub async fn refine_hypotheses(
        &self,
        hypotheses: &[Hypothesis],
        experiment_results: &str,
    ) -> Vec<Hypothesis> {
        let prompt = Self::create_prompt(hypotheses, experiment_results);

        match self.core.generate(&prompt).await {
            Ok(response) => {
                let refined = extract_hypotheses_with(&response, self.core.extraction());
                info!(count = refined.len(), "Refined hypotheses");
                refined
            }
            Err(e) => {
                error!(error = %e, "Error refining hypotheses");
                Vec::new()
            }
        }
    }

    fn create_prompt(hypotheses: &[Hypothesis], experiment_results: &str) -> String {
        format!(
            "You are an expert scientific critic. Based on the following hypotheses and \
             experiment results,\nrefine the hypotheses to be more accurate and testable.\n\
             Hypotheses:\n{hypotheses}\n\
             Experiment Results: {experiment_results}\n\
             Provide the refined hypotheses as a numbered list.",
            hypotheses = format_hypotheses(hypotheses),
            experiment_results = experiment_results,
        )
    }
}

//! Data Scientist Agent
//!
//! Weighs hypotheses against existing knowledge and data.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::agents::base::{format_hypotheses, AgentCore};
use crate::config::ResearchConfig;
use crate::llm::LLMAdapter;
use crate::models::Hypothesis;
use crate::types::AppResult;

#[derive(Clone)]
pub struct DataScientistAgent {
    core: AgentCore,
}

impl DataScientistAgent {
    pub fn new(config: &ResearchConfig) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::from_config("DataScientistAgent", config)?,
        })
    }

    pub fn with_adapter(config: &ResearchConfig, adapter: Arc<dyn LLMAdapter>) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::with_adapter("DataScientistAgent", config, adapter)?,
        })
    }

    /// Analyze the hypotheses in relation to the research problem.
    ///
    /// Returns the raw generated analysis, or an empty string on failure.
    pub async fn analyze_data(&self, research_problem: &str, hypotheses: &[Hypothesis]) -> String {
        let prompt = Self::create_prompt(research_problem, hypotheses);

        match self.core.generate(&prompt).await {
            Ok(response) => {
                info!(analysis_len = response.len(), "Data analysis complete");
                debug!(analysis = %response, "Data analysis results");
                response
            }
            Err(e) => {
                error!(error = %e, "Error analyzing data");
                String::new()
            }
        }
    }

    fn create_prompt(research_problem: &str, hypotheses: &[Hypothesis]) -> String {
        format!(
            "You are an expert data scientist. \
             Analyze the following research problem and hypotheses,\n\
             and provide insights based on existing knowledge and data.\n\
             Research Problem: {research_problem}\n\
             Hypotheses:\n{hypotheses}\n\
             Provide a detailed analysis of the hypotheses in relation to the research problem.",
            research_problem = research_problem,
            hypotheses = format_hypotheses(hypotheses),
        )
    }
}

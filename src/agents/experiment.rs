//! Experiment Agent
//!
//! Designs a simulation for the hypotheses and narrates its setup and results.
//! Nothing is executed locally; the narrative is whatever the model produces.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::agents::base::{format_hypotheses, AgentCore};
use crate::config::ResearchConfig;
use crate::llm::LLMAdapter;
use crate::models::Hypothesis;
use crate::types::AppResult;

#[derive(Clone)]
pub struct ExperimentAgent {
    core: AgentCore,
}

impl ExperimentAgent {
    pub fn new(config: &ResearchConfig) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::from_config("ExperimentAgent", config)?,
        })
    }

    pub fn with_adapter(config: &ResearchConfig, adapter: Arc<dyn LLMAdapter>) -> AppResult<Self> {
        Ok(Self {
            core: AgentCore::with_adapter("ExperimentAgent", config, adapter)?,
        })
    }

    /// Returns the generated experiment narrative, or an empty string on failure.
    pub async fn run_simulation(
        &self,
        hypotheses: &[Hypothesis],
        data_analysis_results: &str,
    ) -> String {
        let prompt = Self::create_prompt(hypotheses, data_analysis_results);

        match self.core.generate(&prompt).await {
            Ok(response) => {
                info!(narrative_len = response.len(), "Simulation narrative generated");
                debug!(results = %response, "Simulation results");
                response
            }
            Err(e) => {
                error!(error = %e, "Error running simulation");
                String::new()
            }
        }
    }

    fn create_prompt(hypotheses: &[Hypothesis], data_analysis_results: &str) -> String {
        format!(
            "You are an expert in designing and running scientific simulations.\n\
             Based on the following hypotheses and data analysis results, \
             design and run a simulation to test the hypotheses.\n\
             Hypotheses:\n{hypotheses}\n\
             Data Analysis Results: {data_analysis_results}\n\
             Provide a detailed description of the simulation setup, parameters, \
             and the expected results.\n\
             Also, provide the actual simulation results.",
            hypotheses = format_hypotheses(hypotheses),
            data_analysis_results = data_analysis_results,
        )
    }
}

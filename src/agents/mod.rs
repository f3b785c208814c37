//! Agent System
//!
//! This module contains the role agents that drive a research iteration:
//!
//! - **Theorist Agent**: Proposes testable hypotheses for a research problem
//! - **Data Scientist Agent**: Analyzes the hypotheses against existing knowledge
//! - **Experiment Agent**: Designs a simulation and narrates its results
//! - **Critic Agent**: Refines the hypotheses based on those results
//!
//! ## Pipeline Overview
//!
//! ```text
//! Research Problem
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Theorist   │  → Hypotheses (list)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │    Data     │  → Analysis (text)
//! │  Scientist  │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Experiment  │  → Experiment narrative (text)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Critic    │  → Refined hypotheses (list)
//! └─────────────┘
//! ```
//!
//! Stages run one after another, exactly once each. A failed stage yields an
//! empty value and the next stage still runs with it.

mod base;
pub mod theorist;
pub mod data_scientist;
pub mod experiment;
pub mod critic;

// Re-export main components
pub use theorist::TheoristAgent;
pub use data_scientist::DataScientistAgent;
pub use experiment::ExperimentAgent;
pub use critic::CriticAgent;

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use crate::config::ResearchConfig;
use crate::llm::LLMAdapter;
use crate::models::PipelineState;
use crate::types::AppResult;

/// The four role agents wired into one linear research iteration.
#[derive(Clone)]
pub struct ResearchPipeline {
    theorist: TheoristAgent,
    data_scientist: DataScientistAgent,
    experiment: ExperimentAgent,
    critic: CriticAgent,
}

impl ResearchPipeline {
    pub fn new(
        theorist: TheoristAgent,
        data_scientist: DataScientistAgent,
        experiment: ExperimentAgent,
        critic: CriticAgent,
    ) -> Self {
        Self {
            theorist,
            data_scientist,
            experiment,
            critic,
        }
    }

    /// Build every agent against the Gemini API.
    pub fn from_config(config: &ResearchConfig) -> AppResult<Self> {
        Ok(Self::new(
            TheoristAgent::new(config)?,
            DataScientistAgent::new(config)?,
            ExperimentAgent::new(config)?,
            CriticAgent::new(config)?,
        ))
    }

    /// Build every agent on top of one shared generation backend.
    pub fn with_adapter(config: &ResearchConfig, adapter: Arc<dyn LLMAdapter>) -> AppResult<Self> {
        Ok(Self::new(
            TheoristAgent::with_adapter(config, adapter.clone())?,
            DataScientistAgent::with_adapter(config, adapter.clone())?,
            ExperimentAgent::with_adapter(config, adapter.clone())?,
            CriticAgent::with_adapter(config, adapter)?,
        ))
    }

    /// Execute one full research iteration for `research_problem`.
    pub async fn run(&self, research_problem: &str) -> PipelineState {
        let mut state = PipelineState::new(research_problem);
        let span = info_span!("research_pipeline", run_id = %state.run_id);

        async {
            info!(problem = %state.research_problem, "Starting research pipeline");

            let hypotheses = self.theorist.generate_hypotheses(&state.research_problem).await;
            state.record_hypotheses(hypotheses);
            info!(stage = %state.stage, count = state.hypotheses.len(), "Hypotheses generated");

            let analysis = self
                .data_scientist
                .analyze_data(&state.research_problem, &state.hypotheses)
                .await;
            state.record_analysis(analysis);
            info!(
                stage = %state.stage,
                analysis_len = state.analysis.len(),
                "Data analysis complete"
            );

            let narrative = self
                .experiment
                .run_simulation(&state.hypotheses, &state.analysis)
                .await;
            state.record_experiment(narrative);
            info!(
                stage = %state.stage,
                narrative_len = state.experiment_narrative.len(),
                "Experiment complete"
            );

            let refined = self
                .critic
                .refine_hypotheses(&state.hypotheses, &state.experiment_narrative)
                .await;
            state.record_refined_hypotheses(refined);
            info!(
                stage = %state.stage,
                count = state.refined_hypotheses.len(),
                "Hypotheses refined"
            );

            state.finish();
            info!("Research pipeline completed one iteration");
        }
        .instrument(span)
        .await;

        state
    }
}

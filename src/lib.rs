// Ares - autonomous research and experimentation pipeline

pub mod config;
pub mod types;
pub mod models;
pub mod extract;
pub mod llm;
pub mod agents;
pub mod utils;

// Re-exports for convenience
pub use agents::ResearchPipeline;
pub use config::ResearchConfig;
pub use extract::{extract_hypotheses, extract_hypotheses_with, ExtractionMode};
pub use models::{Hypothesis, PipelineStage, PipelineState};
pub use types::{AppError, AppResult, GenerationError};

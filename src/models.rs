use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ExtractionError;

// Core research models

/// A single testable claim extracted from generated text.
///
/// Always non-empty; duplicates are allowed and order is kept by whoever holds the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hypothesis(String);

impl Hypothesis {
    pub fn new(text: impl Into<String>) -> Result<Self, ExtractionError> {
        Self::at_line(text, 0)
    }

    /// Build a hypothesis from the item text found on `line` (1-based, 0 when unknown).
    pub(crate) fn at_line(text: impl Into<String>, line: usize) -> Result<Self, ExtractionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyItem { line });
        }
        Ok(Self(text))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for Hypothesis {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Hypothesis {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Hypothesis {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hypothesis> for String {
    fn from(value: Hypothesis) -> Self {
        value.0
    }
}

impl PartialEq<str> for Hypothesis {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Hypothesis {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Position of a pipeline run in its fixed four-stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    Hypotheses,
    Analysis,
    ExperimentNarrative,
    RefinedHypotheses,
    Done,
}

impl PipelineStage {
    /// The state that follows this one. `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            PipelineStage::Start => PipelineStage::Hypotheses,
            PipelineStage::Hypotheses => PipelineStage::Analysis,
            PipelineStage::Analysis => PipelineStage::ExperimentNarrative,
            PipelineStage::ExperimentNarrative => PipelineStage::RefinedHypotheses,
            PipelineStage::RefinedHypotheses => PipelineStage::Done,
            PipelineStage::Done => PipelineStage::Done,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Start => "start",
            PipelineStage::Hypotheses => "hypotheses",
            PipelineStage::Analysis => "analysis",
            PipelineStage::ExperimentNarrative => "experiment_narrative",
            PipelineStage::RefinedHypotheses => "refined_hypotheses",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything one pipeline run has produced so far.
///
/// Each stage writes its own field exactly once, in order, and never touches
/// the fields written before it. Failed stages leave an empty value behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub run_id: uuid::Uuid,
    pub research_problem: String,
    pub hypotheses: Vec<Hypothesis>,
    pub analysis: String,
    pub experiment_narrative: String,
    pub refined_hypotheses: Vec<Hypothesis>,
    pub stage: PipelineStage,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineState {
    pub fn new(research_problem: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            research_problem: research_problem.into(),
            hypotheses: Vec::new(),
            analysis: String::new(),
            experiment_narrative: String::new(),
            refined_hypotheses: Vec::new(),
            stage: PipelineStage::Start,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_hypotheses(&mut self, hypotheses: Vec<Hypothesis>) {
        self.expect_stage(PipelineStage::Start);
        self.hypotheses = hypotheses;
        self.stage = self.stage.next();
    }

    pub fn record_analysis(&mut self, analysis: String) {
        self.expect_stage(PipelineStage::Hypotheses);
        self.analysis = analysis;
        self.stage = self.stage.next();
    }

    pub fn record_experiment(&mut self, narrative: String) {
        self.expect_stage(PipelineStage::Analysis);
        self.experiment_narrative = narrative;
        self.stage = self.stage.next();
    }

    pub fn record_refined_hypotheses(&mut self, refined: Vec<Hypothesis>) {
        self.expect_stage(PipelineStage::ExperimentNarrative);
        self.refined_hypotheses = refined;
        self.stage = self.stage.next();
    }

    /// Close the run. Only valid once every stage has been recorded.
    pub fn finish(&mut self) {
        self.expect_stage(PipelineStage::RefinedHypotheses);
        self.stage = PipelineStage::Done;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_done(&self) -> bool {
        self.stage == PipelineStage::Done
    }

    fn expect_stage(&self, expected: PipelineStage) {
        debug_assert_eq!(
            self.stage, expected,
            "pipeline stage recorded out of order"
        );
    }
}

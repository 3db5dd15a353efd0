// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
pub mod progress;

pub use orchestrator::{
    PHASE_ANSWERS, PHASE_INDEX, PHASE_INPUT, PHASE_LOAD, PHASE_PROVIDERS, PHASE_QUESTIONS,
    PipelineOrchestrator,
};
pub use progress::{PipelineStats, ProgressTracker, step_bar};

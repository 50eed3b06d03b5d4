#![forbid(unsafe_code)]

pub mod aggregate;
pub mod band;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use error::{BpError, BpResult};
pub use model::{
    AudioFeatures, CriterionScores, DiagnosticReport, NormalizedTranscript, OverallResult,
    ScoredCriteria, Segment, Skill, SkillScore, SpeechAssessment, TaskContext,
};
pub use pipeline::AssessmentPipeline;

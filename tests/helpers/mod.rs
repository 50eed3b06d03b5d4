#![allow(dead_code)]

use bandpipe::model::{CriterionScores, Segment, Skill, SkillScore, TaskContext};
use bandpipe::pipeline::AssessmentPipeline;

/// Build a pipeline with the default (free diagnostic) configuration.
pub fn create_test_pipeline() -> AssessmentPipeline {
    AssessmentPipeline::new().expect("default pipeline should build")
}

/// Build contiguous-with-gaps segments from (start, end, text) triples.
pub fn create_segments(spans: &[(f64, f64, &str)]) -> Vec<Segment> {
    spans
        .iter()
        .map(|&(start, end, text)| Segment::new(start, end, text))
        .collect()
}

/// A transcript of `n` plain words.
pub fn monologue(n: usize) -> String {
    vec!["word"; n].join(" ")
}

/// Criterion scores with all four sub-criteria present.
pub fn create_full_criteria(tr: f64, cc: f64, lr: f64, gra: f64) -> CriterionScores {
    CriterionScores::new(Some(tr), Some(cc), Some(lr), Some(gra))
}

/// A task context that passes every cap check.
pub fn create_clean_context(word_count: usize) -> TaskContext {
    TaskContext {
        off_topic: false,
        relevance_percent: Some(95.0),
        word_count,
        min_word_count: 150,
    }
}

/// Skill scores for a two-skill diagnostic attempt.
pub fn create_partial_attempt(listening: f64, writing: f64) -> Vec<SkillScore> {
    vec![
        SkillScore::new(Skill::Listening, Some(listening)),
        SkillScore::new(Skill::Reading, None),
        SkillScore::new(Skill::Writing, Some(writing)),
        SkillScore::new(Skill::Speaking, None),
    ]
}

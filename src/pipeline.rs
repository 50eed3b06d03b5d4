//! Assessment pipeline facade.
//!
//! Wires the normalizer, feature extractor, band engine and aggregator
//! behind one engine owning a validated [`PipelineConfig`]. Every operation
//! is a pure, synchronous transformation over in-memory values; the engine
//! is safe to share across threads and invoke concurrently for independent
//! attempts.

use tracing::debug;

use crate::aggregate;
use crate::band;
use crate::config::PipelineConfig;
use crate::error::BpResult;
use crate::features::FeatureExtractor;
use crate::model::{
    CriterionScores, DiagnosticReport, NormalizedTranscript, OverallResult, ScoredCriteria,
    Segment, SkillScore, SpeechAssessment, TaskContext,
};
use crate::normalize::Normalizer;

pub struct AssessmentPipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    features: FeatureExtractor,
}

impl AssessmentPipeline {
    /// Build a pipeline with the default (free diagnostic) configuration.
    pub fn new() -> BpResult<Self> {
        Self::with_config(PipelineConfig::default())
    }

    /// Build a pipeline from an explicit configuration.
    ///
    /// Returns an error when the configuration fails validation or the
    /// filler lexicon does not compile.
    pub fn with_config(config: PipelineConfig) -> BpResult<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(config.normalize.clone())?;
        let features =
            FeatureExtractor::new(config.features.clone(), normalizer.fillers().clone());
        Ok(Self {
            config,
            normalizer,
            features,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clean a raw transcript without extracting features.
    #[must_use]
    pub fn normalize_transcript(&self, raw: &str) -> NormalizedTranscript {
        self.normalizer.normalize(raw)
    }

    /// Normalize a speech attempt and derive its fluency features. The
    /// result is what the criterion scoring collaborator consumes.
    #[must_use]
    pub fn process_speech(&self, raw: &str, segments: &[Segment]) -> SpeechAssessment {
        let transcript = self.normalizer.normalize(raw);
        let features = self.features.extract(&transcript.text, segments);
        debug!(
            word_count = transcript.word_count,
            segment_count = segments.len(),
            wpm = features.wpm,
            "speech attempt processed"
        );
        SpeechAssessment {
            transcript,
            features,
        }
    }

    /// Band raw per-criterion scores for one written or spoken task and
    /// apply the cap policy.
    #[must_use]
    pub fn score_task(&self, criteria: &CriterionScores, ctx: &TaskContext) -> ScoredCriteria {
        band::score_criteria(criteria, ctx, &self.config.scoring)
    }

    /// Map a listening raw score to its band.
    #[must_use]
    pub fn score_listening(&self, correct: u32) -> f64 {
        band::listening_band(correct, &self.config.scoring)
    }

    /// Combine per-skill bands into the overall result.
    #[must_use]
    pub fn finalize(&self, skills: &[SkillScore]) -> OverallResult {
        aggregate::aggregate(skills, &self.config.scoring)
    }

    /// Assemble the stamped report for the persistence/report collaborator.
    #[must_use]
    pub fn report(&self, skills: &[SkillScore]) -> DiagnosticReport {
        aggregate::build_report(skills, &self.config.scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::model::Skill;

    #[test]
    fn default_pipeline_builds() {
        AssessmentPipeline::new().expect("default pipeline should build");
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut config = PipelineConfig::default();
        config.scoring.off_topic_cap = 3.3;
        assert!(AssessmentPipeline::with_config(config).is_err());
    }

    #[test]
    fn process_speech_returns_transcript_and_features() {
        let pipeline = AssessmentPipeline::new().unwrap();
        let segments = vec![
            Segment::new(0.0, 2.0, "um I think"),
            Segment::new(3.0, 5.0, "the plan works"),
        ];
        let assessment =
            pipeline.process_speech("um I think I think the plan works.", &segments);
        assert_eq!(assessment.transcript.text, "Um I think the plan works.");
        assert_eq!(assessment.features.speech_duration, 5.0);
        assert_eq!(assessment.features.pause_count, 1);
    }

    #[test]
    fn pipeline_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<AssessmentPipeline>();
        assert_sync::<AssessmentPipeline>();
    }

    #[test]
    fn full_attempt_flows_to_an_overall_band() {
        let pipeline = AssessmentPipeline::new().unwrap();
        let listening = pipeline.score_listening(4);
        let writing = pipeline
            .score_task(
                &CriterionScores::new(Some(6.5), Some(6.0), Some(6.5), Some(6.0)),
                &TaskContext {
                    word_count: 260,
                    min_word_count: 250,
                    ..TaskContext::default()
                },
            )
            .overall
            .expect("criteria present");
        let result = pipeline.finalize(&[
            SkillScore::new(Skill::Listening, Some(listening)),
            SkillScore::new(Skill::Writing, Some(writing)),
        ]);
        // listening 6.5, writing mean 6.25 -> 6.5; overall mean 6.5.
        assert_eq!(result.overall, Some(6.5));
    }
}

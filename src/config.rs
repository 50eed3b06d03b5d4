//! Explicit configuration for every pipeline component.
//!
//! Thresholds, lexicons and scoring policy are passed into each component
//! call instead of living in module-level constants, keeping the pipeline
//! pure and independently testable.

use serde::{Deserialize, Serialize};

use crate::band::RoundingRule;
use crate::error::{BpError, BpResult};

/// Transcript normalizer knobs: filler lexicon and collapse bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Fillers matched with vowel/consonant elongation ("um" also matches
    /// "umm", "uum"; "hm" also matches "hmm", "hmmm").
    pub elongated_fillers: Vec<String>,
    /// Multi-word fillers matched verbatim.
    pub phrase_fillers: Vec<String>,
    /// Single-word fillers matched verbatim.
    pub plain_fillers: Vec<String>,
    /// Containment length ratio below which two adjacent sentences count as
    /// the same utterance re-recognized.
    pub near_dup_ratio: f64,
    /// Longest word group considered by the intra-sentence stutter collapse.
    pub max_stutter_group: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            elongated_fillers: vec![
                "um".to_owned(),
                "uh".to_owned(),
                "er".to_owned(),
                "ah".to_owned(),
                "hm".to_owned(),
            ],
            phrase_fillers: vec!["you know".to_owned(), "i mean".to_owned()],
            plain_fillers: vec!["like".to_owned()],
            near_dup_ratio: 1.5,
            max_stutter_group: 4,
        }
    }
}

/// Prosodic feature extraction thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Inter-segment gap above which a gap counts as a pause, in seconds.
    pub pause_threshold_sec: f64,
    /// Gap at or above which a pause counts as a long pause, in seconds.
    pub long_pause_threshold_sec: f64,
    /// Assumed speaking rate used to estimate duration when no segment
    /// timing is available, in words per second.
    pub fallback_words_per_sec: f64,
    /// Floor for the estimated duration, in seconds.
    pub min_fallback_duration_sec: f64,
    /// Average syllables per word used by the articulation-rate proxy.
    pub syllables_per_word: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            pause_threshold_sec: 0.2,
            long_pause_threshold_sec: 0.8,
            fallback_words_per_sec: 2.8,
            min_fallback_duration_sec: 1.0,
            syllables_per_word: 1.4,
        }
    }
}

/// Band scoring policy: rounding convention and cap levels.
///
/// The default reproduces the free diagnostic flow: banded rounding and a
/// 6.5 ceiling on every band. Set `diagnostic_ceiling` to `None` for the
/// uncapped flow (perfect listening then maps to 7.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub rounding: RoundingRule,
    /// Product-policy ceiling applied to the composite and to each
    /// sub-criterion. Not an IELTS rule.
    pub diagnostic_ceiling: Option<f64>,
    /// Composite cap when content is off-topic.
    pub off_topic_cap: f64,
    /// Relevance at or below this percentage counts as off-topic.
    pub min_relevance_percent: f64,
    /// Composite cap when the answer is under the required length.
    pub short_answer_cap: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            rounding: RoundingRule::Banded,
            diagnostic_ceiling: Some(6.5),
            off_topic_cap: 3.0,
            min_relevance_percent: 50.0,
            short_answer_cap: 5.0,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub normalize: NormalizeConfig,
    pub features: FeatureConfig,
    pub scoring: ScoringPolicy,
}

fn is_half_band(value: f64) -> bool {
    (0.0..=9.0).contains(&value) && (value * 2.0).fract() == 0.0
}

impl PipelineConfig {
    /// Validate the configuration for structural soundness.
    ///
    /// Rules enforced:
    /// - filler entries are non-empty and lowercase;
    /// - the near-duplicate ratio is above 1 and the stutter group bound is
    ///   at least 1;
    /// - pause thresholds are positive and ordered;
    /// - fallback/articulation rates are positive;
    /// - every cap and ceiling is a half-band value in [0, 9].
    pub fn validate(&self) -> BpResult<()> {
        let filler_entries = self
            .normalize
            .elongated_fillers
            .iter()
            .chain(&self.normalize.phrase_fillers)
            .chain(&self.normalize.plain_fillers);
        for entry in filler_entries {
            if entry.trim().is_empty() {
                return Err(BpError::InvalidConfig("empty filler entry".to_owned()));
            }
            if entry.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(BpError::InvalidConfig(format!(
                    "filler entry `{entry}` must be lowercase"
                )));
            }
        }

        if self.normalize.near_dup_ratio <= 1.0 {
            return Err(BpError::InvalidConfig(format!(
                "near_dup_ratio must be above 1, got {}",
                self.normalize.near_dup_ratio
            )));
        }
        if self.normalize.max_stutter_group == 0 {
            return Err(BpError::InvalidConfig(
                "max_stutter_group must be at least 1".to_owned(),
            ));
        }

        if self.features.pause_threshold_sec <= 0.0 {
            return Err(BpError::InvalidConfig(
                "pause_threshold_sec must be positive".to_owned(),
            ));
        }
        if self.features.long_pause_threshold_sec < self.features.pause_threshold_sec {
            return Err(BpError::InvalidConfig(
                "long_pause_threshold_sec must not be below pause_threshold_sec".to_owned(),
            ));
        }
        if self.features.fallback_words_per_sec <= 0.0 {
            return Err(BpError::InvalidConfig(
                "fallback_words_per_sec must be positive".to_owned(),
            ));
        }
        if self.features.min_fallback_duration_sec <= 0.0 {
            return Err(BpError::InvalidConfig(
                "min_fallback_duration_sec must be positive".to_owned(),
            ));
        }
        if self.features.syllables_per_word <= 0.0 {
            return Err(BpError::InvalidConfig(
                "syllables_per_word must be positive".to_owned(),
            ));
        }

        for (name, value) in [
            ("off_topic_cap", self.scoring.off_topic_cap),
            ("short_answer_cap", self.scoring.short_answer_cap),
        ] {
            if !is_half_band(value) {
                return Err(BpError::InvalidConfig(format!(
                    "{name} must be a half-band value in [0, 9], got {value}"
                )));
            }
        }
        if let Some(ceiling) = self.scoring.diagnostic_ceiling {
            if !is_half_band(ceiling) {
                return Err(BpError::InvalidConfig(format!(
                    "diagnostic_ceiling must be a half-band value in [0, 9], got {ceiling}"
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.scoring.min_relevance_percent) {
            return Err(BpError::InvalidConfig(format!(
                "min_relevance_percent must be in [0, 100], got {}",
                self.scoring.min_relevance_percent
            )));
        }

        Ok(())
    }
}

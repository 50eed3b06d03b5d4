//! Prosodic feature extraction.
//!
//! Derives fluency metrics (speaking rate, pause statistics, filler density,
//! articulation rate) from a normalized transcript and its time-aligned
//! segments. When no timing is available the speech duration is estimated
//! from the word count under an assumed baseline speaking rate, so the
//! metrics are never undefined.
//!
//! Never errors: zero/empty inputs yield zero-valued features.

use tracing::debug;

use crate::config::FeatureConfig;
use crate::model::{AudioFeatures, Segment};
use crate::normalize::{FillerMatcher, count_words};

pub struct FeatureExtractor {
    config: FeatureConfig,
    fillers: FillerMatcher,
}

impl FeatureExtractor {
    #[must_use]
    pub fn new(config: FeatureConfig, fillers: FillerMatcher) -> Self {
        Self { config, fillers }
    }

    /// Compute fluency features for one speech attempt.
    ///
    /// Filler density is recounted on the normalized text (post-collapsing):
    /// downstream scoring penalizes residual fillers, not everything that
    /// was said.
    #[must_use]
    pub fn extract(&self, normalized_text: &str, segments: &[Segment]) -> AudioFeatures {
        let word_count = count_words(normalized_text);
        if word_count == 0 && segments.is_empty() {
            return AudioFeatures::default();
        }

        let sentence_count = normalized_text
            .split(['.', '!', '?'])
            .filter(|part| !part.trim().is_empty())
            .count();

        let speech_duration = match segments {
            [] => (word_count as f64 / self.config.fallback_words_per_sec)
                .max(self.config.min_fallback_duration_sec),
            [first, .., last] => (last.end - first.start).max(0.0),
            [only] => (only.end - only.start).max(0.0),
        };

        let mut pause_count = 0;
        let mut long_pause_count = 0;
        let mut pause_gaps: Vec<f64> = Vec::new();
        for pair in segments.windows(2) {
            let gap = (pair[1].start - pair[0].end).max(0.0);
            if gap > self.config.pause_threshold_sec {
                pause_count += 1;
                pause_gaps.push(gap);
                if gap >= self.config.long_pause_threshold_sec {
                    long_pause_count += 1;
                }
            }
        }
        let mean_pause_duration = if pause_gaps.is_empty() {
            0.0
        } else {
            pause_gaps.iter().sum::<f64>() / pause_gaps.len() as f64
        };

        let wpm = if speech_duration > 0.0 {
            word_count as f64 / speech_duration * 60.0
        } else {
            0.0
        };

        let residual_fillers = self.fillers.count(normalized_text);
        let filler_per_100 = if word_count > 0 {
            residual_fillers as f64 / word_count as f64 * 100.0
        } else {
            0.0
        };

        // Syllables/second proxy assuming a fixed syllables-per-word average,
        // not phonetic analysis.
        let articulation_rate = if speech_duration > 0.0 {
            word_count as f64 * self.config.syllables_per_word / speech_duration
        } else {
            0.0
        };

        let features = AudioFeatures {
            wpm: round_to(wpm, 1),
            filler_per_100: round_to(filler_per_100, 2),
            pause_count,
            long_pause_count,
            mean_pause_duration: round_to(mean_pause_duration, 2),
            speech_duration: round_to(speech_duration, 2),
            articulation_rate: round_to(articulation_rate, 2),
            word_count,
            sentence_count,
        };
        debug!(
            wpm = features.wpm,
            pause_count = features.pause_count,
            speech_duration = features.speech_duration,
            "features extracted"
        );
        features
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

//! Band score engine.
//!
//! Converts raw numeric measurements into half-band scores (0–9 in steps of
//! 0.5), applies the cap policy, and composes sub-criterion scores into one
//! band. Never errors: absent inputs propagate as `None` instead of
//! defaulting to a misleadingly passing value.

use serde::{Deserialize, Serialize};

use crate::config::ScoringPolicy;
use crate::model::{CriterionScores, ScoredCriteria, TaskContext};

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Which half-band rounding convention to apply.
///
/// `Banded` is the official convention. `NearestHalf` reproduces the
/// banker's-rounding `round(x * 2) / 2` behavior of historical call sites;
/// the two disagree on exact quarter fractions (6.25 rounds to 6.5 banded
/// but 6.0 nearest-half), so the choice is an explicit policy knob rather
/// than a silent default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    #[default]
    Banded,
    NearestHalf,
}

impl RoundingRule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Banded => "banded",
            Self::NearestHalf => "nearest_half",
        }
    }

    /// Round a raw score to a half-band under this convention.
    #[must_use]
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            Self::Banded => round_half(raw),
            Self::NearestHalf => nearest_half(raw),
        }
    }
}

/// The official half-band rounding rule: fractions below .25 round down to
/// the whole band, fractions from .25 up to (but excluding) .75 round to the
/// half band, and fractions from .75 round up to the next whole band.
#[must_use]
pub fn round_half(raw: f64) -> f64 {
    let whole = raw.floor();
    let frac = raw - whole;
    if frac < 0.25 {
        whole
    } else if frac < 0.75 {
        whole + 0.5
    } else {
        whole + 1.0
    }
}

/// Legacy convention: `round(x * 2) / 2` with ties-to-even, as the original
/// call sites computed it.
#[must_use]
pub fn nearest_half(raw: f64) -> f64 {
    (raw * 2.0).round_ties_even() / 2.0
}

/// Round a single raw criterion score to a band in [0, 9].
#[must_use]
pub fn to_band(raw: f64, policy: &ScoringPolicy) -> f64 {
    policy.rounding.apply(raw).clamp(0.0, 9.0)
}

// ---------------------------------------------------------------------------
// Composite scoring and caps
// ---------------------------------------------------------------------------

/// Band the present sub-criteria, compose them into an overall band, and
/// enforce the cap policy.
///
/// Caps apply after rounding, in priority order, and only ever lower the
/// score:
/// 1. off-topic content (flag, or relevance at or below the policy minimum)
///    caps the composite;
/// 2. an answer under the required length caps the composite;
/// 3. the diagnostic ceiling caps the composite and every sub-criterion.
#[must_use]
pub fn score_criteria(
    criteria: &CriterionScores,
    ctx: &TaskContext,
    policy: &ScoringPolicy,
) -> ScoredCriteria {
    let mut bands = criteria.map(|raw| to_band(raw, policy));
    let present = bands.present();
    if present.is_empty() {
        return ScoredCriteria {
            bands,
            overall: None,
        };
    }

    let mean = present.iter().sum::<f64>() / present.len() as f64;
    let mut overall = to_band(mean, policy);

    let off_topic = ctx.off_topic
        || ctx
            .relevance_percent
            .is_some_and(|r| r <= policy.min_relevance_percent);
    if off_topic {
        overall = overall.min(policy.off_topic_cap);
    }
    if ctx.word_count < ctx.min_word_count {
        overall = overall.min(policy.short_answer_cap);
    }
    if let Some(ceiling) = policy.diagnostic_ceiling {
        overall = overall.min(ceiling);
        bands = bands.map(|band| band.min(ceiling));
    }

    ScoredCriteria {
        bands,
        overall: Some(overall),
    }
}

// ---------------------------------------------------------------------------
// Listening
// ---------------------------------------------------------------------------

/// Discrete raw-to-band lookup for the fixed-length diagnostic listening
/// set. Raw scores above the item count land in the top bucket; the top
/// bucket maps to 7.5 uncapped and is clamped by the diagnostic ceiling
/// when the policy carries one.
#[must_use]
pub fn listening_band(correct: u32, policy: &ScoringPolicy) -> f64 {
    let band: f64 = match correct {
        0..=1 => 4.5,
        2..=3 => 5.5,
        4..=5 => 6.5,
        _ => 7.5,
    };
    match policy.diagnostic_ceiling {
        Some(ceiling) => band.min(ceiling),
        None => band,
    }
}

//! Cross-section aggregation.
//!
//! Combines per-skill bands into one overall band using the configured
//! rounding rule. A partial attempt is averaged over exactly the skills
//! that were attempted; absent skills are never imputed as zero.

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::config::ScoringPolicy;
use crate::model::{DiagnosticReport, OverallResult, Skill, SkillScore};

/// Combine up to four per-skill bands into one overall result.
///
/// `overall` is `None` iff no skill band is present. When the same skill
/// appears more than once the last entry wins.
#[must_use]
pub fn aggregate(skills: &[SkillScore], policy: &ScoringPolicy) -> OverallResult {
    let mut result = OverallResult::default();
    for score in skills {
        match score.skill {
            Skill::Listening => result.listening = score.band,
            Skill::Reading => result.reading = score.band,
            Skill::Writing => result.writing = score.band,
            Skill::Speaking => result.speaking = score.band,
        }
    }

    let present: Vec<f64> = [
        result.listening,
        result.reading,
        result.writing,
        result.speaking,
    ]
    .into_iter()
    .flatten()
    .collect();

    result.overall = if present.is_empty() {
        None
    } else {
        let mean = present.iter().sum::<f64>() / present.len() as f64;
        Some(policy.rounding.apply(mean).clamp(0.0, 9.0))
    };
    result
}

/// Assemble the per-skill detail plus overall band for the downstream
/// persistence/report collaborator, stamped with the generation time.
#[must_use]
pub fn build_report(skills: &[SkillScore], policy: &ScoringPolicy) -> DiagnosticReport {
    let result = aggregate(skills, policy);
    let skills: Vec<SkillScore> = Skill::ALL
        .iter()
        .map(|&skill| SkillScore::new(skill, result.band_for(skill)))
        .collect();
    info!(
        overall = result.overall,
        attempted = skills.iter().filter(|s| s.band.is_some()).count(),
        "diagnostic report assembled"
    );
    DiagnosticReport {
        skills,
        overall: result.overall,
        generated_at_rfc3339: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

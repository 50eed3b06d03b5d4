use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Recognizer-side inputs
// ---------------------------------------------------------------------------

/// One time-aligned chunk of recognized speech.
///
/// Segments arrive in chronological order from the recognizer and that order
/// is preserved throughout the pipeline. The sequence may be empty when no
/// timing information is available for an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds from the beginning of the recording.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Recognized text for this chunk.
    pub text: String,
}

impl Segment {
    #[must_use]
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization output
// ---------------------------------------------------------------------------

/// Cleaned transcript plus the counts the scoring collaborator needs.
///
/// `filler_words`/`filler_count` reflect what was actually said (extracted
/// from the raw text before collapsing), while `text`, `sentences` and
/// `word_count` describe the cleaned version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTranscript {
    pub text: String,
    pub sentences: Vec<String>,
    pub word_count: usize,
    pub filler_words: Vec<String>,
    pub filler_count: usize,
}

impl NormalizedTranscript {
    /// True when normalization degraded to the empty record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Fluency features
// ---------------------------------------------------------------------------

/// Quantitative fluency metrics derived from a normalized transcript and its
/// time-aligned segments.
///
/// Invariants: `long_pause_count <= pause_count`; all durations are >= 0.
/// When no segments are available `speech_duration` is estimated from the
/// word count rather than left undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// Words per minute over the speech duration.
    pub wpm: f64,
    /// Residual fillers per 100 words of normalized text.
    pub filler_per_100: f64,
    pub pause_count: usize,
    pub long_pause_count: usize,
    /// Mean duration of gaps that qualified as pauses, in seconds.
    pub mean_pause_duration: f64,
    /// Total speech duration in seconds (measured or estimated).
    pub speech_duration: f64,
    /// Approximate syllables per second during active speech.
    pub articulation_rate: f64,
    pub word_count: usize,
    pub sentence_count: usize,
}

// ---------------------------------------------------------------------------
// Scoring inputs and outputs
// ---------------------------------------------------------------------------

/// Per-criterion scores for a written or spoken task: Task Response,
/// Coherence & Cohesion, Lexical Resource, Grammar Range & Accuracy.
///
/// `None` means the criterion was not assessed; absent criteria are excluded
/// from the composite, never treated as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub task_response: Option<f64>,
    pub coherence_cohesion: Option<f64>,
    pub lexical_resource: Option<f64>,
    pub grammar_accuracy: Option<f64>,
}

impl CriterionScores {
    #[must_use]
    pub fn new(
        task_response: Option<f64>,
        coherence_cohesion: Option<f64>,
        lexical_resource: Option<f64>,
        grammar_accuracy: Option<f64>,
    ) -> Self {
        Self {
            task_response,
            coherence_cohesion,
            lexical_resource,
            grammar_accuracy,
        }
    }

    /// The present (non-null) criterion values, in declaration order.
    #[must_use]
    pub fn present(&self) -> Vec<f64> {
        [
            self.task_response,
            self.coherence_cohesion,
            self.lexical_resource,
            self.grammar_accuracy,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply `f` to every present criterion value.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            task_response: self.task_response.map(&f),
            coherence_cohesion: self.coherence_cohesion.map(&f),
            lexical_resource: self.lexical_resource.map(&f),
            grammar_accuracy: self.grammar_accuracy.map(&f),
        }
    }
}

/// Banded criterion scores plus their composite.
///
/// `overall` is `None` iff no criterion was present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCriteria {
    pub bands: CriterionScores,
    pub overall: Option<f64>,
}

/// Quality signals about one task attempt, used by the cap policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskContext {
    /// The content was flagged off-topic by the scoring collaborator.
    #[serde(default)]
    pub off_topic: bool,
    /// On-topic relevance in percent, when the collaborator reports one.
    pub relevance_percent: Option<f64>,
    /// Words the candidate actually produced.
    #[serde(default)]
    pub word_count: usize,
    /// Minimum words the task requires; 0 disables the length cap.
    #[serde(default)]
    pub min_word_count: usize,
}

// ---------------------------------------------------------------------------
// Skills and aggregation
// ---------------------------------------------------------------------------

/// The assessed skill sections. The aggregator treats all skills uniformly;
/// only the upstream scoring differs per skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Listening,
    Reading,
    Writing,
    Speaking,
}

impl Skill {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listening => "listening",
            Self::Reading => "reading",
            Self::Writing => "writing",
            Self::Speaking => "speaking",
        }
    }

    /// All skills in canonical report order.
    pub const ALL: [Self; 4] = [Self::Listening, Self::Reading, Self::Writing, Self::Speaking];
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One skill's band, or `None` when the skill was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: Skill,
    pub band: Option<f64>,
}

impl SkillScore {
    #[must_use]
    pub const fn new(skill: Skill, band: Option<f64>) -> Self {
        Self { skill, band }
    }
}

/// Final cross-section result.
///
/// `overall` is `None` iff no skill band is present; otherwise it is the
/// rounded mean of the present bands only (absent skills do not count as
/// zero).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallResult {
    pub listening: Option<f64>,
    pub reading: Option<f64>,
    pub writing: Option<f64>,
    pub speaking: Option<f64>,
    pub overall: Option<f64>,
}

impl OverallResult {
    /// The band recorded for a given skill.
    #[must_use]
    pub const fn band_for(&self, skill: Skill) -> Option<f64> {
        match skill {
            Skill::Listening => self.listening,
            Skill::Reading => self.reading,
            Skill::Writing => self.writing,
            Skill::Speaking => self.speaking,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline outputs handed to downstream collaborators
// ---------------------------------------------------------------------------

/// Everything the criterion scoring collaborator needs for one speech attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAssessment {
    pub transcript: NormalizedTranscript,
    pub features: AudioFeatures,
}

/// Per-skill detail plus overall band, stamped for the persistence/report
/// collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub skills: Vec<SkillScore>,
    pub overall: Option<f64>,
    pub generated_at_rfc3339: String,
}

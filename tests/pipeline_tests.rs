//! End-to-end pipeline tests: recognizer JSON in, overall band out.

mod helpers;

use bandpipe::ingest::parse_recognizer_output;
use bandpipe::model::{Skill, SkillScore};
use serde_json::json;

use helpers::{create_partial_attempt, create_segments, create_test_pipeline};

#[test]
fn recognizer_json_flows_through_to_features() {
    let raw = json!({
        "text": "um um so I think I think the plan works. I think the plan works.",
        "segments": [
            {"start": 0.0, "end": 3.0, "text": "um um so I think"},
            {"start": 4.0, "end": 7.0, "text": "I think the plan works."},
            {"start": 7.1, "end": 9.0, "text": "I think the plan works."},
        ],
    });
    let recognized = parse_recognizer_output(&raw).expect("payload is an object");
    let pipeline = create_test_pipeline();
    let assessment = pipeline.process_speech(&recognized.transcript, &recognized.segments);

    // Stutter, duplicate sentence and filler run all collapsed.
    assert_eq!(assessment.transcript.text, "Um so I think the plan works.");
    // Reported fillers reflect the raw attempt.
    assert_eq!(assessment.transcript.filler_count, 2);

    // 9 seconds of audio, one qualifying pause (4.0 - 3.0).
    assert_eq!(assessment.features.speech_duration, 9.0);
    assert_eq!(assessment.features.pause_count, 1);
    assert_eq!(assessment.features.long_pause_count, 1);
    assert_eq!(assessment.features.word_count, assessment.transcript.word_count);
}

#[test]
fn speech_without_timing_still_yields_features() {
    let pipeline = create_test_pipeline();
    let assessment = pipeline.process_speech("The plan works fine today.", &[]);
    assert!(assessment.features.speech_duration > 0.0);
    assert!(assessment.features.wpm > 0.0);
    assert_eq!(assessment.features.pause_count, 0);
}

#[test]
fn garbled_input_degrades_instead_of_failing_the_attempt() {
    let pipeline = create_test_pipeline();
    let assessment = pipeline.process_speech("   ", &[]);
    assert!(assessment.transcript.is_empty());
    assert_eq!(assessment.features.word_count, 0);

    // A degraded speaking attempt must not poison the other skills.
    let result = pipeline.finalize(&[
        SkillScore::new(Skill::Speaking, None),
        SkillScore::new(Skill::Listening, Some(5.5)),
    ]);
    assert_eq!(result.overall, Some(5.5));
}

#[test]
fn two_skill_diagnostic_end_to_end() {
    let pipeline = create_test_pipeline();
    let listening = pipeline.score_listening(2);
    assert_eq!(listening, 5.5);

    let attempt = create_partial_attempt(listening, 6.5);
    let result = pipeline.finalize(&attempt);
    // (5.5 + 6.5) / 2 = 6.0 over exactly the two attempted skills.
    assert_eq!(result.overall, Some(6.0));
    assert_eq!(result.reading, None);
    assert_eq!(result.speaking, None);
}

#[test]
fn report_round_trips_through_json() {
    let pipeline = create_test_pipeline();
    let report = pipeline.report(&create_partial_attempt(6.5, 7.0));
    let serialized = serde_json::to_string(&report).expect("report serializes");
    let parsed: bandpipe::model::DiagnosticReport =
        serde_json::from_str(&serialized).expect("report deserializes");
    assert_eq!(parsed.overall, Some(7.0));
    assert_eq!(parsed.skills.len(), 4);
}

#[test]
fn pause_statistics_survive_the_full_flow() {
    let pipeline = create_test_pipeline();
    let segments = create_segments(&[
        (0.0, 2.0, "first part"),
        (2.1, 4.0, "keeps going"),
        (4.5, 6.0, "after a pause"),
        (7.0, 9.0, "after a long pause"),
    ]);
    let assessment = pipeline.process_speech(
        "first part keeps going after a pause after a long pause",
        &segments,
    );
    assert_eq!(assessment.features.pause_count, 2);
    assert_eq!(assessment.features.long_pause_count, 1);
    assert!(assessment.features.mean_pause_duration > 0.0);
}

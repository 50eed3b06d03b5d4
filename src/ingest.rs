//! Recognizer output ingestion.
//!
//! Speech recognizers deliver their results as JSON in a handful of close
//! dialects: a `segments` array with `start`/`end` seconds, a
//! `transcription` array with millisecond `offsets`, or a `chunks` array
//! with two-element `timestamp` pairs. This module extracts the raw
//! transcript and the ordered time-aligned segments from any of them,
//! tolerating missing fields rather than failing the attempt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BpError, BpResult};
use crate::model::Segment;

/// Raw transcript plus ordered segments, as delivered by the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerOutput {
    pub transcript: String,
    pub segments: Vec<Segment>,
}

/// Parse a recognizer JSON payload.
///
/// The transcript comes from the top-level `text` field when present and
/// non-blank, otherwise it is reassembled from the segment texts. Returns
/// an error only when the root is not a JSON object.
pub fn parse_recognizer_output(raw_json: &Value) -> BpResult<RecognizerOutput> {
    if !raw_json.is_object() {
        return Err(BpError::InvalidPayload(
            "recognizer output is not a JSON object".to_owned(),
        ));
    }

    let segments = extract_segments(raw_json);

    let transcript = raw_json
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| transcript_from_segments(&segments));

    Ok(RecognizerOutput {
        transcript,
        segments,
    })
}

/// Extract timed segments from whichever array key the recognizer used.
/// Nodes without usable timestamps are skipped.
#[must_use]
pub fn extract_segments(root: &Value) -> Vec<Segment> {
    for key in ["segments", "transcription", "chunks"] {
        if let Some(items) = root.get(key).and_then(Value::as_array) {
            return segments_from_nodes(items);
        }
    }
    Vec::new()
}

fn segments_from_nodes(nodes: &[Value]) -> Vec<Segment> {
    nodes
        .iter()
        .filter_map(|node| {
            let start = segment_start(node)?;
            let end = segment_end(node)?;
            let text = node
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_owned();
            Some(Segment { start, end, text })
        })
        .collect()
}

fn segment_start(node: &Value) -> Option<f64> {
    node.get("start")
        .and_then(value_to_secs)
        .or_else(|| node.pointer("/timestamp/0").and_then(value_to_secs))
        .or_else(|| node.pointer("/offsets/from").and_then(value_to_millis))
}

fn segment_end(node: &Value) -> Option<f64> {
    node.get("end")
        .and_then(value_to_secs)
        .or_else(|| node.pointer("/timestamp/1").and_then(value_to_secs))
        .or_else(|| node.pointer("/offsets/to").and_then(value_to_millis))
}

fn value_to_secs(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn value_to_millis(value: &Value) -> Option<f64> {
    value_to_secs(value).map(|ms| ms / 1000.0)
}

fn transcript_from_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn segments_key_with_second_timestamps() {
        let raw = json!({
            "text": "Hello world. This is a test.",
            "segments": [
                {"start": 0.0, "end": 2.5, "text": "Hello world."},
                {"start": 2.5, "end": 6.0, "text": "This is a test."},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        assert_eq!(output.transcript, "Hello world. This is a test.");
        assert_eq!(output.segments.len(), 2);
        assert_eq!(output.segments[0].end, 2.5);
        assert_eq!(output.segments[1].text, "This is a test.");
    }

    #[test]
    fn transcription_key_with_millisecond_offsets() {
        let raw = json!({
            "text": "offset based",
            "transcription": [
                {"offsets": {"from": 1000, "to": 2500}, "text": "offset based"},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        assert_eq!(output.segments.len(), 1);
        assert_eq!(output.segments[0].start, 1.0);
        assert_eq!(output.segments[0].end, 2.5);
    }

    #[test]
    fn chunks_with_timestamp_pairs() {
        let raw = json!({
            "text": "chunked",
            "chunks": [
                {"text": "chunked", "timestamp": [0.5, 1.5]},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        assert_eq!(output.segments.len(), 1);
        assert_eq!(output.segments[0].start, 0.5);
        assert_eq!(output.segments[0].end, 1.5);
    }

    #[test]
    fn blank_text_falls_back_to_segment_texts() {
        let raw = json!({
            "text": "   ",
            "segments": [
                {"start": 0.0, "end": 1.0, "text": "hello"},
                {"start": 1.0, "end": 2.0, "text": "world"},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        assert_eq!(output.transcript, "hello world");
    }

    #[test]
    fn missing_text_and_segments_give_empty_output() {
        let output = parse_recognizer_output(&json!({})).unwrap();
        assert!(output.transcript.is_empty());
        assert!(output.segments.is_empty());
    }

    #[test]
    fn untimed_nodes_are_skipped() {
        let raw = json!({
            "text": "kept anyway",
            "segments": [
                {"text": "no timing at all"},
                {"start": 0.0, "end": 1.0, "text": "timed"},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        assert_eq!(output.segments.len(), 1);
        assert_eq!(output.segments[0].text, "timed");
        assert_eq!(output.transcript, "kept anyway");
    }

    #[test]
    fn string_timestamps_parse() {
        let raw = json!({
            "segments": [
                {"start": "1.5", "end": "3.0", "text": "stringly timed"},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        assert_eq!(output.segments[0].start, 1.5);
        assert_eq!(output.segments[0].end, 3.0);
    }

    #[test]
    fn non_object_roots_are_rejected() {
        for raw in [json!(null), json!([1, 2, 3]), json!("just text"), json!(42)] {
            let err = parse_recognizer_output(&raw).unwrap_err();
            assert_eq!(err.error_code(), "BP-PAYLOAD");
        }
    }

    #[test]
    fn segment_order_is_preserved() {
        let raw = json!({
            "segments": [
                {"start": 0.0, "end": 1.0, "text": "first"},
                {"start": 1.0, "end": 2.0, "text": "second"},
                {"start": 2.0, "end": 3.0, "text": "third"},
            ],
        });
        let output = parse_recognizer_output(&raw).unwrap();
        let texts: Vec<&str> = output.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;

use crate::services::{SegmentedSpeech, SynthesisResult};

/// One synthesized segment as returned to HTTP clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentAudio {
    pub index: usize,
    pub text: String,
    pub audio_base64: String,
}

impl From<SynthesisResult> for SegmentAudio {
    fn from(result: SynthesisResult) -> Self {
        Self {
            index: result.index,
            audio_base64: BASE64.encode(&result.audio),
            text: result.text,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentsResponse {
    pub segments: Vec<SegmentAudio>,
    pub total_segments: usize,
}

impl From<SegmentedSpeech> for SegmentsResponse {
    fn from(speech: SegmentedSpeech) -> Self {
        Self {
            total_segments: speech.total_segments,
            segments: speech.segments.into_iter().map(SegmentAudio::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_segment_audio_encodes_base64() {
        let segment = SegmentAudio::from(SynthesisResult {
            index: 2,
            text: "你好".to_string(),
            audio: Bytes::from_static(b"RIFF"),
        });

        assert_eq!(segment.index, 2);
        assert_eq!(segment.text, "你好");
        assert_eq!(segment.audio_base64, "UklGRg==");
    }

    #[test]
    fn test_segments_response_field_names() {
        let speech = SegmentedSpeech {
            segments: vec![SynthesisResult {
                index: 0,
                text: "Hello".to_string(),
                audio: Bytes::from_static(&[1, 2, 3]),
            }],
            total_segments: 1,
        };

        let json = serde_json::to_value(SegmentsResponse::from(speech)).unwrap();

        assert_eq!(json["totalSegments"], 1);
        assert_eq!(json["segments"][0]["index"], 0);
        assert_eq!(json["segments"][0]["text"], "Hello");
        assert_eq!(json["segments"][0]["audioBase64"], "AQID");
        assert!(json["segments"][0].get("audio_base64").is_none());
    }

    #[test]
    fn test_segments_response_preserves_order() {
        let speech = SegmentedSpeech {
            segments: (0..3)
                .map(|i| SynthesisResult {
                    index: i,
                    text: format!("segment {}", i),
                    audio: Bytes::new(),
                })
                .collect(),
            total_segments: 3,
        };

        let response = SegmentsResponse::from(speech);
        let indices: Vec<usize> = response.segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(response.total_segments, 3);
    }

    #[test]
    fn test_health_response_ok() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"0.1.0\""));
    }
}

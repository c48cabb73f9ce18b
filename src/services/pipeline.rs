use bytes::Bytes;
use tokio::time::Instant;

use crate::chunking::{self, Segment, Thresholds};
use crate::error::{Result, TtsError};
use crate::provider::SpeechSynthesizer;

/// Number of segments whose sizes are logged individually
const LOGGED_SEGMENT_PREVIEW: usize = 5;

/// Audio for one segment, in segment order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub index: usize,
    pub text: String,
    pub audio: Bytes,
}

/// Every segment of a text, synthesized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedSpeech {
    pub segments: Vec<SynthesisResult>,
    pub total_segments: usize,
}

/// Segment `text` and synthesize each segment in order, one call at a time.
///
/// The first failing segment aborts the whole batch; results gathered so far
/// are dropped and only the classified error is returned.
pub async fn synthesize_segments(
    text: &str,
    voice: &str,
    thresholds: &Thresholds,
    synthesizer: &dyn SpeechSynthesizer,
) -> Result<SegmentedSpeech> {
    synthesize_segments_until(text, voice, thresholds, synthesizer, None).await
}

/// Like [`synthesize_segments`], but stops with `TtsError::Timeout` if `deadline`
/// has passed before the next segment is started.
pub async fn synthesize_segments_until(
    text: &str,
    voice: &str,
    thresholds: &Thresholds,
    synthesizer: &dyn SpeechSynthesizer,
    deadline: Option<Instant>,
) -> Result<SegmentedSpeech> {
    let start = Instant::now();

    let segments = chunking::segments(text, thresholds);
    let total = segments.len();

    tracing::info!(
        text_length = text.chars().count(),
        segments = total,
        "Split text into segments"
    );
    for segment in segments.iter().take(LOGGED_SEGMENT_PREVIEW) {
        tracing::debug!(
            "Segment {}: {} characters",
            segment.index,
            segment.text.chars().count()
        );
    }
    if total > LOGGED_SEGMENT_PREVIEW {
        tracing::debug!("... and {} more segments", total - LOGGED_SEGMENT_PREVIEW);
    }

    let mut results = Vec::with_capacity(total);

    for segment in segments {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(TtsError::Timeout {
                    completed: results.len(),
                    total,
                });
            }
        }

        check_segment(&segment)?;

        tracing::debug!(
            "Processing segment {}/{} ({} chars)",
            segment.index + 1,
            total,
            segment.text.chars().count()
        );

        let audio = synthesizer
            .synthesize(&segment.text, voice)
            .await
            .map_err(|err| classify_failure(err, &segment))?;

        tracing::debug!(
            "Generated segment {}/{} (audio size: {} bytes)",
            segment.index + 1,
            total,
            audio.len()
        );

        results.push(SynthesisResult {
            index: segment.index,
            text: segment.text,
            audio,
        });
    }

    tracing::info!(
        "Synthesized all {} segments in {:?}",
        results.len(),
        start.elapsed()
    );

    Ok(SegmentedSpeech {
        total_segments: results.len(),
        segments: results,
    })
}

/// A segment that breaks its own bound is a local defect, not a provider problem
fn check_segment(segment: &Segment) -> Result<()> {
    let length = segment.text.chars().count();
    if segment.text.is_empty() || length > segment.length_bound {
        return Err(TtsError::Internal(format!(
            "segment {} has invalid length {} (bound {})",
            segment.index, length, segment.length_bound
        )));
    }
    Ok(())
}

fn classify_failure(err: TtsError, segment: &Segment) -> TtsError {
    let preview: String = segment.text.chars().take(200).collect();
    tracing::error!(
        segment = segment.index,
        error = %err,
        "Failed to generate segment"
    );
    tracing::debug!("Segment text (first 200 chars): {}", preview);

    if err.is_provider_error() || matches!(err, TtsError::MissingApiKey) {
        err
    } else {
        TtsError::Internal(format!("segment {}: {}", segment.index, err))
    }
}

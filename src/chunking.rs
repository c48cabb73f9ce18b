use serde::Serialize;

use crate::config::constants::{BREAK_SEARCH_LOOKBACK, MAX_SEGMENT_LENGTH, SAFE_SEGMENT_LENGTH};
use crate::error::{Result, TtsError};

/// Sentence-ending punctuation, East-Asian and ASCII forms
const STRONG_BOUNDARIES: [char; 8] = ['。', '！', '？', '!', '?', '；', ';', '\n'];

/// Lesser pauses, only used when no strong boundary is in reach
const WEAK_BOUNDARIES: [char; 3] = ['，', ',', '.'];

/// Length limits for text segments, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    hard_max: usize,
    safe_length: usize,
}

impl Thresholds {
    /// Create a threshold pair, rejecting anything outside `1 <= safe_length <= hard_max`
    pub fn new(hard_max: usize, safe_length: usize) -> Result<Self> {
        if safe_length == 0 || safe_length > hard_max {
            return Err(TtsError::InvalidThresholds {
                hard_max,
                safe_length,
            });
        }
        Ok(Self {
            hard_max,
            safe_length,
        })
    }

    /// Absolute ceiling; no segment is ever longer
    pub fn hard_max(&self) -> usize {
        self.hard_max
    }

    /// Preferred length; break search starts once a segment grows this long
    pub fn safe_length(&self) -> usize {
        self.safe_length
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hard_max: MAX_SEGMENT_LENGTH,
            safe_length: SAFE_SEGMENT_LENGTH,
        }
    }
}

/// One provider-sized piece of the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub text: String,
    pub length_bound: usize,
}

/// Split text into segments no longer than `hard_max` characters.
///
/// Text up to `safe_length` characters is returned untouched. Longer text is
/// scanned with a cursor; once the pending piece reaches `safe_length`, the
/// latest strong boundary in reach wins, then the latest weak one, and with
/// neither the piece is cut at exactly `hard_max`. Cut pieces are trimmed and
/// whitespace-only pieces are dropped.
pub fn segment_text(text: &str, thresholds: &Thresholds) -> Vec<String> {
    enforce_bound(split_unchecked(text, thresholds), thresholds.hard_max)
}

/// The cursor scan alone, before the last-resort truncation
fn split_unchecked(text: &str, thresholds: &Thresholds) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= thresholds.safe_length {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    // Pending piece is always chars[start..cursor]
    let mut start = 0;

    for cursor in 1..=chars.len() {
        let pending = &chars[start..cursor];
        if pending.len() < thresholds.safe_length {
            continue;
        }

        if let Some(boundary) = find_break(pending, thresholds) {
            push_trimmed(&mut chunks, &pending[..=boundary]);
            start += boundary + 1;
        } else if pending.len() >= thresholds.hard_max {
            push_trimmed(&mut chunks, &pending[..thresholds.hard_max]);
            start += thresholds.hard_max;
        }
    }

    let tail: String = chars[start..].iter().collect();
    let tail = tail.trim();
    if !tail.is_empty() {
        let tail_chars: Vec<char> = tail.chars().collect();
        for piece in tail_chars.chunks(thresholds.hard_max) {
            chunks.push(piece.iter().collect());
        }
    }

    chunks
}

/// Segment text and attach positions and the bound each segment was cut under
pub fn segments(text: &str, thresholds: &Thresholds) -> Vec<Segment> {
    segment_text(text, thresholds)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment {
            index,
            text,
            length_bound: thresholds.hard_max,
        })
        .collect()
}

/// Latest break position inside the search window of a pending piece
fn find_break(pending: &[char], thresholds: &Thresholds) -> Option<usize> {
    let window_start = thresholds.safe_length.saturating_sub(BREAK_SEARCH_LOOKBACK);
    let window_end = pending.len().min(thresholds.hard_max);
    if window_start >= window_end {
        return None;
    }

    let window = &pending[window_start..window_end];
    window
        .iter()
        .rposition(|c| STRONG_BOUNDARIES.contains(c))
        .or_else(|| window.iter().rposition(|c| WEAK_BOUNDARIES.contains(c)))
        .map(|offset| window_start + offset)
}

fn push_trimmed(chunks: &mut Vec<String>, piece: &[char]) {
    let piece: String = piece.iter().collect();
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Last-resort truncation; the scan above never produces an over-long chunk
fn enforce_bound(mut chunks: Vec<String>, hard_max: usize) -> Vec<String> {
    for (i, chunk) in chunks.iter_mut().enumerate() {
        let length = chunk.chars().count();
        if length > hard_max {
            tracing::warn!(
                "Segment {} length ({}) exceeds hard max ({}), truncating",
                i,
                length,
                hard_max
            );
            *chunk = chunk.chars().take(hard_max).collect();
        }
    }
    chunks
}

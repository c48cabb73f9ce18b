pub mod dashscope;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use dashscope::{DashScopeClient, DashScopeConfig};

/// A speech-synthesis backend: text and voice in, encoded audio out.
///
/// Implementations report request/response failures (bad status, malformed
/// payload, unreachable endpoint) as `TtsError::Provider` so callers can tell
/// them apart from local faults.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes>;
}

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TtsError};

/// Body of `POST /tts` and `POST /tts/segments`.
///
/// Fields stay loosely typed so a non-string `voice` can fall back to the
/// default and a non-string `text` gets a precise 400 instead of a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct TTSRequest {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub voice: Option<Value>,
}

impl TTSRequest {
    /// The text to speak; `None` when missing, null or empty
    pub fn text(&self) -> Result<Option<&str>> {
        match &self.text {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(TtsError::InvalidRequest(
                "text must be a string".to_string(),
            )),
        }
    }

    /// The requested voice, or `default` when absent, empty or not a string
    pub fn voice_or<'a>(&'a self, default: &'a str) -> &'a str {
        match &self.voice {
            Some(Value::String(s)) if !s.is_empty() => s.as_str(),
            _ => default,
        }
    }
}

/// Query string of `POST /tts/segments`
#[derive(Debug, Default, Deserialize)]
pub struct SegmentsQuery {
    #[serde(rename = "debugSample")]
    pub debug_sample: Option<String>,
}

impl SegmentsQuery {
    pub fn use_debug_sample(&self) -> bool {
        matches!(self.debug_sample.as_deref(), Some("1") | Some("true"))
    }
}

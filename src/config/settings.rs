use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::constants::{
    DASHSCOPE_API_URL, DASHSCOPE_LANGUAGE_TYPE, DASHSCOPE_MODEL, DEFAULT_VOICE,
    MAX_SEGMENT_LENGTH, MAX_TEXT_LENGTH, SAFE_SEGMENT_LENGTH,
};
use crate::chunking::Thresholds;
use crate::error::Result;
use crate::provider::DashScopeConfig;

/// Process-wide settings, read once at start-up
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub dashscope: DashScopeConfig,
    pub default_voice: String,
    pub thresholds: Thresholds,
    pub max_text_length: usize,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            dashscope: DashScopeConfig::default(),
            default_voice: DEFAULT_VOICE.to_string(),
            thresholds: Thresholds::default(),
            max_text_length: MAX_TEXT_LENGTH,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    ///
    /// Unparseable values fall back to defaults; an invalid threshold pair is an error.
    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let thresholds = Thresholds::new(
            parse_var(&get, "TTS_MAX_SEGMENT_LENGTH", MAX_SEGMENT_LENGTH),
            parse_var(&get, "TTS_SAFE_SEGMENT_LENGTH", SAFE_SEGMENT_LENGTH),
        )?;

        let dashscope = DashScopeConfig {
            api_key: get("DASHSCOPE_API_KEY").filter(|key| !key.trim().is_empty()),
            api_url: string_var(&get, "DASHSCOPE_API_URL", DASHSCOPE_API_URL),
            model: string_var(&get, "DASHSCOPE_MODEL", DASHSCOPE_MODEL),
            language_type: string_var(&get, "DASHSCOPE_LANGUAGE_TYPE", DASHSCOPE_LANGUAGE_TYPE),
            timeout: Duration::from_secs(parse_var(&get, "PROVIDER_TIMEOUT_SECONDS", 30)),
        };

        Ok(Self {
            port: parse_var(&get, "PORT", 3000),
            dashscope,
            default_voice: string_var(&get, "TTS_DEFAULT_VOICE", DEFAULT_VOICE),
            thresholds,
            max_text_length: parse_var(&get, "TTS_MAX_TEXT_LENGTH", MAX_TEXT_LENGTH),
            request_timeout: Duration::from_secs(parse_var(&get, "REQUEST_TIMEOUT_SECONDS", 60)),
        })
    }
}

fn parse_var<F, T>(get: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    get(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn string_var<F>(get: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

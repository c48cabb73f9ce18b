use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::SpeechSynthesizer;
use crate::config::constants::{
    DASHSCOPE_API_URL, DASHSCOPE_LANGUAGE_TYPE, DASHSCOPE_MODEL, PROVIDER_ERROR_SNIPPET_LENGTH,
};
use crate::error::{Result, TtsError};

/// Connection settings for the DashScope (Qwen3 TTS) generation endpoint
#[derive(Debug, Clone)]
pub struct DashScopeConfig {
    /// Bearer token; requests fail with `MissingApiKey` when absent
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub language_type: String,
    /// Per-request timeout covering both the generation call and the audio download
    pub timeout: Duration,
}

impl Default for DashScopeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DASHSCOPE_API_URL.to_string(),
            model: DASHSCOPE_MODEL.to_string(),
            language_type: DASHSCOPE_LANGUAGE_TYPE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    text: &'a str,
    voice: &'a str,
    language_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    output: Option<GenerationOutput>,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    audio: Option<GeneratedAudio>,
}

#[derive(Debug, Deserialize)]
struct GeneratedAudio {
    url: Option<String>,
}

/// Two-step DashScope client: request generation, then download the audio it points to
#[derive(Debug, Clone)]
pub struct DashScopeClient {
    http: reqwest::Client,
    config: DashScopeConfig,
}

impl DashScopeClient {
    pub fn new(config: DashScopeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TtsError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DashScopeConfig {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Ask DashScope to generate speech and return the URL of the produced audio
    async fn request_audio_url(&self, api_key: &str, text: &str, voice: &str) -> Result<String> {
        tracing::debug!(
            model = %self.config.model,
            voice = %voice,
            language_type = %self.config.language_type,
            text_length = text.chars().count(),
            "Calling DashScope TTS API"
        );

        let body = GenerationRequest {
            model: &self.config.model,
            input: GenerationInput {
                text,
                voice,
                language_type: &self.config.language_type,
            },
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "DashScope response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %snippet(&body),
                "DashScope TTS API error"
            );
            return Err(status_error(status.as_u16(), &body));
        }

        let payload: GenerationResponse = response.json().await.map_err(|e| TtsError::Provider {
            status: Some(status.as_u16()),
            message: format!("DashScope TTS service error: invalid response body - {}", e),
        })?;

        payload
            .output
            .and_then(|output| output.audio)
            .and_then(|audio| audio.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                tracing::error!("DashScope response is missing output.audio.url");
                TtsError::provider(
                    "DashScope TTS service error: invalid response structure - missing output.audio.url",
                )
            })
    }

    async fn download_audio(&self, audio_url: &str) -> Result<Bytes> {
        tracing::debug!("Downloading generated audio");

        let response = self.http.get(audio_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Failed to download audio");
            return Err(TtsError::Provider {
                status: Some(status.as_u16()),
                message: format!(
                    "DashScope TTS service error: Failed to download audio - HTTP {}",
                    status.as_u16()
                ),
            });
        }

        let audio = response.bytes().await?;
        tracing::debug!(bytes = audio.len(), "Downloaded audio");
        Ok(audio)
    }
}

#[async_trait]
impl SpeechSynthesizer for DashScopeClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes> {
        let api_key = self.api_key().ok_or(TtsError::MissingApiKey)?;
        let audio_url = self.request_audio_url(api_key, text, voice).await?;
        self.download_audio(&audio_url).await
    }
}

/// Build the provider error for a non-2xx generation response
fn status_error(status: u16, body: &str) -> TtsError {
    let mut message = format!("DashScope TTS API returned status {}", status);

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => {
            if let Some(detail) = json.get("message").filter(|v| !v.is_null()) {
                let detail = detail
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| detail.to_string());
                message.push_str(&format!(": {}", detail));
            } else if let Some(error) = json.get("error").filter(|v| !v.is_null()) {
                message.push_str(&format!(": {}", error));
            }
        }
        Err(_) => {
            if !body.is_empty() {
                message.push_str(&format!(": {}", snippet(body)));
            }
        }
    }

    TtsError::Provider {
        status: Some(status),
        message,
    }
}

fn snippet(body: &str) -> String {
    if body.chars().count() > PROVIDER_ERROR_SNIPPET_LENGTH {
        let head: String = body.chars().take(PROVIDER_ERROR_SNIPPET_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: TtsError) -> (Option<u16>, String) {
        match err {
            TtsError::Provider { status, message } => (status, message),
            other => panic!("Expected provider error, got: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_uses_json_message() {
        let body = r#"{"code":"InvalidParameter","message":"Range of input length should be [0, 600]"}"#;
        let (status, message) = message_of(status_error(400, body));
        assert_eq!(status, Some(400));
        assert_eq!(
            message,
            "DashScope TTS API returned status 400: Range of input length should be [0, 600]"
        );
    }

    #[test]
    fn test_status_error_falls_back_to_error_field() {
        let body = r#"{"error":{"type":"auth","detail":"bad key"}}"#;
        let (_, message) = message_of(status_error(401, body));
        assert!(message.starts_with("DashScope TTS API returned status 401: {"));
        assert!(message.contains("bad key"));
    }

    #[test]
    fn test_status_error_json_without_detail() {
        let (_, message) = message_of(status_error(500, r#"{"request_id":"abc"}"#));
        assert_eq!(message, "DashScope TTS API returned status 500");
    }

    #[test]
    fn test_status_error_plain_text_is_truncated() {
        let body = "x".repeat(400);
        let (_, message) = message_of(status_error(503, &body));
        let expected = format!("DashScope TTS API returned status 503: {}...", "x".repeat(300));
        assert_eq!(message, expected);
    }

    #[test]
    fn test_status_error_empty_body() {
        let (_, message) = message_of(status_error(502, ""));
        assert_eq!(message, "DashScope TTS API returned status 502");
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerationRequest {
            model: "qwen3-tts-flash",
            input: GenerationInput {
                text: "你好 hello",
                voice: "Jennifer",
                language_type: "Chinese",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "qwen3-tts-flash");
        assert_eq!(json["input"]["text"], "你好 hello");
        assert_eq!(json["input"]["voice"], "Jennifer");
        assert_eq!(json["input"]["language_type"], "Chinese");
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let parsed: GenerationResponse = serde_json::from_str(r#"{"output":{}}"#).unwrap();
        assert!(parsed.output.unwrap().audio.is_none());

        let parsed: GenerationResponse = serde_json::from_str(
            r#"{"output":{"audio":{"url":"https://example.com/a.wav","id":"x"}},"usage":{}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.output.unwrap().audio.unwrap().url.as_deref(),
            Some("https://example.com/a.wav")
        );
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = DashScopeClient::new(DashScopeConfig::default()).unwrap();
        assert!(!client.has_api_key());

        let result = client.synthesize("hello", "Jennifer").await;
        assert!(matches!(result, Err(TtsError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_blank_api_key_counts_as_missing() {
        let config = DashScopeConfig {
            api_key: Some("   ".to_string()),
            ..DashScopeConfig::default()
        };
        let client = DashScopeClient::new(config).unwrap();

        let result = client.synthesize("hello", "Jennifer").await;
        assert!(matches!(result, Err(TtsError::MissingApiKey)));
    }

    #[test]
    fn test_config_reflects_construction() {
        let config = DashScopeConfig {
            model: "qwen-tts".to_string(),
            timeout: Duration::from_secs(7),
            ..DashScopeConfig::default()
        };
        let client = DashScopeClient::new(config).unwrap();

        assert_eq!(client.config().model, "qwen-tts");
        assert_eq!(client.config().timeout, Duration::from_secs(7));
        assert_eq!(client.config().language_type, "Chinese");
    }
}

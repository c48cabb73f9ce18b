use axum::{
    extract::{Query, State},
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::chunking::Thresholds;
use crate::config::{constants::DEBUG_SAMPLE_TEXT, AppConfig};
use crate::error::{Result, TtsError};
use crate::logging::{access_log_middleware, request_id_middleware, SlowRequestThreshold};
use crate::models::{HealthResponse, SegmentsQuery, SegmentsResponse, TTSRequest};
use crate::provider::SpeechSynthesizer;
use crate::services::synthesize_segments_until;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub thresholds: Thresholds,
    pub default_voice: String,
    pub max_text_length: usize,
    pub request_timeout: Duration,
    /// Longest a single provider call may take
    pub provider_timeout: Duration,
    pub slow_request_threshold: Option<Duration>,
}

impl AppState {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, config: &AppConfig) -> Self {
        Self {
            synthesizer,
            thresholds: config.thresholds,
            default_voice: config.default_voice.clone(),
            max_text_length: config.max_text_length,
            request_timeout: config.request_timeout,
            provider_timeout: config.dashscope.timeout,
            slow_request_threshold: None,
        }
    }

    pub fn with_slow_request_threshold(mut self, threshold: Option<Duration>) -> Self {
        self.slow_request_threshold = threshold;
        self
    }

    /// Outer cutoff for a whole request.
    ///
    /// The segment deadline is `request_timeout`, checked between segments, so the
    /// outer layer leaves room for the one provider call still in flight.
    pub fn layer_timeout(&self) -> Duration {
        self.request_timeout + self.provider_timeout
    }

    fn check_length(&self, text: &str) -> Result<()> {
        let length = text.chars().count();
        if length > self.max_text_length {
            return Err(TtsError::TextTooLong {
                length,
                max: self.max_text_length,
            });
        }
        Ok(())
    }
}

/// Synthesize the whole text with one provider call and return raw audio
async fn generate_tts(
    State(state): State<AppState>,
    Json(req): Json<TTSRequest>,
) -> Result<Response> {
    let text = match req.text()? {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(TtsError::EmptyText),
    };
    state.check_length(text)?;

    let voice = req.voice_or(&state.default_voice);

    tracing::debug!(
        "TTS request - text_len={}, voice='{}'",
        text.chars().count(),
        voice
    );

    let audio = state.synthesizer.synthesize(text, voice).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}

/// Segment the text and return every segment's audio, in order
async fn generate_tts_segments(
    State(state): State<AppState>,
    Query(query): Query<SegmentsQuery>,
    Json(req): Json<TTSRequest>,
) -> Result<Json<SegmentsResponse>> {
    let text = match req.text()? {
        Some(text) if !query.use_debug_sample() => text,
        _ => DEBUG_SAMPLE_TEXT,
    };

    if text.trim().is_empty() {
        return Err(TtsError::EmptyText);
    }
    state.check_length(text)?;

    let voice = req.voice_or(&state.default_voice);

    tracing::debug!(
        "Segmented TTS request - text_len={}, voice='{}', debug_sample={}",
        text.chars().count(),
        voice,
        query.use_debug_sample()
    );

    let deadline = Instant::now() + state.request_timeout;
    let speech = synthesize_segments_until(
        text,
        voice,
        &state.thresholds,
        state.synthesizer.as_ref(),
        Some(deadline),
    )
    .await?;

    Ok(Json(SegmentsResponse::from(speech)))
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn create_router(state: AppState) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let slow_threshold = SlowRequestThreshold(state.slow_request_threshold);
    let layer_timeout = state.layer_timeout();

    Router::new()
        .route("/tts", post(generate_tts))
        .route("/tts/segments", post(generate_tts_segments))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TimeoutLayer::new(layer_timeout))
        .layer(middleware::from_fn_with_state(
            slow_threshold,
            access_log_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

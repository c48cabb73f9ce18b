use std::env;
use std::time::Duration;

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Custom log directory path (overrides auto-detection)
    pub custom_log_dir: Option<String>,

    /// Filter for console output (default: "segment_tts_server=info")
    pub console_log_level: String,

    /// Filter for the application log file (default: "debug")
    pub file_log_level: String,

    /// Write access/application logs to disk (default: true)
    pub file_logging_enabled: bool,

    /// Log slow requests over threshold (default: true)
    pub log_slow_requests: bool,

    /// Slow request threshold in milliseconds (default: 5000)
    pub slow_request_threshold_ms: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            custom_log_dir: None,
            console_log_level: "segment_tts_server=info".to_string(),
            file_log_level: "debug".to_string(),
            file_logging_enabled: true,
            log_slow_requests: true,
            slow_request_threshold_ms: 5000,
        }
    }
}

impl LogConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults
    pub fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = get("SEGMENT_TTS_LOG_DIR") {
            config.custom_log_dir = Some(dir);
        }

        if let Some(level) = get("RUST_LOG") {
            config.console_log_level = level;
        }

        if let Some(level) = get("SEGMENT_TTS_FILE_LOG_LEVEL") {
            config.file_log_level = level;
        }

        if let Some(val) = get("LOG_FILES_ENABLED") {
            config.file_logging_enabled = val.to_lowercase() == "true";
        }

        if let Some(val) = get("LOG_SLOW_REQUESTS") {
            config.log_slow_requests = val.to_lowercase() == "true";
        }

        if let Some(threshold) = get("LOG_SLOW_REQUEST_THRESHOLD_MS").and_then(|v| v.parse().ok()) {
            config.slow_request_threshold_ms = threshold;
        }

        config
    }

    /// Threshold above which a request is reported as slow, if enabled
    pub fn slow_request_threshold(&self) -> Option<Duration> {
        self.log_slow_requests
            .then(|| Duration::from_millis(self.slow_request_threshold_ms))
    }
}

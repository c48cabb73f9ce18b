/// Maximum allowed text length for TTS requests (in characters)
///
/// Requests exceeding this limit are rejected before any provider call.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Hard ceiling on segment length (in characters)
///
/// DashScope rejects inputs outside `[0, 600]`; 400 leaves a wide margin.
pub const MAX_SEGMENT_LENGTH: usize = 400;

/// Length at which the segmenter starts looking for a punctuation break
pub const SAFE_SEGMENT_LENGTH: usize = 380;

/// How far before the safe length the break search may reach back
pub const BREAK_SEARCH_LOOKBACK: usize = 50;

pub const DEFAULT_VOICE: &str = "Jennifer";

pub const DASHSCOPE_API_URL: &str =
    "https://dashscope-intl.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";

pub const DASHSCOPE_MODEL: &str = "qwen3-tts-flash";

/// Base language sent with every request; the model handles embedded English on its own
pub const DASHSCOPE_LANGUAGE_TYPE: &str = "Chinese";

/// Used by `/tts/segments` when `debugSample` is set or no text was sent
pub const DEBUG_SAMPLE_TEXT: &str =
    "这是一个TTS测试 test. This is a mixed-language test for TTS system.";

/// Longest provider error body excerpt carried into error messages
pub const PROVIDER_ERROR_SNIPPET_LENGTH: usize = 300;

pub mod pipeline;

pub use pipeline::{synthesize_segments, synthesize_segments_until, SegmentedSpeech, SynthesisResult};

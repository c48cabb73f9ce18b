pub mod requests;
pub mod responses;

pub use requests::{SegmentsQuery, TTSRequest};
pub use responses::{HealthResponse, SegmentAudio, SegmentsResponse};

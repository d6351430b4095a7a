// Audio extraction - engine abstraction, pipeline, and result shaping

pub mod engine;
pub mod errors;
pub mod ffmpeg;
pub mod models;
pub mod orchestrator;
pub mod resolve;
pub mod ytdlp;

pub use engine::MediaEngine;
pub use errors::ExtractError;
pub use ffmpeg::FfmpegTranscoder;
pub use models::{ExtractOptions, ExtractionOutcome, MediaMetadata, DEFAULT_OUTPUT_DIR};
pub use orchestrator::Extractor;
pub use ytdlp::YtDlpEngine;

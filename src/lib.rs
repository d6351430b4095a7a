pub mod extractor;

pub use extractor::{
    ExtractError, ExtractOptions, ExtractionOutcome, Extractor, FfmpegTranscoder, MediaEngine,
    MediaMetadata, YtDlpEngine, DEFAULT_OUTPUT_DIR,
};

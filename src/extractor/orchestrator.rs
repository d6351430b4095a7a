// Extraction pipeline
//
// One catch boundary: everything below `extract` raises freely, and any
// failure surfaces as the `Failed` outcome with the original message. No
// retries, no cleanup of files already written.

use std::io;
use std::path::Path;

use tracing::{info, warn};

use super::engine::MediaEngine;
use super::errors::ExtractError;
use super::ffmpeg::FfmpegTranscoder;
use super::models::{ExtractOptions, ExtractionOutcome, MediaMetadata, FALLBACK_TITLE};
use super::resolve::{expected_audio_path, resolve_audio_file};
use super::ytdlp::YtDlpEngine;

pub struct Extractor {
    engine: Box<dyn MediaEngine>,
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_engine(Box::new(YtDlpEngine::new()), options)
    }

    pub fn with_engine(engine: Box<dyn MediaEngine>, options: ExtractOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the audio track of `url` into the output directory.
    ///
    /// Never returns an error: failures become `ExtractionOutcome::Failed`.
    pub async fn extract(&self, url: &str) -> ExtractionOutcome {
        match self.try_extract(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(engine = self.engine.name(), "extraction failed: {}", e);
                ExtractionOutcome::failed(e.to_string())
            }
        }
    }

    async fn try_extract(&self, url: &str) -> Result<ExtractionOutcome, ExtractError> {
        if !self.engine.is_available() {
            return Err(ExtractError::ToolNotFound(format!(
                "{} binary not found",
                self.engine.name()
            )));
        }

        std::fs::create_dir_all(&self.options.output_dir)?;

        let meta = self.engine.probe(url, &self.options).await?;
        info!(
            engine = self.engine.name(),
            title = %meta.title,
            duration = meta.duration,
            "probe ok"
        );

        let reported = self.engine.download(url, &self.options).await?;

        match resolve_audio_file(&self.options.output_dir, &meta.title, reported)? {
            Some(audio_file) => {
                info!(path = %audio_file.display(), "extracted");
                Ok(ExtractionOutcome::Extracted {
                    audio_file,
                    title: meta.title,
                    duration: meta.duration,
                })
            }
            None => {
                warn!(
                    dir = %self.options.output_dir.display(),
                    title = %meta.title,
                    "download finished but no output file matched"
                );
                Ok(ExtractionOutcome::Unresolved {
                    title: meta.title,
                    duration: meta.duration,
                })
            }
        }
    }

    /// Probe metadata only; no download side effect.
    pub async fn probe(&self, url: &str) -> Result<MediaMetadata, ExtractError> {
        std::fs::create_dir_all(&self.options.output_dir)?;
        self.engine.probe(url, &self.options).await
    }

    /// Extract the audio track of a video file already on disk.
    pub async fn extract_from_file(&self, input: &Path) -> ExtractionOutcome {
        match self.try_extract_from_file(input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(input = %input.display(), "local extraction failed: {}", e);
                ExtractionOutcome::failed(e.to_string())
            }
        }
    }

    async fn try_extract_from_file(&self, input: &Path) -> Result<ExtractionOutcome, ExtractError> {
        if !input.is_file() {
            return Err(ExtractError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such video file: {}", input.display()),
            )));
        }

        std::fs::create_dir_all(&self.options.output_dir)?;

        let title = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let audio_file = expected_audio_path(&self.options.output_dir, &title);

        let transcoder = FfmpegTranscoder::new();
        if !transcoder.is_available() {
            return Err(ExtractError::ToolNotFound(
                "ffmpeg binary not found".to_string(),
            ));
        }
        transcoder.extract_audio(input, &audio_file).await?;

        info!(path = %audio_file.display(), "extracted from local file");
        Ok(ExtractionOutcome::Extracted {
            audio_file,
            title,
            // local files are not probed; duration is unknown
            duration: 0,
        })
    }
}

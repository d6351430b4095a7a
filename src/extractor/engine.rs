// Media engine trait definition

use std::path::PathBuf;

use async_trait::async_trait;

use super::errors::ExtractError;
use super::models::{ExtractOptions, MediaMetadata};

/// Trait for media engine implementations
///
/// `probe` must not download anything; `download` writes the transcoded
/// file(s) into `options.output_dir` as a side effect and may return the
/// final path when the engine reports one.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Name of the engine (for logging)
    fn name(&self) -> &'static str;

    /// Check if the engine binary is usable on this system
    fn is_available(&self) -> bool;

    /// Fetch metadata for a source without downloading it
    async fn probe(&self, url: &str, options: &ExtractOptions)
        -> Result<MediaMetadata, ExtractError>;

    /// Download and transcode; returns the engine-reported output path, if any
    async fn download(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<Option<PathBuf>, ExtractError>;
}

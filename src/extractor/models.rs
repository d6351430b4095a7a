// Common data models for the extractor

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "./public/audio";

/// Title used when the engine reports none
pub const FALLBACK_TITLE: &str = "audio";

/// Media metadata reported by a probe (no download side effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub id: String,
    pub title: String,
    pub uploader: String,
    /// Whole seconds, 0 when the engine does not report one
    pub duration: u64,
    pub thumbnail: String,
}

/// Per-call engine configuration
///
/// Constructed once per invocation and passed by reference into both engine
/// operations; never shared or mutated after construction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory the transcoded file lands in
    pub output_dir: PathBuf,
    /// Target audio container/codec
    pub audio_format: String,
    /// Target quality, kbps-equivalent
    pub audio_quality: String,
    /// Optional proxy URL handed to the engine
    pub proxy: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            proxy: None,
        }
    }
}

impl ExtractOptions {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Filename template handed to the engine: title as base name, engine
    /// substitutes the extension.
    pub fn output_template(&self) -> String {
        "%(title)s.%(ext)s".to_string()
    }
}

/// Outcome of one extraction
///
/// A resolution miss is a distinct variant, not a null path buried inside a
/// success record: callers have to decide what "ran, but no file found" means
/// for them. The wire format stays compatible with the original tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Downloaded, transcoded, and resolved on disk
    Extracted {
        audio_file: PathBuf,
        title: String,
        duration: u64,
    },
    /// Download completed but no matching file was found in the output dir
    Unresolved { title: String, duration: u64 },
    /// Probe, download, or filesystem step failed
    Failed { error: String },
}

impl ExtractionOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }

    pub fn audio_file(&self) -> Option<&Path> {
        match self {
            Self::Extracted { audio_file, .. } => Some(audio_file),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Wire record printed on stdout.
    ///
    /// `Unresolved` keeps the legacy shape: `success` true, explicit null
    /// `audio_file`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Extracted {
                audio_file,
                title,
                duration,
            } => json!({
                "success": true,
                "audio_file": audio_file.to_string_lossy(),
                "title": title,
                "duration": duration,
            }),
            Self::Unresolved { title, duration } => json!({
                "success": true,
                "audio_file": Value::Null,
                "title": title,
                "duration": duration,
            }),
            Self::Failed { error } => json!({
                "success": false,
                "error": error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_wire_shape() {
        let outcome = ExtractionOutcome::Extracted {
            audio_file: PathBuf::from("./public/audio/song.mp3"),
            title: "song".to_string(),
            duration: 212,
        };
        let value = outcome.to_json();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["audio_file"], json!("./public/audio/song.mp3"));
        assert_eq!(value["title"], json!("song"));
        assert_eq!(value["duration"], json!(212));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_unresolved_wire_shape_has_explicit_null() {
        let outcome = ExtractionOutcome::Unresolved {
            title: "song".to_string(),
            duration: 0,
        };
        let value = outcome.to_json();
        assert_eq!(value["success"], json!(true));
        assert!(value["audio_file"].is_null());
        // the key must be present, not merely absent
        assert!(value.as_object().unwrap().contains_key("audio_file"));
    }

    #[test]
    fn test_failed_wire_shape() {
        let outcome = ExtractionOutcome::failed("no network");
        let value = outcome.to_json();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!("no network"));
        assert!(value.get("audio_file").is_none());
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("./public/audio"));
        assert_eq!(options.audio_format, "mp3");
        assert_eq!(options.audio_quality, "192");
        assert!(options.proxy.is_none());
    }
}

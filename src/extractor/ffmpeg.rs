// ffmpeg transcoder - extracts audio from a video file already on disk
//
// No probe step: the input is local, the title is the file stem, and ffmpeg
// is pointed straight at the deterministic output path.

use std::path::Path;
use std::process::Command as StdCommand;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use super::errors::ExtractError;

/// Local-file transcoder backed by the ffmpeg binary
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: Self::find_ffmpeg(),
        }
    }

    fn find_ffmpeg() -> String {
        let common_paths = [
            "/usr/local/bin/ffmpeg",
            "/usr/bin/ffmpeg",
            "/opt/homebrew/bin/ffmpeg",
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return path.to_string();
            }
        }

        if let Ok(output) = StdCommand::new("which").arg("ffmpeg").output() {
            if output.status.success() {
                if let Ok(path) = String::from_utf8(output.stdout) {
                    let trimmed = path.trim();
                    if !trimmed.is_empty() {
                        return trimmed.to_string();
                    }
                }
            }
        }

        "ffmpeg".to_string()
    }

    pub fn is_available(&self) -> bool {
        match StdCommand::new(&self.ffmpeg_path).arg("-version").output() {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    /// Strip the video stream and re-encode the audio track as MP3
    pub async fn extract_audio(&self, input: &Path, output: &Path) -> Result<(), ExtractError> {
        let args = [
            "-i",
            &input.to_string_lossy(),
            "-vn",
            "-acodec",
            "mp3",
            "-ab",
            "192k",
            "-ar",
            "44100",
            "-y",
            &output.to_string_lossy(),
        ]
        .map(String::from);

        debug!("{} {}", self.ffmpeg_path, args.join(" "));

        let result = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExtractError::ToolNotFound(format!("ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!("ffmpeg failed: {}", stderr.trim());
            return Err(ExtractError::ExecutionError(format!(
                "ffmpeg failed to extract audio: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

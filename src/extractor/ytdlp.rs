// yt-dlp engine - drives the native `yt-dlp` binary
//
// Probe uses `--dump-json` (no download side effect). Download selects the
// best audio-only stream with a combined-stream fallback and post-processes
// to MP3. Playlist expansion is always off: a URL pointing into a playlist
// still yields only the linked item.

use std::path::PathBuf;
use std::process::Command as StdCommand;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::engine::MediaEngine;
use super::errors::ExtractError;
use super::models::{ExtractOptions, MediaMetadata, FALLBACK_TITLE};

/// Media engine backed by the yt-dlp binary
pub struct YtDlpEngine {
    ytdlp_path: String,
}

impl YtDlpEngine {
    pub fn new() -> Self {
        Self {
            ytdlp_path: Self::find_ytdlp(),
        }
    }

    /// Find the yt-dlp binary in common install locations, then PATH
    fn find_ytdlp() -> String {
        let common_paths = [
            "/usr/local/bin/yt-dlp",
            "/usr/bin/yt-dlp",
            "/opt/homebrew/bin/yt-dlp",
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return path.to_string();
            }
        }

        if let Ok(output) = StdCommand::new("which").arg("yt-dlp").output() {
            if output.status.success() {
                if let Ok(path) = String::from_utf8(output.stdout) {
                    let trimmed = path.trim();
                    if !trimmed.is_empty() {
                        return trimmed.to_string();
                    }
                }
            }
        }

        // Last resort: hope it's in PATH
        "yt-dlp".to_string()
    }

    /// Flags shared by every invocation: single item only, no console chatter
    fn base_args(options: &ExtractOptions) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
        ];

        if let Some(proxy) = &options.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }

    async fn run(&self, args: Vec<String>) -> Result<std::process::Output, ExtractError> {
        debug!(engine = self.name(), "{} {}", self.ytdlp_path, args.join(" "));

        Command::new(&self.ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExtractError::ToolNotFound(format!("yt-dlp: {}", e)))
    }

    fn parse_metadata(stdout: &[u8]) -> Result<MediaMetadata, ExtractError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| ExtractError::ParseError(format!("Invalid JSON from yt-dlp: {}", e)))?;

        Ok(MediaMetadata {
            id: json["id"].as_str().unwrap_or("").to_string(),
            title: json["title"].as_str().unwrap_or(FALLBACK_TITLE).to_string(),
            uploader: json["uploader"].as_str().unwrap_or("").to_string(),
            duration: json["duration"].as_f64().unwrap_or(0.0) as u64,
            thumbnail: json["thumbnail"].as_str().unwrap_or("").to_string(),
        })
    }
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaEngine for YtDlpEngine {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn is_available(&self) -> bool {
        match StdCommand::new(&self.ytdlp_path).arg("--version").output() {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    async fn probe(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<MediaMetadata, ExtractError> {
        let mut args = vec!["--dump-json".to_string()];
        args.extend(Self::base_args(options));
        args.push(url.to_string());

        let output = self.run(args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(engine = self.name(), "probe failed: {}", stderr.trim());
            return Err(stderr.to_string().into());
        }

        Self::parse_metadata(&output.stdout)
    }

    async fn download(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<Option<PathBuf>, ExtractError> {
        let mut args = vec![
            // best audio-only stream, else best combined stream
            "-f".to_string(),
            "bestaudio/best".to_string(),
            "-P".to_string(),
            options.output_dir.to_string_lossy().into_owned(),
            "-o".to_string(),
            options.output_template(),
            "-x".to_string(),
            "--audio-format".to_string(),
            options.audio_format.clone(),
            "--audio-quality".to_string(),
            options.audio_quality.clone(),
            // have the engine report the post-processed path on stdout
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-simulate".to_string(),
        ];
        args.extend(Self::base_args(options));
        args.push(url.to_string());

        let output = self.run(args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(engine = self.name(), "download failed: {}", stderr.trim());
            return Err(stderr.to_string().into());
        }

        // One path per downloaded item; single-item mode means at most one line
        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(PathBuf::from);

        if let Some(path) = &reported {
            info!(engine = self.name(), path = %path.display(), "engine reported output path");
        }

        Ok(reported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_fallbacks() {
        let meta = YtDlpEngine::parse_metadata(br#"{"id": "abc123"}"#).unwrap();
        assert_eq!(meta.title, "audio");
        assert_eq!(meta.duration, 0);
        assert_eq!(meta.id, "abc123");
    }

    #[test]
    fn test_metadata_full_document() {
        let doc = br#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "uploader": "Rick Astley",
            "duration": 212.4,
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq720.jpg"
        }"#;
        let meta = YtDlpEngine::parse_metadata(doc).unwrap();
        assert_eq!(meta.title, "Never Gonna Give You Up");
        assert_eq!(meta.uploader, "Rick Astley");
        assert_eq!(meta.duration, 212);
    }

    #[test]
    fn test_metadata_rejects_garbage() {
        let err = YtDlpEngine::parse_metadata(b"ERROR: not json").unwrap_err();
        assert!(matches!(err, ExtractError::ParseError(_)));
    }

    #[test]
    fn test_base_args_suppress_chatter_and_playlists() {
        let args = YtDlpEngine::base_args(&ExtractOptions::default());
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--quiet".to_string()));
        assert!(args.contains(&"--no-warnings".to_string()));
        assert!(!args.contains(&"--proxy".to_string()));
    }

    #[test]
    fn test_base_args_carry_proxy() {
        let options =
            ExtractOptions::default().with_proxy(Some("socks5://127.0.0.1:1080".to_string()));
        let args = YtDlpEngine::base_args(&options);
        let pos = args.iter().position(|a| a == "--proxy").unwrap();
        assert_eq!(args[pos + 1], "socks5://127.0.0.1:1080");
    }
}

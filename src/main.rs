use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use audio_extractor::{ExtractOptions, Extractor};

/// Extract the audio track of an online video into a local MP3 file,
/// printing one line of JSON describing the outcome.
#[derive(Debug, Parser)]
#[command(name = "audio-extractor", version)]
struct Cli {
    /// Source URL (or a local video file with --local)
    source: String,

    /// Directory the MP3 lands in
    #[arg(
        short,
        long,
        default_value = audio_extractor::DEFAULT_OUTPUT_DIR,
        env = "AUDIO_EXTRACTOR_OUTPUT_DIR"
    )]
    output_dir: PathBuf,

    /// Print source metadata only; download nothing
    #[arg(long)]
    probe_only: bool,

    /// Treat SOURCE as a video file on disk and transcode it with ffmpeg
    #[arg(long)]
    local: bool,

    /// Proxy URL handed to the media engine
    #[arg(long, env = "AUDIO_EXTRACTOR_PROXY")]
    proxy: Option<String>,
}

/// Argument errors get the same JSON shape as every other failure, on stdout,
/// with a non-zero exit. Everything after successful parsing exits 0 and
/// reports through the payload alone.
fn parse_args() -> Result<Cli, ExitCode> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            Err(ExitCode::SUCCESS)
        }
        Err(_) => {
            let usage = json!({
                "success": false,
                "error": "Usage: audio-extractor <url>",
            });
            println!("{}", usage);
            Err(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries exactly one JSON line; all logging goes to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    let options = ExtractOptions::default()
        .with_output_dir(cli.output_dir)
        .with_proxy(cli.proxy);
    let extractor = Extractor::new(options);

    let line = if cli.probe_only {
        match extractor.probe(&cli.source).await {
            Ok(meta) => serde_json::to_string(&meta).expect("metadata serializes"),
            Err(e) => json!({ "success": false, "error": e.to_string() }).to_string(),
        }
    } else if cli.local {
        extractor
            .extract_from_file(Path::new(&cli.source))
            .await
            .to_json()
            .to_string()
    } else {
        extractor.extract(&cli.source).await.to_json().to_string()
    };

    println!("{}", line);
    ExitCode::SUCCESS
}

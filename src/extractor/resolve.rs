// Output-file resolution
//
// The engine picks the final filename from dynamic title text, so the exact
// output path is not known up front. Resolution precedence:
//
// 1. Path the engine itself reported, when it exists on disk
// 2. Independently computed deterministic path: <dir>/<sanitized title>.mp3
// 3. Scan pass one: first `.mp3` entry whose name contains the sanitized title
// 4. Scan pass two: first `.mp3` entry at all (directory listing order)
//
// Passes 3 and 4 reproduce the legacy scan-and-guess behavior, kept as an
// explicit fallback for engines that rename beyond the template (character
// substitutions, dedup suffixes). A miss across all four is a distinct
// `Unresolved` outcome, never an error.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Replace path separators that cannot appear in a filename on common
/// filesystems, matching how the engine writes the title to disk.
pub fn sanitize_title(title: &str) -> String {
    title.replace(['/', '\\'], "_")
}

/// Deterministic path the engine is expected to produce for `title`.
pub fn expected_audio_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(format!("{}.mp3", sanitize_title(title)))
}

/// Resolve the transcoded file for `title` inside `dir`.
pub fn resolve_audio_file(
    dir: &Path,
    title: &str,
    engine_reported: Option<PathBuf>,
) -> io::Result<Option<PathBuf>> {
    if let Some(path) = engine_reported {
        if path.is_file() {
            debug!(path = %path.display(), "resolved from engine-reported path");
            return Ok(Some(path));
        }
        debug!(path = %path.display(), "engine-reported path missing on disk");
    }

    let expected = expected_audio_path(dir, title);
    if expected.is_file() {
        debug!(path = %expected.display(), "resolved from deterministic path");
        return Ok(Some(expected));
    }

    let needle = sanitize_title(title);

    // Pass one: .mp3 entries carrying the sanitized title
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".mp3") && name.contains(&needle) {
            debug!(file = %name, "resolved from title-match scan");
            return Ok(Some(dir.join(name)));
        }
    }

    // Pass two: any .mp3 entry, listing order
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".mp3") {
            debug!(file = %name, "resolved from any-mp3 fallback scan");
            return Ok(Some(dir.join(name)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_replaces_both_separators() {
        assert_eq!(sanitize_title("AC/DC \\ Live"), "AC_DC _ Live");
        assert_eq!(sanitize_title("plain title"), "plain title");
    }

    #[test]
    fn test_exact_title_match_wins() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("My Song.mp3")).unwrap();
        File::create(dir.path().join("other.mp3")).unwrap();

        let found = resolve_audio_file(dir.path(), "My Song", None)
            .unwrap()
            .unwrap();
        assert_eq!(found, dir.path().join("My Song.mp3"));
    }

    #[test]
    fn test_title_substring_match() {
        let dir = tempdir().unwrap();
        // engine appended a dedup suffix, deterministic path misses
        File::create(dir.path().join("My Song (1).mp3")).unwrap();

        let found = resolve_audio_file(dir.path(), "My Song", None)
            .unwrap()
            .unwrap();
        assert_eq!(found, dir.path().join("My Song (1).mp3"));
    }

    #[test]
    fn test_sanitized_title_matches_underscored_file() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("AC_DC.mp3")).unwrap();

        let found = resolve_audio_file(dir.path(), "AC/DC", None)
            .unwrap()
            .unwrap();
        assert_eq!(found, dir.path().join("AC_DC.mp3"));
    }

    #[test]
    fn test_fallback_to_any_mp3() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("unrelated.mp3")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let found = resolve_audio_file(dir.path(), "My Song", None)
            .unwrap()
            .unwrap();
        assert_eq!(found, dir.path().join("unrelated.mp3"));
    }

    #[test]
    fn test_non_mp3_never_matches() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("My Song.webm")).unwrap();

        assert!(resolve_audio_file(dir.path(), "My Song", None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_empty_dir_is_a_miss_not_an_error() {
        let dir = tempdir().unwrap();
        assert!(resolve_audio_file(dir.path(), "My Song", None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_engine_reported_path_preferred() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("renamed by engine.mp3")).unwrap();
        File::create(dir.path().join("My Song.mp3")).unwrap();

        let reported = dir.path().join("renamed by engine.mp3");
        let found = resolve_audio_file(dir.path(), "My Song", Some(reported.clone()))
            .unwrap()
            .unwrap();
        assert_eq!(found, reported);
    }

    #[test]
    fn test_stale_engine_report_falls_through() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("My Song.mp3")).unwrap();

        let stale = dir.path().join("gone.mp3");
        let found = resolve_audio_file(dir.path(), "My Song", Some(stale))
            .unwrap()
            .unwrap();
        assert_eq!(found, dir.path().join("My Song.mp3"));
    }
}

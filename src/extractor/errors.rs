// Error types for media engines

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Network timeout while talking to the source
    #[error("Network timeout: the source is not responding")]
    NetworkTimeout,

    /// The source refused or throttled the request (429, bot detection, etc.)
    #[error("The source is blocking or throttling requests: {0}")]
    Blocked(String),

    /// yt-dlp or ffmpeg not found on this system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid or unsupported source URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the engine's JSON output
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Child process could not be run or exited abnormally
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// Filesystem failure (output directory, scan)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything the classifier could not place
    #[error("{0}")]
    Unknown(String),
}

// Classify raw engine stderr by message content so error kinds stay
// distinguishable even though the wire format carries a single string.
impl From<String> for ExtractError {
    fn from(s: String) -> Self {
        if s.contains("timeout") || s.contains("timed out") {
            return Self::NetworkTimeout;
        }

        if s.contains("429") || s.contains("bot") || s.contains("blocked") {
            return Self::Blocked(s);
        }

        if s.contains("not found") || s.contains("No such file") || s.contains("command not found") {
            return Self::ToolNotFound(s);
        }

        if s.contains("Invalid URL") || s.contains("Unsupported URL") || s.contains("is not a valid URL") {
            return Self::InvalidUrl(s);
        }

        if s.contains("JSON") || s.contains("parse") {
            return Self::ParseError(s);
        }

        Self::Unknown(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_detection() {
        let err = ExtractError::from("ERROR: Connection timed out".to_string());
        assert!(matches!(err, ExtractError::NetworkTimeout));
    }

    #[test]
    fn test_blocked_detection() {
        let err = ExtractError::from("HTTP Error 429: Too Many Requests".to_string());
        assert!(matches!(err, ExtractError::Blocked(_)));
    }

    #[test]
    fn test_tool_not_found_detection() {
        let err = ExtractError::from("yt-dlp: command not found".to_string());
        assert!(matches!(err, ExtractError::ToolNotFound(_)));
    }

    #[test]
    fn test_invalid_url_detection() {
        let err = ExtractError::from("ERROR: Unsupported URL: ftp://nope".to_string());
        assert!(matches!(err, ExtractError::InvalidUrl(_)));
    }

    #[test]
    fn test_unknown_keeps_message() {
        let err = ExtractError::from("something exotic happened".to_string());
        assert_eq!(err.to_string(), "something exotic happened");
    }

    #[test]
    fn test_messages_are_non_empty() {
        let errors = [
            ExtractError::NetworkTimeout,
            ExtractError::ToolNotFound("yt-dlp".to_string()),
            ExtractError::InvalidUrl("http://".to_string()),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}

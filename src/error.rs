//! Error types for contact sheet generation.

use std::path::PathBuf;

/// Errors that can occur while building a contact sheet.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The generation service returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The generation service returned a body that could not be parsed.
    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    /// Failed to decode a base64 image payload.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// The image tool could not be run or exited with an error.
    #[error("compositor failed: {0}")]
    Compositor(String),

    /// A prompt file fallback could not be read.
    #[error("failed to read prompt file {path}: {source}")]
    PromptFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The service reported no models to compare.
    #[error("no models to compare: the service returned an empty model list")]
    NoModels,

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error (e.g., saving an image).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for contact sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SheetError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error: 500 - Internal Server Error");

        let err = SheetError::MalformedResponse("expected value at line 1".into());
        assert_eq!(
            err.to_string(),
            "malformed service response: expected value at line 1"
        );

        let err = SheetError::Compositor("convert exited with 1".into());
        assert_eq!(err.to_string(), "compositor failed: convert exited with 1");
    }

    #[test]
    fn test_prompt_file_display_includes_path() {
        let err = SheetError::PromptFile {
            path: PathBuf::from("prompt.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("prompt.txt"));
    }
}

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or rendering an image
#[derive(Error, Debug)]
pub enum PixcatError {
    /// Malformed URL or an argument that cannot be used as given
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A loosely-typed value was supplied where an integer was expected
    #[error("'{field}' is expected to be an integer, got {found}")]
    TypeMismatch {
        field: &'static str,
        found: &'static str,
    },

    /// Missing local file, or a remote resource that reported "not found"
    #[error("{0} not found")]
    FileNotFound(String),

    /// Failure reported by the image decoder, passed through unchanged
    #[error(transparent)]
    Decode(#[from] image::ImageError),

    /// Network error while fetching a remote image
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting into the render buffer failed
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    /// Playback was interrupted; the terminal has already been restored
    #[error("Interrupted")]
    Interrupted,
}

impl PixcatError {
    pub(crate) fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound(path.display().to_string())
    }
}

/// Type alias for Result with PixcatError
pub type Result<T> = std::result::Result<T, PixcatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_names_field() {
        let err = PixcatError::TypeMismatch {
            field: "height",
            found: "float",
        };
        assert_eq!(err.to_string(), "'height' is expected to be an integer, got float");
    }

    #[test]
    fn test_file_not_found_message() {
        let err = PixcatError::file_not_found(Path::new("images/cat.png"));
        assert_eq!(err.to_string(), "images/cat.png not found");
    }
}

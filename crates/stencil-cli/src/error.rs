// CLI error types

use stencil_generation::GenerationError;
use stencil_storage::StorageError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CliError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'stencil --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => {
                format!("File operation failed: {}", e)
            }
            CliError::Generation(GenerationError::MissingParameter(name)) => {
                format!(
                    "Missing required parameter '{}'.\n\nPass it with -p {}:<value>.",
                    name, name
                )
            }
            CliError::Generation(e) if e.is_configuration_error() => {
                format!(
                    "Template configuration error: {}\n\nCheck the template's directives and sidecar files.",
                    e
                )
            }
            CliError::Generation(e) => {
                format!("Generation failed: {}", e)
            }
            CliError::Storage(StorageError::ManifestNotFound(path)) => {
                format!(
                    "No stencil manifest at {}.\n\nRun 'stencil init <SOURCE>' in that directory first.",
                    path.display()
                )
            }
            CliError::Storage(e) => {
                format!("Template source error: {}", e)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_parameter_message() {
        let err: CliError = GenerationError::MissingParameter("name".to_string()).into();
        let message = err.user_message();
        assert!(message.contains("'name'"));
        assert!(message.contains("-p name:<value>"));
    }

    #[test]
    fn test_manifest_not_found_message() {
        let err: CliError = StorageError::ManifestNotFound(PathBuf::from("/tmp/app/.stencil")).into();
        assert!(err.user_message().contains("stencil init"));
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = CliError::invalid_argument("bad flag");
        assert!(err.user_message().starts_with("Invalid argument: bad flag"));
        assert!(err.technical_details().contains("InvalidArgument"));
    }
}

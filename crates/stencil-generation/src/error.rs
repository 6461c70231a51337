//! Error types for generation and merging

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the generation engine
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors that can occur while rendering, merging or writing a scaffold
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A directive embedded in a file carried a payload that is not a JSON object
    #[error("Invalid directive: could not parse option '{fragment}': {message}")]
    InvalidDirective {
        /// The offending payload
        fragment: String,
        /// Parser message
        message: String,
    },

    /// Options could not be resolved into a complete configuration
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A sidecar descriptor exists but could not be read as JSON
    #[error("Invalid descriptor {path}: {message}")]
    InvalidDescriptor {
        /// Descriptor path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Structured content (JSON, YAML) on either side of a merge is malformed
    #[error("Failed to parse {format} content: {message}")]
    StructuredParse {
        /// Format name
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// A helper script could not be registered
    #[error("Failed to load helper {path}: {message}")]
    HelperLoad {
        /// Helper script path
        path: PathBuf,
        /// Registration message
        message: String,
    },

    /// Template rendering error
    #[error("Render error: {0}")]
    RenderError(String),

    /// A required parameter was not supplied
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// The template root does not exist
    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    /// Failure while processing a specific node of the template tree
    #[error("{path}: {source}")]
    Node {
        /// Source path of the node
        path: PathBuf,
        /// Underlying error
        #[source]
        source: Box<GenerationError>,
    },

    /// Write failed
    #[error("Write failed for {path}: {source}")]
    WriteFailed {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    /// Attach the source path of the node being processed
    pub fn at(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Already located; keep the innermost path
            GenerationError::Node { .. } => self,
            other => GenerationError::Node {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Whether this error is a configuration error (malformed directive or options)
    pub fn is_configuration_error(&self) -> bool {
        match self {
            GenerationError::InvalidDirective { .. }
            | GenerationError::InvalidOptions(_)
            | GenerationError::InvalidDescriptor { .. } => true,
            GenerationError::Node { source, .. } => source.is_configuration_error(),
            _ => false,
        }
    }
}

impl From<handlebars::RenderError> for GenerationError {
    fn from(err: handlebars::RenderError) -> Self {
        GenerationError::RenderError(err.to_string())
    }
}

impl From<handlebars::TemplateError> for GenerationError {
    fn from(err: handlebars::TemplateError) -> Self {
        GenerationError::RenderError(err.to_string())
    }
}

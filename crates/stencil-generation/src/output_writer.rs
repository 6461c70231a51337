//! Output writer for generated files
//!
//! Reads destination content and writes merged results, creating parent
//! directories as needed. In dry-run mode nothing touches the disk.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{GenerationError, GenerationResult};
use crate::models::FileAction;

/// Configuration for output writing
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriterConfig {
    /// Whether to run in dry-run mode (preview only)
    pub dry_run: bool,
}

/// Reads and writes destination files
#[derive(Debug, Clone, Default)]
pub struct OutputWriter {
    config: OutputWriterConfig,
}

impl OutputWriter {
    /// Create a new output writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new output writer with custom configuration
    pub fn with_config(config: OutputWriterConfig) -> Self {
        Self { config }
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Current content of `path`, or an empty string when it does not exist
    pub async fn read_existing(&self, path: &Path) -> GenerationResult<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(GenerationError::IoError(e)),
        }
    }

    /// Write text content, terminated by a single newline
    pub async fn write_text(&self, path: &Path, content: &str) -> GenerationResult<FileAction> {
        let mut output = content.trim_end_matches(['\n', '\r']).to_string();
        if !output.is_empty() {
            output.push('\n');
        }
        self.write_bytes(path, output.as_bytes()).await?;
        Ok(FileAction::Written)
    }

    /// Copy raw content unchanged
    pub async fn copy_bytes(&self, path: &Path, content: &[u8]) -> GenerationResult<FileAction> {
        self.write_bytes(path, content).await?;
        Ok(FileAction::Copied)
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> GenerationResult<()> {
        if self.config.dry_run {
            debug!(path = %path.display(), bytes = content.len(), "Dry run, not writing");
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| GenerationError::WriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|source| GenerationError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parents_and_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c.txt");
        let writer = OutputWriter::new();

        let action = writer.write_text(&path, "hello\n\n").await.unwrap();

        assert_eq!(action, FileAction::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn test_read_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new();
        assert_eq!(writer.read_existing(&temp_dir.path().join("nope")).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/file.txt");
        let writer = OutputWriter::with_config(OutputWriterConfig { dry_run: true });

        writer.write_text(&path, "content").await.unwrap();
        writer.copy_bytes(&path, &[0xff, 0x00]).await.unwrap();

        assert!(writer.is_dry_run());
        assert!(!temp_dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_copy_bytes_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.bin");
        let bytes = [0x89, 0x50, 0x4e, 0x47, 0xff, 0x00];

        let action = OutputWriter::new().copy_bytes(&path, &bytes).await.unwrap();

        assert_eq!(action, FileAction::Copied);
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }
}

//! Template sources
//!
//! A template source copies a template to a local working folder and loads
//! its descriptor. Only local folders are supported.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde_json::Value;
use stencil_generation::{TemplateDescriptor, TemplateSourceInfo};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{IoOperation, StorageError, StorageResult};

/// Source kind recorded in manifests for local folders
pub const LOCAL_FOLDER_SOURCE: &str = "localFolder";

/// Paths never copied from a template folder
pub const DEFAULT_IGNORE_PATTERNS: [&str; 3] = [".git", "node_modules", "package-lock.json"];

/// A template copied to a working folder
#[derive(Debug)]
pub struct FetchedTemplate {
    /// Working copy of the template
    pub path: PathBuf,
    /// Descriptor loaded from the working copy
    pub descriptor: TemplateDescriptor,
    /// Where the template came from
    pub source: TemplateSourceInfo,
    // Keeps the temporary working copy alive
    _workspace: Option<TempDir>,
}

/// Something templates can be fetched from
pub trait TemplateSource {
    /// Copy the template identified by `source_key` and load its descriptor
    ///
    /// The copy goes to `output_dir`, or to a temporary folder that lives as
    /// long as the returned value.
    fn get_template(
        &self,
        source_key: &str,
        output_dir: Option<&Path>,
    ) -> StorageResult<FetchedTemplate>;
}

/// Template source backed by a local folder
#[derive(Debug, Clone)]
pub struct LocalFolderSource {
    ignore_patterns: Vec<String>,
    descriptor_file_name: String,
}

impl LocalFolderSource {
    /// Create a source with the default ignore patterns and descriptor name
    pub fn new() -> Self {
        Self {
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            descriptor_file_name: stencil_generation::GenerationOptions::default().descriptor_file_name,
        }
    }

    /// Replace the ignore patterns (gitignore syntax, relative to the template folder)
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Use another descriptor file name
    pub fn with_descriptor_file_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor_file_name = name.into();
        self
    }

    /// Whether `source_key` names an existing folder
    pub fn is_valid_source_key(source_key: &str) -> bool {
        Path::new(source_key).is_dir()
    }

    fn matcher(&self, root: &Path) -> Gitignore {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in &self.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                warn!(pattern = %pattern, "Invalid ignore pattern: {}", e);
            }
        }
        builder.build().unwrap_or_else(|e| {
            warn!("Failed to build ignore matcher: {}", e);
            Gitignore::empty()
        })
    }

    /// Copy `source` into `destination`, skipping ignored paths
    ///
    /// # Returns
    /// Number of files copied
    pub fn copy_filtered(&self, source: &Path, destination: &Path) -> StorageResult<usize> {
        let matcher = self.matcher(source);
        fs::create_dir_all(destination)
            .map_err(|e| StorageError::io_error(destination.to_path_buf(), IoOperation::CreateDir, e))?;

        let walker = WalkDir::new(source)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
                !matcher
                    .matched_path_or_any_parents(relative, entry.file_type().is_dir())
                    .is_ignore()
            });

        let mut copied = 0;
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| source.to_path_buf());
                StorageError::io_error(path, IoOperation::Read, e.into())
            })?;
            let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
            let target = destination.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| StorageError::io_error(target.clone(), IoOperation::CreateDir, e))?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| {
                        StorageError::io_error(parent.to_path_buf(), IoOperation::CreateDir, e)
                    })?;
                }
                fs::copy(entry.path(), &target)
                    .map_err(|e| StorageError::io_error(entry.path().to_path_buf(), IoOperation::Copy, e))?;
                copied += 1;
            }
        }

        debug!(from = %source.display(), to = %destination.display(), files = copied, "Copied template");
        Ok(copied)
    }

    /// Load the descriptor of the template at `template_root`
    pub fn load_descriptor(&self, template_root: &Path) -> StorageResult<TemplateDescriptor> {
        let path = template_root.join(&self.descriptor_file_name);
        if !path.is_file() {
            return Err(StorageError::DescriptorNotFound(path));
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| StorageError::io_error(path.clone(), IoOperation::Read, e))?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| StorageError::parse_error(path.clone(), "JSON", e.to_string()))?;

        for field in ["name", "version"] {
            if !value.get(field).map(Value::is_string).unwrap_or(false) {
                return Err(StorageError::invalid_descriptor(
                    path,
                    format!("missing string field `{}`", field),
                ));
            }
        }

        serde_json::from_value(value)
            .map_err(|e| StorageError::invalid_descriptor(path, e.to_string()))
    }
}

impl Default for LocalFolderSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSource for LocalFolderSource {
    fn get_template(
        &self,
        source_key: &str,
        output_dir: Option<&Path>,
    ) -> StorageResult<FetchedTemplate> {
        if !Self::is_valid_source_key(source_key) {
            return Err(StorageError::TemplateNotFound(source_key.to_string()));
        }
        let source = fs::canonicalize(source_key).map_err(|e| {
            StorageError::io_error(PathBuf::from(source_key), IoOperation::Read, e)
        })?;

        let (path, workspace) = match output_dir {
            Some(dir) => (dir.to_path_buf(), None),
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("stencil-")
                    .tempdir()
                    .map_err(|e| StorageError::io_error(std::env::temp_dir(), IoOperation::CreateDir, e))?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };

        self.copy_filtered(&source, &path)?;
        let descriptor = self.load_descriptor(&path)?;
        info!(template = %descriptor.name, version = %descriptor.version, "Fetched template");

        Ok(FetchedTemplate {
            path,
            descriptor,
            source: TemplateSourceInfo {
                name: LOCAL_FOLDER_SOURCE.to_string(),
                key: source.to_string_lossy().into_owned(),
            },
            _workspace: workspace,
        })
    }
}

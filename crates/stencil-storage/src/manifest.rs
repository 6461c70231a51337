//! Manifest store
//!
//! The manifest records which template (and which partials) generated a
//! target directory. It lives in the target as `<target>/<descriptor file>`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use stencil_generation::{PartialRecord, StencilManifest};
use tracing::{debug, info};

use crate::error::{IoOperation, StorageError, StorageResult};

/// Reads and writes manifests of generated targets
#[derive(Debug, Clone)]
pub struct ManifestStore {
    file_name: String,
}

impl ManifestStore {
    /// Create a store using the default descriptor file name
    pub fn new() -> Self {
        Self::with_file_name(stencil_generation::GenerationOptions::default().descriptor_file_name)
    }

    /// Create a store using `file_name` as the manifest file name
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Path of the manifest of `target`
    pub fn manifest_path(&self, target: &Path) -> PathBuf {
        target.join(&self.file_name)
    }

    /// Whether `target` has a manifest
    pub fn exists(&self, target: &Path) -> bool {
        self.manifest_path(target).is_file()
    }

    /// Load the manifest of `target`
    pub fn load(&self, target: &Path) -> StorageResult<StencilManifest> {
        let path = self.manifest_path(target);
        if !path.is_file() {
            return Err(StorageError::ManifestNotFound(path));
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| StorageError::io_error(path.clone(), IoOperation::Read, e))?;
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::parse_error(path, "JSON", e.to_string()))
    }

    /// Write the manifest of `target`, replacing any existing one
    pub fn save(&self, target: &Path, manifest: &StencilManifest) -> StorageResult<PathBuf> {
        let path = self.manifest_path(target);
        fs::create_dir_all(target)
            .map_err(|e| StorageError::io_error(target.to_path_buf(), IoOperation::CreateDir, e))?;

        let mut content = serde_json::to_string_pretty(manifest)
            .map_err(|e| StorageError::parse_error(path.clone(), "JSON", e.to_string()))?;
        content.push('\n');
        fs::write(&path, content)
            .map_err(|e| StorageError::io_error(path.clone(), IoOperation::Write, e))?;

        debug!(path = %path.display(), "Saved manifest");
        Ok(path)
    }

    /// Write the manifest of a freshly initialised `target`
    ///
    /// A manifest that already exists was produced by the template itself and
    /// is left untouched.
    ///
    /// # Returns
    /// Whether the manifest was written
    pub fn init(&self, target: &Path, manifest: &StencilManifest) -> StorageResult<bool> {
        if self.exists(target) {
            info!(target = %target.display(), "Manifest already present, keeping it");
            return Ok(false);
        }
        self.save(target, manifest)?;
        Ok(true)
    }

    /// Append a partial run to the manifest of `target`
    pub fn record_partial(
        &self,
        target: &Path,
        path: impl Into<String>,
        parameters: Map<String, Value>,
    ) -> StorageResult<StencilManifest> {
        let mut manifest = self.load(target)?;
        manifest.partials.push(PartialRecord {
            path: path.into(),
            parameters,
        });
        self.save(target, &manifest)?;
        Ok(manifest)
    }
}

impl Default for ManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

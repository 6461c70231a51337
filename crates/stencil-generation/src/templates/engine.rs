//! Per-run render environment
//!
//! Owns the handlebars registry with the built-in helpers and the helper
//! scripts of the template being generated. Built once before a run starts,
//! then shared read-only between every node of the walk.

use std::fmt;
use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{GenerationError, GenerationResult};
use crate::templates::helpers;

/// Extension of script helper files
pub const HELPER_SCRIPT_EXTENSION: &str = "rhai";

/// Handlebars registry and helpers for one generation run
pub struct RenderEnvironment {
    registry: Handlebars<'static>,
    script_helpers: Vec<String>,
}

impl RenderEnvironment {
    /// Create an environment with the built-in helpers only
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        helpers::register_builtins(&mut registry);
        Self {
            registry,
            script_helpers: Vec::new(),
        }
    }

    /// Create an environment and load the helper scripts under `folder`
    pub fn with_helpers_folder(folder: &Path) -> GenerationResult<Self> {
        let mut env = Self::new();
        env.load_helpers_folder(folder)?;
        Ok(env)
    }

    /// Register every `*.rhai` file under `folder` as a helper named after its file stem
    ///
    /// A missing folder registers nothing.
    ///
    /// # Returns
    /// Number of helpers registered
    pub fn load_helpers_folder(&mut self, folder: &Path) -> GenerationResult<usize> {
        if !folder.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = entry.map_err(|e| GenerationError::HelperLoad {
                path: folder.to_path_buf(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(HELPER_SCRIPT_EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            self.registry
                .register_script_helper_file(name, path)
                .map_err(|e| GenerationError::HelperLoad {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            debug!(helper = %name, path = %path.display(), "Registered script helper");
            self.script_helpers.push(name.to_string());
            count += 1;
        }

        Ok(count)
    }

    /// Names of the script helpers loaded so far
    pub fn script_helpers(&self) -> &[String] {
        &self.script_helpers
    }

    /// Render a template string against `data`
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> GenerationResult<String> {
        Ok(self.registry.render_template(template, data)?)
    }

    /// The underlying handlebars registry
    pub fn registry(&self) -> &Handlebars<'static> {
        &self.registry
    }
}

impl Default for RenderEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEnvironment")
            .field("script_helpers", &self.script_helpers)
            .finish()
    }
}

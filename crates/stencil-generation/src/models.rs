//! Core data models for scaffolding

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GenerationResult;
use crate::options::GenerationOptions;

/// Replacement written in place of masked parameter values
pub const MASKED_VALUE: &str = "******";

/// Definition of a template or partial parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Parameter name
    pub name: String,
    /// Whether the value is hidden in annotations and manifests
    #[serde(default)]
    pub mask: bool,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter must be provided
    #[serde(default)]
    pub required: bool,
}

/// Descriptor found at the root of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Template name
    pub name: String,
    /// Template version
    pub version: String,
    /// Parameters the template accepts
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Options for the template root directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

/// Descriptor found at the root of a partial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDescriptor {
    /// Parameters the partial accepts
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Options for the partial root directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

/// Partial being generated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialInfo {
    /// Partial name (its folder name)
    pub name: String,
    /// Parameters the partial accepts
    pub parameters: Vec<ParameterDefinition>,
}

/// Everything a renderer or merger knows about the node being generated
///
/// The serialized form (camelCase) is the data templates render against:
/// `parameters.x`, `template.name`, `partial.name`, `options.*`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    /// Resolved options for this node
    pub options: Arc<GenerationOptions>,
    /// Parameter values supplied by the user
    pub parameters: Map<String, Value>,
    /// Template being generated
    pub template: TemplateDescriptor,
    /// Partial being generated, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<PartialInfo>,
    /// Source path of the node
    pub origin_path: PathBuf,
    /// Destination path of the node
    pub target_path: PathBuf,
    /// Root of the template tree
    pub template_root: PathBuf,
}

impl GenerationContext {
    /// Create a root context with default options
    pub fn new(
        template: TemplateDescriptor,
        parameters: Map<String, Value>,
        template_root: impl Into<PathBuf>,
        target_path: impl Into<PathBuf>,
    ) -> Self {
        let template_root = template_root.into();
        Self {
            options: Arc::new(GenerationOptions::default()),
            parameters,
            template,
            partial: None,
            origin_path: template_root.clone(),
            target_path: target_path.into(),
            template_root,
        }
    }

    /// Same context, generating a partial
    pub fn with_partial(mut self, partial: PartialInfo) -> Self {
        self.partial = Some(partial);
        self
    }

    /// Same context with different options
    pub fn with_options(&self, options: impl Into<Arc<GenerationOptions>>) -> Self {
        Self {
            options: options.into(),
            ..self.clone()
        }
    }

    /// Same context, positioned at another node
    pub fn at_node(&self, origin_path: &Path, target_path: &Path) -> Self {
        Self {
            origin_path: origin_path.to_path_buf(),
            target_path: target_path.to_path_buf(),
            ..self.clone()
        }
    }

    /// Parameter definitions in scope (partial's first, then template's)
    pub fn parameter_definitions(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.partial
            .iter()
            .flat_map(|p| p.parameters.iter())
            .chain(self.template.parameters.iter())
    }

    /// Parameters with masked values hidden
    pub fn masked_parameters(&self) -> Map<String, Value> {
        let definitions: Vec<&ParameterDefinition> = self.parameter_definitions().collect();
        mask_parameters(&self.parameters, definitions)
    }

    /// Serialize into the data seen by templates
    pub fn to_render_data(&self) -> GenerationResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Replace the value of every parameter whose definition asks for masking
pub fn mask_parameters<'a>(
    parameters: &Map<String, Value>,
    definitions: impl IntoIterator<Item = &'a ParameterDefinition>,
) -> Map<String, Value> {
    let masked: Vec<&str> = definitions
        .into_iter()
        .filter(|d| d.mask)
        .map(|d| d.name.as_str())
        .collect();

    parameters
        .iter()
        .map(|(key, value)| {
            if masked.contains(&key.as_str()) {
                (key.clone(), Value::String(MASKED_VALUE.to_string()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

/// Where a template was obtained from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSourceInfo {
    /// Source kind (`localFolder`)
    pub name: String,
    /// Key used to fetch the template again
    pub key: String,
}

/// Template entry of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTemplate {
    /// Template name
    pub name: String,
    /// Template version
    pub version: String,
    /// Where the template came from
    pub source: TemplateSourceInfo,
}

/// A partial that was generated into a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    /// `<template name>/<partial name>`
    pub path: String,
    /// Parameters used, masked
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Record of what generated a target directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StencilManifest {
    /// Template the target was initialised from
    pub template: ManifestTemplate,
    /// Parameters used at init, masked
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Partials generated afterwards, in order
    #[serde(default)]
    pub partials: Vec<PartialRecord>,
}

/// What happened to one file of the template tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// Rendered, merged and written
    Written,
    /// Copied verbatim (non-text content)
    Copied,
    /// Not written (ignored, or empty target name)
    Skipped,
}

/// Outcome for a single file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    /// Source path in the template tree
    pub origin: PathBuf,
    /// Destination path, when one was computed
    pub target: Option<PathBuf>,
    /// Action taken
    pub action: FileAction,
}

/// Result of a generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Per-file outcomes, in tree order
    pub files: Vec<FileOutcome>,
    /// Whether nothing was written to disk
    pub dry_run: bool,
}

impl GenerationReport {
    /// Number of files with the given action
    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    /// Outcome for a destination path
    pub fn find_target(&self, target: &Path) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|f| f.target.as_deref() == Some(target))
    }
}

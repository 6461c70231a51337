//! Generation options and the configuration cascade
//!
//! Options are an immutable value. Every cascade step (directory sidecar,
//! in-file directive, region marker payload) builds a new value from a base
//! plus an overlay:
//!
//! - parent directory options
//! - overridden by the `options` object of the directory's sidecar descriptor
//! - overridden by `@stencil-option {...}` directives found in the file itself

use std::path::Path;

use ignore::gitignore::GitignoreBuilder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{GenerationError, GenerationResult};
use crate::merge::MergerKind;
use crate::regions;
use crate::templates::RendererKind;

/// Default template used to annotate generated content
pub const DEFAULT_ANNOTATION_TEMPLATE: &str = "{{#lineComment}}This code was generated by stencil{{/lineComment}}
{{#lineComment}}@template {{{template.name}}} (v{{{template.version}}}){{/lineComment}}
{{#if partial}}
{{#lineComment}}@partial {{{partial.name}}}{{/lineComment}}
{{/if}}
{{#each parameters}}
{{#lineComment}}@{{@key}} {{{this}}}{{/lineComment}}
{{/each}}

{{{content}}}

{{#lineComment}}end of stencil generated code{{/lineComment}}";

/// How new content is combined with existing content by the plain merger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppendStrategy {
    /// Keep existing content and add the new content after a blank line
    Append,
    /// Replace existing content with the new content
    Replace,
}

/// How arrays are combined by the structured mergers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMergeStrategy {
    /// Keep target items, merge index-aligned containers, append new items
    Combine,
    /// Source array replaces the target array
    Override,
    /// Target items followed by all source items
    Concat,
}

/// Ignore rule: a flag, or gitignore-style patterns relative to the template root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreRule {
    /// Ignore (or not) unconditionally
    Flag(bool),
    /// Ignore paths matching any of these patterns
    Patterns(Vec<String>),
}

impl Default for IgnoreRule {
    fn default() -> Self {
        IgnoreRule::Flag(false)
    }
}

/// Fully resolved options for one node of the template tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// Marker opening a region
    pub start_region_marker: String,
    /// Marker closing a region
    pub end_region_marker: String,
    /// Marker introducing an inline directive
    pub option_marker: String,
    /// Handlebars template producing a single line comment from `comment`
    pub line_comment_template: String,
    /// Renderers applied to file content, in order
    pub renderers: Vec<RendererKind>,
    /// Mergers applied to rendered content, in order
    pub mergers: Vec<MergerKind>,
    /// Ignore rule for this node
    pub ignore: IgnoreRule,
    /// Whether the plain merger annotates generated content
    pub annotate: bool,
    /// Handlebars template used for annotations
    pub annotation_template: String,
    /// Plain merger strategy
    pub append_strategy: AppendStrategy,
    /// Array strategy for structured mergers
    pub array_merge_strategy: ArrayMergeStrategy,
    /// Handlebars template for the target file name
    pub target_name: Option<String>,
    /// Name of the sidecar descriptor file
    pub descriptor_file_name: String,
    /// Folder holding partial templates
    pub partials_folder_name: String,
    /// Folder holding hooks
    pub hooks_folder_name: String,
    /// Folder holding helper scripts
    pub helpers_folder_name: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            start_region_marker: "@stencil-region".to_string(),
            end_region_marker: "@end-stencil-region".to_string(),
            option_marker: "@stencil-option".to_string(),
            line_comment_template: "# {{{comment}}}".to_string(),
            renderers: vec![RendererKind::Handlebars],
            mergers: vec![MergerKind::Region, MergerKind::Plain],
            ignore: IgnoreRule::default(),
            annotate: false,
            annotation_template: DEFAULT_ANNOTATION_TEMPLATE.to_string(),
            append_strategy: AppendStrategy::Append,
            array_merge_strategy: ArrayMergeStrategy::Combine,
            target_name: None,
            descriptor_file_name: ".stencil".to_string(),
            partials_folder_name: "_partials".to_string(),
            hooks_folder_name: "_hooks".to_string(),
            helpers_folder_name: "_helpers".to_string(),
        }
    }
}

/// Sidecar descriptor found in a template directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SidecarDescriptor {
    /// Options overriding the parent directory's options
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

/// Result of extracting directives from a file
#[derive(Debug, Clone)]
pub struct FileDirectives {
    /// Options with every directive folded in
    pub options: GenerationOptions,
    /// File content with directive lines removed
    pub content: String,
}

impl GenerationOptions {
    /// Build a new options value with the keys of `patch` replacing the current ones
    ///
    /// Keys that are not options are ignored. A value of the wrong shape is an
    /// [`GenerationError::InvalidOptions`] error.
    pub fn overlay(&self, patch: &Map<String, Value>) -> GenerationResult<Self> {
        if patch.is_empty() {
            return Ok(self.clone());
        }

        let Value::Object(mut base) = serde_json::to_value(self)? else {
            return Err(GenerationError::InvalidOptions(
                "options did not serialize to an object".to_string(),
            ));
        };
        for (key, value) in patch {
            base.insert(key.clone(), value.clone());
        }

        serde_json::from_value(Value::Object(base))
            .map_err(|e| GenerationError::InvalidOptions(e.to_string()))
    }

    /// Folder names that are never walked, whatever the cascade says
    pub fn reserved_folders(&self) -> [&str; 4] {
        [
            self.partials_folder_name.as_str(),
            self.hooks_folder_name.as_str(),
            self.helpers_folder_name.as_str(),
            ".git",
        ]
    }

    /// Check if `path` is ignored by these options
    ///
    /// # Arguments
    /// * `root` - Template root the patterns are relative to
    /// * `path` - Path of the file or directory being considered
    /// * `is_dir` - Whether `path` is a directory
    pub fn ignores(&self, root: &Path, path: &Path, is_dir: bool) -> bool {
        match &self.ignore {
            IgnoreRule::Flag(flag) => *flag,
            IgnoreRule::Patterns(patterns) => {
                let Ok(relative) = path.strip_prefix(root) else {
                    return false;
                };
                if relative.as_os_str().is_empty() {
                    return false;
                }

                let mut builder = GitignoreBuilder::new(root);
                for pattern in patterns {
                    if let Err(e) = builder.add_line(None, pattern) {
                        warn!(pattern = %pattern, "Invalid ignore pattern: {}", e);
                    }
                }
                match builder.build() {
                    Ok(gitignore) => gitignore.matched(relative, is_dir).is_ignore(),
                    Err(e) => {
                        warn!("Failed to build ignore matcher: {}", e);
                        false
                    }
                }
            }
        }
    }

    fn directive_regex(&self) -> GenerationResult<Regex> {
        let pattern = format!(
            r"(?m)^.*?{}[ \t]*(?P<json>\{{.*\}}).*(?:\n|$)",
            regex::escape(&self.option_marker)
        );
        Regex::new(&pattern).map_err(|e| GenerationError::InvalidOptions(e.to_string()))
    }
}

/// Compute the options of a directory from its parent's options
///
/// Loads the optional sidecar descriptor in `dir`; its `options` object
/// shallow-overrides `parent`.
pub async fn cascade_for_directory(
    parent: &GenerationOptions,
    dir: &Path,
) -> GenerationResult<GenerationOptions> {
    let sidecar_path = dir.join(&parent.descriptor_file_name);
    if !tokio::fs::try_exists(&sidecar_path).await? {
        return Ok(parent.clone());
    }

    let raw = tokio::fs::read_to_string(&sidecar_path).await?;
    let sidecar = parse_sidecar(&raw).map_err(|message| GenerationError::InvalidDescriptor {
        path: sidecar_path.clone(),
        message,
    })?;

    match sidecar.options {
        Some(options) => {
            debug!(path = %sidecar_path.display(), keys = options.len(), "Applying sidecar options");
            parent.overlay(&options)
        }
        None => Ok(parent.clone()),
    }
}

/// Parse sidecar descriptor text; blank text is an empty descriptor
pub fn parse_sidecar(raw: &str) -> Result<SidecarDescriptor, String> {
    if raw.trim().is_empty() {
        return Ok(SidecarDescriptor::default());
    }
    serde_json::from_str(raw).map_err(|e| e.to_string())
}

/// Fold the directives found in `content` into `options`
///
/// Directives inside regions are left untouched; the region merger applies
/// them to the region body. Directive lines outside regions are removed from
/// the returned content.
pub fn extract_from_file_content(
    options: &GenerationOptions,
    content: &str,
) -> GenerationResult<FileDirectives> {
    let directive = options.directive_regex()?;
    let regions = regions::parse(content, options);

    let mut resolved = options.clone();
    let mut stripped = String::with_capacity(content.len());
    let mut last = 0;

    for caps in directive.captures_iter(content) {
        let Some(line) = caps.get(0) else { continue };
        let inside_region = regions
            .iter()
            .any(|r| r.content_start <= line.start() && line.start() < r.content_end);
        if inside_region {
            continue;
        }

        let fragment = caps.name("json").map(|m| m.as_str()).unwrap_or_default();
        let patch = parse_directive(fragment)?;
        resolved = resolved.overlay(&patch)?;

        stripped.push_str(&content[last..line.start()]);
        last = line.end();
    }
    stripped.push_str(&content[last..]);

    Ok(FileDirectives {
        options: resolved,
        content: stripped,
    })
}

/// Remove every directive line from `content`, inside regions or not
pub fn strip_directives(options: &GenerationOptions, content: &str) -> GenerationResult<String> {
    let directive = options.directive_regex()?;
    Ok(directive.replace_all(content, "").into_owned())
}

fn parse_directive(fragment: &str) -> GenerationResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(fragment) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GenerationError::InvalidDirective {
            fragment: fragment.to_string(),
            message: "directive payload must be a JSON object".to_string(),
        }),
        Err(e) => Err(GenerationError::InvalidDirective {
            fragment: fragment.to_string(),
            message: e.to_string(),
        }),
    }
}

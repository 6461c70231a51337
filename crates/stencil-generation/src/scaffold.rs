//! Scaffolding facade: template init and partial runs

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::{GenerationError, GenerationResult};
use crate::generator::Generator;
use crate::models::{
    mask_parameters, GenerationContext, GenerationReport, ManifestTemplate, ParameterDefinition,
    PartialDescriptor, PartialInfo, PartialRecord, StencilManifest, TemplateDescriptor,
    TemplateSourceInfo,
};
use crate::options::{self, GenerationOptions};

/// Result of initialising a target from a template
#[derive(Debug, Clone)]
pub struct InitResult {
    /// Manifest describing the generation
    pub manifest: StencilManifest,
    /// Per-file outcomes
    pub report: GenerationReport,
}

/// Result of generating a partial into a target
#[derive(Debug, Clone)]
pub struct PartialResult {
    /// Entry to append to the target's manifest
    pub record: PartialRecord,
    /// Per-file outcomes
    pub report: GenerationReport,
}

/// Runs whole templates and partials
#[derive(Debug, Clone, Default)]
pub struct Scaffolder {
    options: GenerationOptions,
    dry_run: bool,
}

impl Scaffolder {
    /// Create a scaffolder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` as the base of every cascade
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Preview without writing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Generate the template at `template_root` into `target`
    pub async fn init(
        &self,
        template_root: &Path,
        descriptor: &TemplateDescriptor,
        source: TemplateSourceInfo,
        parameters: Map<String, Value>,
        target: &Path,
    ) -> GenerationResult<InitResult> {
        check_required(&descriptor.parameters, &parameters)?;
        info!(template = %descriptor.name, version = %descriptor.version, "Initialising target");

        let generator = Generator::for_template(template_root, &self.options)?.dry_run(self.dry_run);
        let context = GenerationContext::new(
            descriptor.clone(),
            parameters.clone(),
            template_root,
            target,
        )
        .with_options(self.options.clone());
        let report = generator.generate(&context).await?;

        let manifest = StencilManifest {
            template: ManifestTemplate {
                name: descriptor.name.clone(),
                version: descriptor.version.clone(),
                source,
            },
            parameters: mask_parameters(&parameters, &descriptor.parameters),
            partials: Vec::new(),
        };

        Ok(InitResult { manifest, report })
    }

    /// Generate the partial `name` of the template at `template_root` into `target`
    ///
    /// The partial sees the options of the template root, then those of its
    /// own folder. Helpers come from the template root.
    pub async fn run_partial(
        &self,
        template_root: &Path,
        descriptor: &TemplateDescriptor,
        name: &str,
        parameters: Map<String, Value>,
        target: &Path,
    ) -> GenerationResult<PartialResult> {
        let partial_root = template_root
            .join(&self.options.partials_folder_name)
            .join(name);
        if !tokio::fs::try_exists(&partial_root).await? {
            return Err(GenerationError::TemplateNotFound(partial_root));
        }

        let partial_descriptor = load_partial_descriptor(&partial_root, &self.options).await?;
        check_required(&partial_descriptor.parameters, &parameters)?;
        info!(template = %descriptor.name, partial = %name, "Generating partial");

        let root_options = options::cascade_for_directory(&self.options, template_root).await?;
        let generator = Generator::for_template(template_root, &root_options)?.dry_run(self.dry_run);
        let context = GenerationContext::new(
            descriptor.clone(),
            parameters.clone(),
            template_root,
            target,
        )
        .with_options(root_options)
        .with_partial(PartialInfo {
            name: name.to_string(),
            parameters: partial_descriptor.parameters.clone(),
        })
        .at_node(&partial_root, target);
        let report = generator.generate(&context).await?;

        let record = PartialRecord {
            path: format!("{}/{}", descriptor.name, name),
            parameters: mask_parameters(&parameters, &partial_descriptor.parameters),
        };

        Ok(PartialResult { record, report })
    }
}

async fn load_partial_descriptor(
    partial_root: &Path,
    options: &GenerationOptions,
) -> GenerationResult<PartialDescriptor> {
    let path = partial_root.join(&options.descriptor_file_name);
    if !tokio::fs::try_exists(&path).await? {
        return Ok(PartialDescriptor::default());
    }

    let raw = tokio::fs::read_to_string(&path).await?;
    if raw.trim().is_empty() {
        return Ok(PartialDescriptor::default());
    }
    serde_json::from_str(&raw).map_err(|e| GenerationError::InvalidDescriptor {
        path,
        message: e.to_string(),
    })
}

/// Fail on the first required parameter missing from `parameters`
pub fn check_required(
    definitions: &[ParameterDefinition],
    parameters: &Map<String, Value>,
) -> GenerationResult<()> {
    match definitions
        .iter()
        .find(|d| d.required && !parameters.contains_key(&d.name))
    {
        Some(missing) => Err(GenerationError::MissingParameter(missing.name.clone())),
        None => Ok(()),
    }
}

// Initialize a target directory from a template

use std::path::PathBuf;

use stencil_generation::Scaffolder;
use stencil_storage::{LocalFolderSource, ManifestStore, TemplateSource};
use tracing::debug;

use super::{parse_parameter_flags, Command};
use crate::{error::CliResult, output};

/// Generate a template into a target directory and record the manifest
pub struct InitCommand {
    pub source: String,
    pub target: PathBuf,
    pub parameters: Vec<String>,
    pub dry_run: bool,
}

impl InitCommand {
    pub fn new(source: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            parameters: Vec::new(),
            dry_run: false,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[async_trait::async_trait]
impl Command for InitCommand {
    async fn execute(&self) -> CliResult<()> {
        // Validate flags before touching the file system
        let parameters = parse_parameter_flags(&self.parameters)?;

        let fetched = LocalFolderSource::new().get_template(&self.source, None)?;
        debug!(path = %fetched.path.display(), "Working copy ready");

        let result = Scaffolder::new()
            .dry_run(self.dry_run)
            .init(
                &fetched.path,
                &fetched.descriptor,
                fetched.source.clone(),
                parameters,
                &self.target,
            )
            .await?;
        output::print_report(&result.report);

        if self.dry_run {
            output::print_info("Dry run: manifest not written");
            return Ok(());
        }

        let store = ManifestStore::new();
        if store.init(&self.target, &result.manifest)? {
            output::print_info(&format!(
                "Manifest written to {}",
                store.manifest_path(&self.target).display()
            ));
        }
        output::print_success(&format!(
            "Initialized {} v{} in {}",
            fetched.descriptor.name,
            fetched.descriptor.version,
            self.target.display()
        ));
        Ok(())
    }
}

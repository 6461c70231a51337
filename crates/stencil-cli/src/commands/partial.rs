// Generate a partial of the template a target was initialized from

use std::path::PathBuf;

use stencil_generation::Scaffolder;
use stencil_storage::{LocalFolderSource, ManifestStore, TemplateSource};
use tracing::debug;

use super::{parse_parameter_flags, Command};
use crate::{error::CliResult, output};

/// Run a partial against an initialized target and record it in the manifest
pub struct PartialCommand {
    pub name: String,
    pub target: PathBuf,
    pub parameters: Vec<String>,
    pub dry_run: bool,
}

impl PartialCommand {
    pub fn new(name: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
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
impl Command for PartialCommand {
    async fn execute(&self) -> CliResult<()> {
        let parameters = parse_parameter_flags(&self.parameters)?;

        let store = ManifestStore::new();
        let manifest = store.load(&self.target)?;
        debug!(
            template = %manifest.template.name,
            source = %manifest.template.source.key,
            "Loaded manifest"
        );

        let fetched = LocalFolderSource::new().get_template(&manifest.template.source.key, None)?;
        let result = Scaffolder::new()
            .dry_run(self.dry_run)
            .run_partial(
                &fetched.path,
                &fetched.descriptor,
                &self.name,
                parameters,
                &self.target,
            )
            .await?;
        output::print_report(&result.report);

        if self.dry_run {
            output::print_info("Dry run: manifest not updated");
            return Ok(());
        }

        store.record_partial(&self.target, result.record.path.clone(), result.record.parameters)?;
        output::print_success(&format!(
            "Generated partial {} in {}",
            result.record.path,
            self.target.display()
        ));
        Ok(())
    }
}

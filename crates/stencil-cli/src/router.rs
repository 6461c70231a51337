// Command routing and dispatch

use crate::commands::*;
use crate::error::CliResult;
use clap::{Parser, Subcommand};

/// Stencil - scaffold projects from templates
#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(bin_name = "stencil")]
#[command(about = "Scaffold projects from templates and merge regenerated output")]
#[command(
    long_about = "Stencil renders a template folder into a target directory.\n\nRe-running a template merges into what is already there: named regions are\nupdated in place, JSON and YAML documents are deep-merged, other files are\nappended or replaced.\n\nQuick start:\n  stencil init ./templates/service ./billing -p name:billing\n  stencil partial model ./billing -p model:invoice"
)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preview changes without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a directory from a template
    #[command(about = "Generate a template into a directory and record its manifest")]
    Init {
        /// Template folder
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Target directory (default: current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        path: String,

        /// Template parameter as name:value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "NAME:VALUE")]
        params: Vec<String>,
    },

    /// Generate a partial into an initialized directory
    #[command(about = "Generate a partial of the template a directory was initialized from")]
    Partial {
        /// Partial name (folder under the template's partials folder)
        #[arg(value_name = "NAME")]
        name: String,

        /// Target directory (default: current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        path: String,

        /// Partial parameter as name:value (repeatable)
        #[arg(short = 'p', long = "param", value_name = "NAME:VALUE")]
        params: Vec<String>,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        // Initialize logging based on CLI flags
        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Init {
                source,
                path,
                params,
            } => {
                let cmd = InitCommand::new(source.clone(), path.clone())
                    .with_parameters(params.clone())
                    .with_dry_run(cli.dry_run);
                cmd.execute().await
            }
            Commands::Partial { name, path, params } => {
                let cmd = PartialCommand::new(name.clone(), path.clone())
                    .with_parameters(params.clone())
                    .with_dry_run(cli.dry_run);
                cmd.execute().await
            }
        }
    }
}

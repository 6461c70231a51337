// Command handlers for the stencil CLI

pub mod init;
pub mod params;
pub mod partial;

pub use init::InitCommand;
pub use params::parse_parameter_flags;
pub use partial::PartialCommand;

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

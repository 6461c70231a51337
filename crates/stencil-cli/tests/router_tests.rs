//! Router and command parsing tests
//!
//! Tests for CLI command parsing using clap.

use clap::Parser;
use stencil_cli::router::{Cli, Commands};

#[test]
fn test_parse_init_command() {
    let cli = Cli::parse_from(["stencil", "init", "./templates/service"]);
    assert!(matches!(cli.command, Commands::Init { .. }));
    assert!(!cli.dry_run);
}

#[test]
fn test_parse_init_with_path_and_params() {
    let cli = Cli::parse_from([
        "stencil",
        "init",
        "./templates/service",
        "./billing",
        "-p",
        "name:billing",
        "--param",
        "port:8080",
    ]);
    if let Commands::Init {
        source,
        path,
        params,
    } = cli.command
    {
        assert_eq!(source, "./templates/service");
        assert_eq!(path, "./billing");
        assert_eq!(params, vec!["name:billing", "port:8080"]);
    } else {
        panic!("Expected Init command");
    }
}

#[test]
fn test_parse_partial_command() {
    let cli = Cli::parse_from(["stencil", "partial", "model", "-p", "model:invoice"]);
    if let Commands::Partial { name, path, params } = cli.command {
        assert_eq!(name, "model");
        assert_eq!(path, ".");
        assert_eq!(params, vec!["model:invoice"]);
    } else {
        panic!("Expected Partial command");
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from(["stencil", "init", "./tpl", "--dry-run", "-v"]);
    assert!(cli.dry_run);
    assert!(cli.verbose);
    assert!(!cli.quiet);
}

#[test]
fn test_global_flags_before_subcommand() {
    let cli = Cli::parse_from(["stencil", "--quiet", "partial", "model"]);
    assert!(cli.quiet);
}

#[test]
fn test_init_requires_source() {
    assert!(Cli::try_parse_from(["stencil", "init"]).is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["stencil"]).is_err());
}

#[test]
fn test_unknown_subcommand() {
    assert!(Cli::try_parse_from(["stencil", "chat"]).is_err());
}

// Output formatting and styling

use colored::Colorize;
use stencil_generation::{FileAction, FileOutcome, GenerationReport};

use crate::logging::VerbosityLevel;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format a key-value pair
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.use_colors {
            format!("  {}: {}", key.bold(), value)
        } else {
            format!("  {}: {}", key, value)
        }
    }

    /// Format one file of a generation report
    pub fn file_outcome(&self, outcome: &FileOutcome) -> String {
        let path = outcome
            .target
            .as_deref()
            .unwrap_or(outcome.origin.as_path())
            .display()
            .to_string();
        let label = match outcome.action {
            FileAction::Written => "write",
            FileAction::Copied => "copy",
            FileAction::Skipped => "skip",
        };

        if !self.use_colors {
            return format!("  {:<5} {}", label, path);
        }
        let label = match outcome.action {
            FileAction::Written => label.green(),
            FileAction::Copied => label.cyan(),
            FileAction::Skipped => label.dimmed(),
        };
        format!("  {:<5} {}", label, path)
    }

    /// One-line summary of a generation report
    pub fn report_summary(&self, report: &GenerationReport) -> String {
        let summary = format!(
            "{} written, {} copied, {} skipped",
            report.count(FileAction::Written),
            report.count(FileAction::Copied),
            report.count(FileAction::Skipped)
        );
        if report.dry_run {
            format!("{} (dry run, nothing written)", summary)
        } else {
            summary
        }
    }
}

/// Print formatted output
pub fn print_success(msg: &str) {
    if VerbosityLevel::Normal.should_output() {
        let style = OutputStyle::default();
        println!("{}", style.success(msg));
    }
}

pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

pub fn print_warning(msg: &str) {
    if VerbosityLevel::Normal.should_output() {
        let style = OutputStyle::default();
        println!("{}", style.warning(msg));
    }
}

pub fn print_info(msg: &str) {
    if VerbosityLevel::Normal.should_output() {
        let style = OutputStyle::default();
        println!("{}", style.info(msg));
    }
}

/// Print a generation report; per-file lines only in verbose mode
pub fn print_report(report: &GenerationReport) {
    let style = OutputStyle::default();
    if VerbosityLevel::Verbose.should_output() {
        for outcome in &report.files {
            println!("{}", style.file_outcome(outcome));
        }
    }
    if VerbosityLevel::Normal.should_output() {
        println!("{}", style.info(&style.report_summary(report)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report(dry_run: bool) -> GenerationReport {
        let outcome = |name: &str, action| FileOutcome {
            origin: PathBuf::from("tpl").join(name),
            target: Some(PathBuf::from("out").join(name)),
            action,
        };
        GenerationReport {
            files: vec![
                outcome("a.txt", FileAction::Written),
                outcome("b.txt", FileAction::Written),
                outcome("logo.png", FileAction::Copied),
                FileOutcome {
                    origin: PathBuf::from("tpl/skip.txt"),
                    target: None,
                    action: FileAction::Skipped,
                },
            ],
            dry_run,
        }
    }

    #[test]
    fn test_output_style_without_colors() {
        let style = OutputStyle { use_colors: false };
        assert_eq!(style.success("test"), "✓ test");
        assert_eq!(style.error("test"), "✗ test");
        assert_eq!(style.warning("test"), "⚠ test");
        assert_eq!(style.info("test"), "ℹ test");
    }

    #[test]
    fn test_report_summary() {
        let style = OutputStyle { use_colors: false };
        assert_eq!(
            style.report_summary(&report(false)),
            "2 written, 1 copied, 1 skipped"
        );
        assert!(style.report_summary(&report(true)).ends_with("(dry run, nothing written)"));
    }

    #[test]
    fn test_file_outcome_falls_back_to_origin() {
        let style = OutputStyle { use_colors: false };
        let report = report(false);
        assert_eq!(
            style.file_outcome(&report.files[0]),
            format!("  write {}", PathBuf::from("out/a.txt").display())
        );
        assert_eq!(
            style.file_outcome(&report.files[3]),
            format!("  skip  {}", PathBuf::from("tpl/skip.txt").display())
        );
    }
}

//! Merge pipeline
//!
//! Mergers combine freshly rendered content with the content already present
//! at the destination. Each merger returns the merged result plus the part of
//! the new content it declined (`unmerged`), which is handed to the next
//! merger of the pipeline.

pub mod pipeline;
pub mod plain;
pub mod region;
pub mod structured;

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GenerationResult;
use crate::models::GenerationContext;
use crate::templates::RenderEnvironment;

pub use pipeline::MergePipeline;
pub use plain::PlainMerger;
pub use region::RegionMerger;
pub use structured::{JsonMerger, YamlMerger};

/// Result of a merge step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Merged destination content
    pub result: String,
    /// New content left for the next merger
    pub unmerged: String,
}

impl MergeOutcome {
    /// Outcome that consumed all of the new content
    pub fn merged(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            unmerged: String::new(),
        }
    }
}

/// A stage of the merge pipeline
pub trait Merger: Send + Sync {
    /// Merge `new_text` into `existing`
    fn merge(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<MergeOutcome>;
}

/// Merger tags accepted in the `mergers` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergerKind {
    /// [`RegionMerger`] with a [`PlainMerger`] for region bodies
    Region,
    /// [`PlainMerger`]
    Plain,
    /// [`JsonMerger`]
    Json,
    /// [`YamlMerger`]
    Yaml,
}

impl MergerKind {
    /// Build the merger for this tag
    pub fn build(self, env: &Arc<RenderEnvironment>) -> Arc<dyn Merger> {
        match self {
            MergerKind::Region => {
                let inner: Arc<dyn Merger> = Arc::new(PlainMerger::new(Arc::clone(env)));
                Arc::new(RegionMerger::new(inner))
            }
            MergerKind::Plain => Arc::new(PlainMerger::new(Arc::clone(env))),
            MergerKind::Json => Arc::new(JsonMerger),
            MergerKind::Yaml => Arc::new(YamlMerger),
        }
    }
}

fn blank_lines_regex() -> Option<&'static Regex> {
    static BLANK_LINES: OnceLock<Option<Regex>> = OnceLock::new();
    BLANK_LINES
        .get_or_init(|| Regex::new(r"(?m)^(?:[ \t]*\r?\n){2,}").ok())
        .as_ref()
}

/// Collapse every run of two or more blank lines into a single blank line
pub fn collapse_blank_lines(text: &str) -> String {
    match blank_lines_regex() {
        Some(re) => re.replace_all(text, "\n").into_owned(),
        None => text.to_string(),
    }
}

//! Ordered chain of mergers

use std::sync::Arc;

use tracing::warn;

use crate::error::GenerationResult;
use crate::merge::{collapse_blank_lines, MergeOutcome, Merger, MergerKind};
use crate::models::GenerationContext;
use crate::templates::RenderEnvironment;

/// Runs mergers in order, feeding each one the content the previous one declined
///
/// A pipeline is itself a [`Merger`], so it can serve as the inner merger of a
/// [`RegionMerger`](crate::merge::RegionMerger).
#[derive(Clone, Default)]
pub struct MergePipeline {
    mergers: Vec<Arc<dyn Merger>>,
}

impl MergePipeline {
    /// Create a pipeline from merger instances
    pub fn new(mergers: Vec<Arc<dyn Merger>>) -> Self {
        Self { mergers }
    }

    /// Create a pipeline from the `mergers` option
    pub fn from_kinds(kinds: &[MergerKind], env: &Arc<RenderEnvironment>) -> Self {
        Self::new(kinds.iter().map(|kind| kind.build(env)).collect())
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.mergers.len()
    }

    /// Whether the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.mergers.is_empty()
    }

    /// Merge and return the final destination content
    ///
    /// Blank-line runs are collapsed and the result trimmed. New content that
    /// no merger accepted is dropped with a warning.
    pub fn run(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<String> {
        let outcome = self.merge(context, new_text, existing)?;
        if !outcome.unmerged.trim().is_empty() {
            warn!(
                target_path = %context.target_path.display(),
                bytes = outcome.unmerged.len(),
                "Content left unmerged after the last merger"
            );
        }
        Ok(collapse_blank_lines(&outcome.result).trim().to_string())
    }
}

impl Merger for MergePipeline {
    fn merge(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<MergeOutcome> {
        let mut outcome = MergeOutcome {
            result: existing.to_string(),
            unmerged: new_text.to_string(),
        };
        for merger in &self.mergers {
            outcome = merger.merge(context, &outcome.unmerged, &outcome.result)?;
        }
        Ok(outcome)
    }
}

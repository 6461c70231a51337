//! Region merger: merges named regions of the new content into the
//! regions of the same name in the existing content

use std::sync::Arc;

use tracing::debug;

use crate::error::GenerationResult;
use crate::merge::{collapse_blank_lines, MergeOutcome, Merger};
use crate::models::GenerationContext;
use crate::options::{self, AppendStrategy};
use crate::regions;

/// Merges region by region, delegating region bodies to an inner merger
///
/// Text outside regions is returned as `unmerged` for the next merger.
#[derive(Clone)]
pub struct RegionMerger {
    inner: Arc<dyn Merger>,
}

impl RegionMerger {
    /// Create a region merger using `inner` for region bodies
    pub fn new(inner: Arc<dyn Merger>) -> Self {
        Self { inner }
    }
}

impl Merger for RegionMerger {
    fn merge(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<MergeOutcome> {
        let opts = &context.options;
        let mut pending = new_text.to_string();
        let mut result = existing.to_string();

        let mut source_regions = regions::parse(&pending, opts);
        if source_regions.is_empty() {
            return Ok(MergeOutcome {
                result,
                unmerged: pending,
            });
        }

        while let Some(region) = source_regions.first() {
            let destination_regions = regions::parse(&result, opts);
            let matched = regions::find(&destination_regions, &region.name);

            let region_options = opts.overlay(&region.config)?;
            let directives = options::extract_from_file_content(&region_options, &region.content)?;
            let body = options::strip_directives(&directives.options, &directives.content)?;
            let child = context.with_options(directives.options);

            let destination_body = matched.map(|r| r.content.as_str()).unwrap_or_default();
            let merged = self.inner.merge(&child, &body, destination_body)?;

            result = match matched {
                Some(destination) => {
                    debug!(region = %region.name, "Merging into existing region");
                    regions::replace_region(&result, destination, &merged.result)
                }
                None => {
                    debug!(region = %region.name, "Adding new region");
                    let block = region.to_block(&merged.result);
                    match child.options.append_strategy {
                        AppendStrategy::Replace => block,
                        AppendStrategy::Append if result.trim().is_empty() => block,
                        AppendStrategy::Append => format!("{}\n\n{}", result.trim_end(), block),
                    }
                }
            };

            pending = regions::remove_region(&pending, region);
            source_regions = regions::parse(&pending, opts);
        }

        Ok(MergeOutcome {
            result: collapse_blank_lines(&result).trim().to_string(),
            unmerged: collapse_blank_lines(&pending).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::PlainMerger;
    use crate::models::TemplateDescriptor;
    use crate::options::GenerationOptions;
    use crate::templates::RenderEnvironment;
    use serde_json::Map;

    fn context() -> GenerationContext {
        GenerationContext::new(
            TemplateDescriptor {
                name: "svc".to_string(),
                version: "1.0.0".to_string(),
                parameters: Vec::new(),
                options: None,
            },
            Map::new(),
            "/tpl",
            "/out",
        )
    }

    fn merger() -> RegionMerger {
        RegionMerger::new(Arc::new(PlainMerger::new(Arc::new(RenderEnvironment::new()))))
    }

    #[test]
    fn test_no_regions_passes_everything_on() {
        let outcome = merger().merge(&context(), "plain text", "old").unwrap();
        assert_eq!(outcome.result, "old");
        assert_eq!(outcome.unmerged, "plain text");
    }

    #[test]
    fn test_matched_region_is_merged_in_place() {
        let existing = "before\n# @stencil-region {\"name\": \"deps\"}\nserde\n# @end-stencil-region\nafter";
        let new_text = "# @stencil-region {\"name\": \"deps\"}\ntokio\n# @end-stencil-region";

        let outcome = merger().merge(&context(), new_text, existing).unwrap();

        assert_eq!(
            outcome.result,
            "before\n# @stencil-region {\"name\": \"deps\"}\nserde\n\ntokio\n# @end-stencil-region\nafter"
        );
        assert_eq!(outcome.unmerged, "");
    }

    #[test]
    fn test_unmatched_region_is_appended() {
        let existing = "existing line";
        let new_text = "# @stencil-region {\"name\": \"extra\"}\nbody\n# @end-stencil-region\ntrailing";

        let outcome = merger().merge(&context(), new_text, existing).unwrap();

        assert_eq!(
            outcome.result,
            "existing line\n\n# @stencil-region {\"name\": \"extra\"}\nbody\n# @end-stencil-region"
        );
        assert_eq!(outcome.unmerged, "trailing");
    }

    #[test]
    fn test_inline_config_applies_to_region_body() {
        let existing = "# @stencil-region {\"name\": \"a\"}\nold body\n# @end-stencil-region";
        let new_text = "# @stencil-region {\"name\": \"a\", \"appendStrategy\": \"replace\"}\nnew body\n# @end-stencil-region";

        let outcome = merger().merge(&context(), new_text, existing).unwrap();

        assert_eq!(
            outcome.result,
            "# @stencil-region {\"name\": \"a\"}\nnew body\n# @end-stencil-region"
        );
    }

    #[test]
    fn test_directive_in_region_body_is_applied_and_stripped() {
        let existing = "# @stencil-region {\"name\": \"a\"}\nold body\n# @end-stencil-region";
        let new_text = "# @stencil-region {\"name\": \"a\"}\n# @stencil-option {\"appendStrategy\": \"replace\"}\nnew body\n# @end-stencil-region";

        let outcome = merger().merge(&context(), new_text, existing).unwrap();

        assert!(outcome.result.contains("new body"));
        assert!(!outcome.result.contains("old body"));
        assert!(!outcome.result.contains("@stencil-option"));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let new_text = "# @stencil-region {\"name\": \"a\"}\nx\n# @end-stencil-region\n# @stencil-region {\"name\": \"b\"}\ny\n# @end-stencil-region";

        let first = merger().merge(&context(), new_text, "").unwrap().result;
        let second = merger().merge(&context(), new_text, &first).unwrap().result;

        assert_eq!(first, second);
        assert_eq!(regions::parse(&second, &GenerationOptions::default()).len(), 2);
    }

    #[test]
    fn test_duplicate_names_merge_into_first_match() {
        let existing = "# @stencil-region {\"name\": \"a\"}\none\n# @end-stencil-region\n# @stencil-region {\"name\": \"a\"}\ntwo\n# @end-stencil-region";
        let new_text = "# @stencil-region {\"name\": \"a\"}\nthree\n# @end-stencil-region";

        let outcome = merger().merge(&context(), new_text, existing).unwrap();
        let merged = regions::parse(&outcome.result, &GenerationOptions::default());

        assert_eq!(merged[0].content, "one\n\nthree\n");
        assert_eq!(merged[1].content, "two\n");
    }

    #[test]
    fn test_malformed_directive_in_region_fails() {
        let new_text = "# @stencil-region {\"name\": \"a\"}\n# @stencil-option {oops}\nx\n# @end-stencil-region";
        let result = merger().merge(&context(), new_text, "");
        assert!(result.is_err());
    }
}

//! Property-based tests for region merging
//!
//! Regions are matched by name, re-running a merge changes nothing, and text
//! outside the matched region is never disturbed.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Map;
use stencil_generation::{
    regions, GenerationContext, GenerationOptions, MergePipeline, MergerKind, RenderEnvironment,
    TemplateDescriptor,
};

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

fn pipeline() -> MergePipeline {
    MergePipeline::from_kinds(
        &[MergerKind::Region, MergerKind::Plain],
        &Arc::new(RenderEnvironment::new()),
    )
}

fn block(name: &str, body: &[String]) -> String {
    format!(
        "# @stencil-region {{\"name\": \"{}\"}}\n{}\n# @end-stencil-region",
        name,
        body.join("\n")
    )
}

/// Strategy for plain, non-blank lines without markers
fn line_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
}

/// Strategy for a few uniquely named regions with bodies
fn regions_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::btree_map(
        "[a-z]{1,6}",
        prop::collection::vec(line_strategy(), 1..4),
        1..4,
    )
    .prop_map(|map| map.into_iter().collect())
}

proptest! {
    /// Property: merging the same new content twice equals merging it once
    #[test]
    fn prop_merge_is_idempotent(
        regions in regions_strategy(),
        header in prop::collection::vec(line_strategy(), 0..3),
        existing in prop::collection::vec(line_strategy(), 0..3),
    ) {
        let mut new_text = header.join("\n");
        for (name, body) in &regions {
            new_text.push('\n');
            new_text.push_str(&block(name, body));
        }
        let existing = existing.join("\n");

        let first = pipeline().run(&context(), &new_text, &existing).unwrap();
        let second = pipeline().run(&context(), &new_text, &first).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Property: every region of the new content ends up in the result exactly once
    #[test]
    fn prop_every_region_lands_once(regions in regions_strategy()) {
        let new_text: Vec<String> = regions.iter().map(|(n, b)| block(n, b)).collect();
        let result = pipeline().run(&context(), &new_text.join("\n"), "").unwrap();
        let parsed = regions::parse(&result, &GenerationOptions::default());

        prop_assert_eq!(parsed.len(), regions.len());
        for (name, body) in &regions {
            let found = regions::find(&parsed, name).unwrap();
            prop_assert_eq!(found.content.trim_end(), body.join("\n"));
        }
    }

    /// Property: splicing a region leaves the text around it intact
    #[test]
    fn prop_outside_text_is_preserved(
        before in prop::collection::vec(line_strategy(), 1..4),
        after in prop::collection::vec(line_strategy(), 1..4),
        old_body in prop::collection::vec(line_strategy(), 1..3),
        new_body in prop::collection::vec(line_strategy(), 1..3),
    ) {
        let existing = format!("{}\n{}\n{}", before.join("\n"), block("r", &old_body), after.join("\n"));
        let result = pipeline().run(&context(), &block("r", &new_body), &existing).unwrap();

        let before_text = format!("{}\n", before.join("\n"));
        let after_text = format!("# @end-stencil-region\n{}", after.join("\n"));
        prop_assert!(result.starts_with(&before_text));
        prop_assert!(result.ends_with(&after_text));
    }
}

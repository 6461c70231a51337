//! Plain merger: whole-text append or replace, with optional annotation

use std::sync::Arc;

use serde_json::Value;

use crate::error::GenerationResult;
use crate::merge::{MergeOutcome, Merger};
use crate::models::GenerationContext;
use crate::options::AppendStrategy;
use crate::templates::RenderEnvironment;

/// Appends new content to existing content, or replaces it
#[derive(Debug, Clone)]
pub struct PlainMerger {
    env: Arc<RenderEnvironment>,
}

impl PlainMerger {
    /// Create a plain merger rendering annotations with `env`
    pub fn new(env: Arc<RenderEnvironment>) -> Self {
        Self { env }
    }

    /// Wrap `content` with the annotation template when annotation is enabled
    ///
    /// Masked parameters are hidden from the annotation.
    pub fn annotate(&self, context: &GenerationContext, content: &str) -> GenerationResult<String> {
        if !context.options.annotate {
            return Ok(content.to_string());
        }

        let mut data = context.to_render_data()?;
        if let Value::Object(map) = &mut data {
            map.insert(
                "parameters".to_string(),
                Value::Object(context.masked_parameters()),
            );
            map.insert("content".to_string(), Value::String(content.to_string()));
        }

        let annotated = self.env.render(&context.options.annotation_template, &data)?;
        Ok(annotated.trim().to_string())
    }
}

impl Merger for PlainMerger {
    fn merge(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<MergeOutcome> {
        if new_text.trim().is_empty() {
            return Ok(MergeOutcome::merged(existing));
        }

        let content = self.annotate(context, new_text)?;
        let result = match context.options.append_strategy {
            AppendStrategy::Replace => content,
            AppendStrategy::Append => {
                if existing.trim().is_empty() {
                    content
                } else if contains_blocks(existing, &content) {
                    // Already appended by a previous run
                    existing.to_string()
                } else {
                    format!("{}\n\n{}", existing.trim_end(), content)
                }
            }
        };

        Ok(MergeOutcome::merged(result))
    }
}

/// Split `text` into blocks of consecutive non-blank lines
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Whether the blocks of `content` appear, whole and in order, as a run of
/// blocks of `existing`
fn contains_blocks(existing: &str, content: &str) -> bool {
    let needle = blocks(content);
    if needle.is_empty() {
        return false;
    }
    blocks(existing)
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParameterDefinition, TemplateDescriptor};
    use crate::options::GenerationOptions;
    use serde_json::{json, Map};

    fn context(options: GenerationOptions) -> GenerationContext {
        let mut parameters = Map::new();
        parameters.insert("name".to_string(), json!("billing"));
        parameters.insert("token".to_string(), json!("s3cr3t"));
        GenerationContext::new(
            TemplateDescriptor {
                name: "svc".to_string(),
                version: "1.0.0".to_string(),
                parameters: vec![ParameterDefinition {
                    name: "token".to_string(),
                    mask: true,
                    description: None,
                    required: false,
                }],
                options: None,
            },
            parameters,
            "/tpl",
            "/out",
        )
        .with_options(options)
    }

    fn merger() -> PlainMerger {
        PlainMerger::new(Arc::new(RenderEnvironment::new()))
    }

    #[test]
    fn test_blank_new_text_keeps_existing() {
        let outcome = merger()
            .merge(&context(GenerationOptions::default()), " \n", "old")
            .unwrap();
        assert_eq!(outcome, MergeOutcome::merged("old"));
    }

    #[test]
    fn test_append_to_empty() {
        let outcome = merger()
            .merge(&context(GenerationOptions::default()), "new", "")
            .unwrap();
        assert_eq!(outcome.result, "new");
        assert!(outcome.unmerged.is_empty());
    }

    #[test]
    fn test_append_after_blank_line() {
        let outcome = merger()
            .merge(&context(GenerationOptions::default()), "new", "old\n")
            .unwrap();
        assert_eq!(outcome.result, "old\n\nnew");
    }

    #[test]
    fn test_append_is_idempotent() {
        let ctx = context(GenerationOptions::default());
        let first = merger().merge(&ctx, "line a\nline b", "old").unwrap().result;
        let second = merger().merge(&ctx, "line a\nline b", &first).unwrap().result;
        assert_eq!(first, second);
    }

    #[test]
    fn test_append_when_new_text_is_part_of_a_line() {
        let ctx = context(GenerationOptions::default());
        let outcome = merger().merge(&ctx, "import x", "import xyz").unwrap();
        assert_eq!(outcome.result, "import xyz\n\nimport x");

        let outcome = merger().merge(&ctx, "target/", "/target/debug").unwrap();
        assert_eq!(outcome.result, "/target/debug\n\ntarget/");
    }

    #[test]
    fn test_append_when_new_text_is_part_of_a_block() {
        let ctx = context(GenerationOptions::default());
        let outcome = merger().merge(&ctx, "b", "a\nb\nc").unwrap();
        assert_eq!(outcome.result, "a\nb\nc\n\nb");
    }

    #[test]
    fn test_skip_when_blocks_already_present() {
        let ctx = context(GenerationOptions::default());
        let existing = "head\n\n\nline a\nline b\n\nmore\n\ntail";
        let outcome = merger().merge(&ctx, "line a\nline b\n\nmore", existing).unwrap();
        assert_eq!(outcome.result, existing);
    }

    #[test]
    fn test_annotated_append_is_idempotent() {
        let options = GenerationOptions {
            annotate: true,
            ..Default::default()
        };
        let ctx = context(options);
        let first = merger().merge(&ctx, "x = 1", "user = 0").unwrap().result;
        let second = merger().merge(&ctx, "x = 1", &first).unwrap().result;
        assert!(first.starts_with("user = 0\n\n# This code was generated by stencil"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_replace_strategy() {
        let options = GenerationOptions {
            append_strategy: AppendStrategy::Replace,
            ..Default::default()
        };
        let outcome = merger().merge(&context(options), "new", "old").unwrap();
        assert_eq!(outcome.result, "new");
    }

    #[test]
    fn test_annotation_masks_parameters() {
        let options = GenerationOptions {
            annotate: true,
            line_comment_template: "// {{{comment}}}".to_string(),
            ..Default::default()
        };
        let outcome = merger().merge(&context(options), "fn main() {}", "").unwrap();

        assert!(outcome.result.starts_with("// This code was generated by stencil"));
        assert!(outcome.result.contains("// @template svc (v1.0.0)"));
        assert!(outcome.result.contains("// @name billing"));
        assert!(outcome.result.contains("// @token ******"));
        assert!(!outcome.result.contains("s3cr3t"));
        assert!(outcome.result.contains("fn main() {}"));
        assert!(outcome.result.ends_with("// end of stencil generated code"));
    }

    #[test]
    fn test_custom_annotation_template() {
        let options = GenerationOptions {
            annotate: true,
            annotation_template: "[{{template.name}}] {{{content}}}".to_string(),
            ..Default::default()
        };
        let outcome = merger().merge(&context(options), "x = 1", "").unwrap();
        assert_eq!(outcome.result, "[svc] x = 1");
    }
}

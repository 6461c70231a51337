//! Structured-data mergers: deep merge of JSON and YAML documents
//!
//! Objects merge key by key. Arrays follow `arrayMergeStrategy`. Any other
//! pair of values resolves to the new value. Empty text on either side is an
//! empty object; malformed text is an error.

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{GenerationError, GenerationResult};
use crate::merge::{MergeOutcome, Merger};
use crate::models::GenerationContext;
use crate::options::ArrayMergeStrategy;

/// Combine two arrays according to `strategy`
///
/// With [`ArrayMergeStrategy::Combine`], a source item is merged into the
/// target item at the same index when `mergeable` holds for the pair;
/// otherwise it is appended unless an equal item is already present.
pub fn merge_arrays<T, M, F>(
    mut target: Vec<T>,
    source: Vec<T>,
    strategy: ArrayMergeStrategy,
    mergeable: M,
    mut merge_item: F,
) -> Vec<T>
where
    T: Clone + PartialEq,
    M: Fn(&T, &T) -> bool,
    F: FnMut(T, T) -> T,
{
    match strategy {
        ArrayMergeStrategy::Override => source,
        ArrayMergeStrategy::Concat => {
            target.extend(source);
            target
        }
        ArrayMergeStrategy::Combine => {
            let aligned = target.len();
            for (index, item) in source.into_iter().enumerate() {
                if index < aligned && mergeable(&target[index], &item) {
                    let current = target[index].clone();
                    target[index] = merge_item(current, item);
                } else if !target.contains(&item) {
                    target.push(item);
                }
            }
            target
        }
    }
}

fn json_mergeable(a: &JsonValue, b: &JsonValue) -> bool {
    matches!(
        (a, b),
        (JsonValue::Object(_), JsonValue::Object(_)) | (JsonValue::Array(_), JsonValue::Array(_))
    )
}

/// Deep merge `source` into `target`
pub fn merge_json(target: JsonValue, source: JsonValue, strategy: ArrayMergeStrategy) -> JsonValue {
    match (target, source) {
        (JsonValue::Object(mut target), JsonValue::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(slot) => {
                        let current = std::mem::take(slot);
                        *slot = merge_json(current, value, strategy);
                    }
                    None => {
                        target.insert(key, value);
                    }
                }
            }
            JsonValue::Object(target)
        }
        (JsonValue::Array(target), JsonValue::Array(source)) => JsonValue::Array(merge_arrays(
            target,
            source,
            strategy,
            json_mergeable,
            |a, b| merge_json(a, b, strategy),
        )),
        (_, source) => source,
    }
}

fn yaml_mergeable(a: &YamlValue, b: &YamlValue) -> bool {
    matches!(
        (a, b),
        (YamlValue::Mapping(_), YamlValue::Mapping(_))
            | (YamlValue::Sequence(_), YamlValue::Sequence(_))
    )
}

/// Deep merge `source` into `target`
pub fn merge_yaml(target: YamlValue, source: YamlValue, strategy: ArrayMergeStrategy) -> YamlValue {
    match (target, source) {
        (YamlValue::Mapping(mut target), YamlValue::Mapping(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(slot) => {
                        let current = std::mem::replace(slot, YamlValue::Null);
                        *slot = merge_yaml(current, value, strategy);
                    }
                    None => {
                        target.insert(key, value);
                    }
                }
            }
            YamlValue::Mapping(target)
        }
        (YamlValue::Sequence(target), YamlValue::Sequence(source)) => {
            YamlValue::Sequence(merge_arrays(
                target,
                source,
                strategy,
                yaml_mergeable,
                |a, b| merge_yaml(a, b, strategy),
            ))
        }
        (_, source) => source,
    }
}

fn parse_json(text: &str) -> GenerationResult<JsonValue> {
    if text.trim().is_empty() {
        return Ok(JsonValue::Object(serde_json::Map::new()));
    }
    serde_json::from_str(text).map_err(|e| GenerationError::StructuredParse {
        format: "JSON",
        message: e.to_string(),
    })
}

fn parse_yaml(text: &str) -> GenerationResult<YamlValue> {
    if text.trim().is_empty() {
        return Ok(YamlValue::Mapping(serde_yaml::Mapping::new()));
    }
    serde_yaml::from_str(text).map_err(|e| GenerationError::StructuredParse {
        format: "YAML",
        message: e.to_string(),
    })
}

/// Deep-merges JSON documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMerger;

impl Merger for JsonMerger {
    fn merge(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<MergeOutcome> {
        let source = parse_json(new_text)?;
        let target = parse_json(existing)?;
        let merged = merge_json(target, source, context.options.array_merge_strategy);
        Ok(MergeOutcome::merged(serde_json::to_string_pretty(&merged)?))
    }
}

/// Deep-merges YAML documents
///
/// Comments of the existing document are not preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMerger;

impl Merger for YamlMerger {
    fn merge(
        &self,
        context: &GenerationContext,
        new_text: &str,
        existing: &str,
    ) -> GenerationResult<MergeOutcome> {
        let source = parse_yaml(new_text)?;
        let target = parse_yaml(existing)?;
        let merged = merge_yaml(target, source, context.options.array_merge_strategy);
        let text = serde_yaml::to_string(&merged).map_err(|e| GenerationError::StructuredParse {
            format: "YAML",
            message: e.to_string(),
        })?;
        Ok(MergeOutcome::merged(text))
    }
}

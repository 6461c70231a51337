#![warn(missing_docs)]

//! Generation and merge engine for stencil
//!
//! Renders a tree of template files and merges the output into an existing
//! destination tree. Merging is content-aware: named regions are merged by
//! name across runs, JSON and YAML documents are deep-merged, and everything
//! else is appended or replaced. Options cascade from directory sidecars down
//! to in-file directives.

pub mod error;
pub mod generator;
pub mod merge;
pub mod models;
pub mod options;
pub mod output_writer;
pub mod regions;
pub mod scaffold;
pub mod templates;

// Re-export public API
pub use error::{GenerationError, GenerationResult};
pub use generator::{Generator, NodeKind, TemplateNode};
pub use merge::{
    collapse_blank_lines, JsonMerger, MergeOutcome, MergePipeline, Merger, MergerKind,
    PlainMerger, RegionMerger, YamlMerger,
};
pub use models::{
    mask_parameters, FileAction, FileOutcome, GenerationContext, GenerationReport,
    ManifestTemplate, ParameterDefinition, PartialDescriptor, PartialInfo, PartialRecord,
    StencilManifest, TemplateDescriptor, TemplateSourceInfo, MASKED_VALUE,
};
pub use options::{
    cascade_for_directory, extract_from_file_content, strip_directives, AppendStrategy,
    ArrayMergeStrategy, FileDirectives, GenerationOptions, IgnoreRule,
};
pub use output_writer::{OutputWriter, OutputWriterConfig};
pub use regions::{Region, TagSpan};
pub use scaffold::{check_required, InitResult, PartialResult, Scaffolder};
pub use templates::{
    HandlebarsRenderer, IdentityRenderer, RenderEnvironment, RenderOutput, RenderPipeline,
    Renderer, RendererKind,
};

//! Rendering: handlebars environment, built-in helpers and the renderer pipeline

pub mod engine;
pub mod helpers;
pub mod pipeline;

// Re-export public API
pub use engine::RenderEnvironment;
pub use helpers::apply_case;
pub use pipeline::{
    HandlebarsRenderer, IdentityRenderer, RenderOutput, RenderPipeline, Renderer, RendererKind,
};

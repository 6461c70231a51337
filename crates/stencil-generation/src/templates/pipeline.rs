//! Rendering pipeline
//!
//! An ordered chain of renderers. Each renderer receives the context and the
//! trimmed output of the previous one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GenerationResult;
use crate::models::GenerationContext;
use crate::templates::engine::RenderEnvironment;

/// Output of one renderer
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Context passed to the next renderer
    pub context: GenerationContext,
    /// Rendered text
    pub result: String,
}

/// A stage of the rendering pipeline
pub trait Renderer: Send + Sync {
    /// Transform `input` using `context`
    fn process(&self, context: GenerationContext, input: &str) -> GenerationResult<RenderOutput>;
}

/// Passes its input through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRenderer;

impl Renderer for IdentityRenderer {
    fn process(&self, context: GenerationContext, input: &str) -> GenerationResult<RenderOutput> {
        Ok(RenderOutput {
            context,
            result: input.to_string(),
        })
    }
}

/// Renders its input as a handlebars template against the serialized context
#[derive(Debug, Clone)]
pub struct HandlebarsRenderer {
    env: Arc<RenderEnvironment>,
}

impl HandlebarsRenderer {
    /// Create a renderer using `env`
    pub fn new(env: Arc<RenderEnvironment>) -> Self {
        Self { env }
    }
}

impl Renderer for HandlebarsRenderer {
    fn process(&self, context: GenerationContext, input: &str) -> GenerationResult<RenderOutput> {
        let data = context.to_render_data()?;
        let result = self.env.render(input, &data)?;
        Ok(RenderOutput { context, result })
    }
}

/// Renderer tags accepted in the `renderers` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// [`HandlebarsRenderer`]
    Handlebars,
    /// [`IdentityRenderer`]
    Identity,
}

impl RendererKind {
    /// Build the renderer for this tag
    pub fn build(self, env: &Arc<RenderEnvironment>) -> Arc<dyn Renderer> {
        match self {
            RendererKind::Handlebars => Arc::new(HandlebarsRenderer::new(Arc::clone(env))),
            RendererKind::Identity => Arc::new(IdentityRenderer),
        }
    }
}

/// Ordered chain of renderers
#[derive(Clone, Default)]
pub struct RenderPipeline {
    renderers: Vec<Arc<dyn Renderer>>,
}

impl RenderPipeline {
    /// Create a pipeline from renderer instances
    pub fn new(renderers: Vec<Arc<dyn Renderer>>) -> Self {
        Self { renderers }
    }

    /// Create a pipeline from the `renderers` option
    pub fn from_kinds(kinds: &[RendererKind], env: &Arc<RenderEnvironment>) -> Self {
        Self::new(kinds.iter().map(|kind| kind.build(env)).collect())
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Run every renderer in order
    ///
    /// An empty pipeline returns the input unchanged.
    pub fn run(&self, context: GenerationContext, input: &str) -> GenerationResult<String> {
        let mut context = context;
        let mut result = input.to_string();
        for renderer in &self.renderers {
            let output = renderer.process(context, &result)?;
            context = output.context;
            result = output.result.trim().to_string();
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TemplateDescriptor;
    use serde_json::{json, Map};

    fn context() -> GenerationContext {
        let mut parameters = Map::new();
        parameters.insert("name".to_string(), json!("Billing Service"));
        GenerationContext::new(
            TemplateDescriptor {
                name: "svc".to_string(),
                version: "0.1.0".to_string(),
                parameters: Vec::new(),
                options: None,
            },
            parameters,
            "/tpl",
            "/out",
        )
    }

    #[test]
    fn test_handlebars_pipeline() {
        let env = Arc::new(RenderEnvironment::new());
        let pipeline = RenderPipeline::from_kinds(&[RendererKind::Handlebars], &env);

        let result = pipeline
            .run(context(), "\n  name = {{case \"snake\" parameters.name}} ({{template.name}})\n\n")
            .unwrap();
        assert_eq!(result, "name = billing_service (svc)");
    }

    #[test]
    fn test_identity_pipeline_only_trims() {
        let env = Arc::new(RenderEnvironment::new());
        let pipeline = RenderPipeline::from_kinds(&[RendererKind::Identity], &env);
        assert_eq!(pipeline.run(context(), "  {{x}}\n").unwrap(), "{{x}}");
    }

    #[test]
    fn test_empty_pipeline_returns_input() {
        let pipeline = RenderPipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run(context(), " a ").unwrap(), " a ");
    }

    #[test]
    fn test_stages_run_in_order() {
        let env = Arc::new(RenderEnvironment::new());
        // First pass renders `echo`, second pass renders what it produced
        let pipeline = RenderPipeline::from_kinds(
            &[RendererKind::Handlebars, RendererKind::Handlebars],
            &env,
        );
        let result = pipeline
            .run(context(), "{{echo \"{{parameters.name}}\"}}")
            .unwrap();
        assert_eq!(result, "Billing Service");
    }

    #[test]
    fn test_renderer_kind_tags() {
        let kinds: Vec<RendererKind> = serde_json::from_value(json!(["handlebars", "identity"])).unwrap();
        assert_eq!(kinds, vec![RendererKind::Handlebars, RendererKind::Identity]);
    }
}

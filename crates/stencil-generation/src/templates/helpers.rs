//! Built-in handlebars helpers
//!
//! - `case`: `{{case "kebab" parameters.name}}`
//! - `lineComment`: `{{#lineComment}}text{{/lineComment}}`, wrapped with `options.lineCommentTemplate`
//! - `echo`: `{{echo "{{literal}}"}}`, emits its argument as is

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperDef, HelperResult, Output,
    RenderContext, Renderable, StringOutput,
};
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToTitleCase,
    ToUpperCamelCase,
};
use serde_json::{json, Value};

/// Line comment template used when the data carries none
pub const FALLBACK_LINE_COMMENT_TEMPLATE: &str = "# {{{comment}}}";

/// Apply a named case style; unknown styles leave the value unchanged
pub fn apply_case(style: &str, value: &str) -> String {
    match style.to_ascii_lowercase().as_str() {
        "camel" | "camelcase" => value.to_lower_camel_case(),
        "pascal" | "pascalcase" => value.to_upper_camel_case(),
        "snake" | "snakecase" => value.to_snake_case(),
        "kebab" | "kebabcase" | "param" => value.to_kebab_case(),
        "constant" | "upper" | "uppercase" => value.to_shouty_snake_case(),
        "lower" | "lowercase" => value.to_lowercase(),
        "title" | "titlecase" => value.to_title_case(),
        _ => value.to_string(),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

handlebars_helper!(case_helper: |style: str, value: Json| apply_case(style, &display(value)));

handlebars_helper!(echo_helper: |value: Json| display(value));

/// Block helper rendering its body as a single line comment
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCommentHelper;

impl HelperDef for LineCommentHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let Some(body) = h.template() else {
            return Ok(());
        };

        let mut buffer = StringOutput::new();
        body.render(r, ctx, rc, &mut buffer)?;
        let comment = buffer.into_string()?;

        let template = ctx
            .data()
            .get("options")
            .and_then(|o| o.get("lineCommentTemplate"))
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_LINE_COMMENT_TEMPLATE);

        let rendered = r.render_template(template, &json!({ "comment": comment }))?;
        out.write(&rendered)?;
        Ok(())
    }
}

/// Register every built-in helper into `registry`
pub fn register_builtins(registry: &mut Handlebars<'static>) {
    registry.register_helper("case", Box::new(case_helper));
    registry.register_helper("lineComment", Box::new(LineCommentHelper));
    registry.register_helper("echo", Box::new(echo_helper));
}

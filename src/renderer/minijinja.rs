use std::io::{Cursor, Read};

use log::debug;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use super::{filters::*, BaseTemplates, FunctionSet, TemplateAwareFunctions};
use crate::{error::Result, renderer::interface::TemplateRenderer};

/// Name used for bodies rendered without an explicit template name.
const ANONYMOUS_TEMPLATE: &str = "template";

/// Creates an environment with the settings and filters shared by every render.
///
/// Generated files are source code, not HTML: auto-escaping is disabled and
/// the trailing newline of a template is kept.
pub(crate) fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);

    env.add_filter("camel_case", to_camel_case);
    env.add_filter("kebab_case", to_kebab_case);
    env.add_filter("pascal_case", to_pascal_case);
    env.add_filter("screaming_snake_case", to_screaming_snake_case);
    env.add_filter("snake_case", to_snake_case);
    env.add_filter("table_case", to_table_case);
    env.add_filter("train_case", to_train_case);
    env.add_filter("plural", to_plural);
    env.add_filter("singular", to_singular);
    env.add_filter("foreign_key", to_foreign_key);
    env.add_filter("regex", regex_filter);
    env
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// Environment used when no common templates are supplied
    env: Environment<'static>,
    undefined_behavior: UndefinedBehavior,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer instance with default environment.
    pub fn new() -> Self {
        Self { env: new_environment(), undefined_behavior: UndefinedBehavior::Lenient }
    }

    /// Controls how references to undefined values behave.
    ///
    /// With [`UndefinedBehavior::Strict`] printing or iterating an undefined
    /// value fails the render instead of producing empty output.
    pub fn with_undefined_behavior(mut self, behavior: UndefinedBehavior) -> Self {
        self.undefined_behavior = behavior;
        self
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template_name: Option<&str>,
        body: &str,
        context: &serde_json::Value,
        functions: &FunctionSet,
        template_aware: &TemplateAwareFunctions,
        base: Option<&BaseTemplates>,
    ) -> Result<Box<dyn Read>> {
        // Every render gets its own environment so nothing leaks between units.
        let mut env = match base {
            Some(base) if !base.is_empty() => base.fork(),
            _ => self.env.clone(),
        };
        env.set_undefined_behavior(self.undefined_behavior);

        functions.register(&mut env);
        template_aware.bind(&mut env);

        let name = template_name.unwrap_or(ANONYMOUS_TEMPLATE).replace('\\', "/");
        debug!("Rendering template: {name}");
        env.add_template_owned(name.clone(), body.to_string())?;
        let rendered = env.get_template(&name)?.render(context)?;

        Ok(Box::new(Cursor::new(rendered.into_bytes())))
    }
}

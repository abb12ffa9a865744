use std::io::Read;

use super::{BaseTemplates, FunctionSet, TemplateAwareFunctions};
use crate::error::Result;

/// Trait for template rendering engines.
///
/// The pipeline receives its renderer through the builder, so tests and
/// alternative engines plug in here without touching the orchestration loop.
pub trait TemplateRenderer {
    /// Renders a template body with the given context.
    ///
    /// # Arguments
    /// * `template_name` - Optional name for the template (used in error messages)
    /// * `body` - Template source to render
    /// * `context` - Context variables for rendering
    /// * `functions` - Context-free functions available to the template
    /// * `template_aware` - Functions bound to the template instance being rendered
    /// * `base` - Optional collection of named common templates
    ///
    /// # Returns
    /// * `Result<Box<dyn Read>>` - Single-pass stream over the rendered bytes
    fn render(
        &self,
        template_name: Option<&str>,
        body: &str,
        context: &serde_json::Value,
        functions: &FunctionSet,
        template_aware: &TemplateAwareFunctions,
        base: Option<&BaseTemplates>,
    ) -> Result<Box<dyn Read>>;
}

//! Template rendering engine
//!
//! The module is structured as:
//! - `interface`: Core trait definitions for template rendering
//! - `minijinja`: MiniJinja-based implementation of the template renderer
//! - `functions`: Context-free and template-aware functions
//! - `base`: Common templates shared by every render of a run
//! - `filters`: Custom filters for template processing

pub mod base;
pub mod filters;
pub mod functions;
pub mod interface;
pub mod minijinja;

// Re-export the main types and traits for convenience
pub use base::BaseTemplates;
pub use functions::{
    FunctionSet, IncludeFunction, TemplateAwareFunction, TemplateAwareFunctions,
    TemplateHandle, TplFunction,
};
pub use interface::TemplateRenderer;
pub use self::minijinja::MiniJinjaRenderer;

/// Convenience function to create the default template renderer
pub fn new_renderer() -> impl TemplateRenderer {
    MiniJinjaRenderer::new()
}

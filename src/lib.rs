//! Template-driven code generation.
//!
//! A [`pipeline::Pipeline`] pulls templates from a
//! [`template::TemplateProvider`], renders each one against a JSON context and
//! hands the result to a chain of [`collectors::Collector`]s that filter,
//! split and finally write the generated files.

/// Collector chain receiving rendered templates.
pub mod collectors;

/// Generator configuration files.
pub mod config;

/// Crate-wide constants.
pub mod constants;

/// Assembly of the rendering context.
pub mod context;

/// Defines custom error types.
pub mod error;

/// Extension traits for standard library types.
pub mod ext;

/// Path predicates.
pub mod filter;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// Core orchestration of a generation run.
pub mod pipeline;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Templates and their providers.
pub mod template;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineBuilder};

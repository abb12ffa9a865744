use serde_json::Value;

use super::{DataPreprocessor, Pipeline};
use crate::{
    collectors::Collector,
    error::{Error, Result},
    renderer::{FunctionSet, MiniJinjaRenderer, TemplateAwareFunctions, TemplateRenderer},
    template::TemplateProvider,
};

/// Assembles a [`Pipeline`].
///
/// A template provider, a collector and a non-empty function set are
/// required; everything else is optional. The renderer defaults to
/// [`MiniJinjaRenderer`].
#[derive(Default)]
pub struct PipelineBuilder {
    collector: Option<Box<dyn Collector>>,
    data_preprocessor: Option<DataPreprocessor>,
    functions: FunctionSet,
    template_aware_functions: TemplateAwareFunctions,
    template_provider: Option<Box<dyn TemplateProvider>>,
    shared_templates_provider: Option<Box<dyn TemplateProvider>>,
    renderer: Option<Box<dyn TemplateRenderer>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Result<Pipeline> {
        if self.functions.is_empty() {
            return Err(Error::PipelineBuildError(
                "no functions specified in the context".to_string(),
            ));
        }
        let template_provider = self.template_provider.ok_or_else(|| {
            Error::PipelineBuildError("no template provider specified".to_string())
        })?;
        let collector = self.collector.ok_or_else(|| {
            Error::PipelineBuildError("no collector specified".to_string())
        })?;

        Ok(Pipeline {
            data_preprocessor: self.data_preprocessor,
            functions: self.functions,
            template_aware_functions: self.template_aware_functions,
            collector,
            template_provider,
            shared_templates_provider: self.shared_templates_provider,
            renderer: self.renderer.unwrap_or_else(|| Box::new(MiniJinjaRenderer::new())),
        })
    }

    /// Head of the collector chain.
    pub fn with_collector(mut self, collector: impl Collector + 'static) -> Self {
        self.collector = Some(Box::new(collector));
        self
    }

    /// Hook applied to the context before anything is rendered.
    pub fn with_data_preprocessor<F>(mut self, preprocessor: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + 'static,
    {
        self.data_preprocessor = Some(Box::new(preprocessor));
        self
    }

    pub fn with_functions(mut self, functions: FunctionSet) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_template_aware_functions(mut self, functions: TemplateAwareFunctions) -> Self {
        self.template_aware_functions = functions;
        self
    }

    /// Provider of named common templates, drained once before the main loop.
    pub fn with_shared_templates_provider(
        mut self,
        provider: impl TemplateProvider + 'static,
    ) -> Self {
        self.shared_templates_provider = Some(Box::new(provider));
        self
    }

    pub fn with_template_provider(mut self, provider: impl TemplateProvider + 'static) -> Self {
        self.template_provider = Some(Box::new(provider));
        self
    }

    pub fn with_renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }
}

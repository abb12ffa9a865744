//! Orchestration of a generation run
//!
//! - `builder`: assembles a [`Pipeline`] from its collaborators

pub mod builder;

pub use builder::PipelineBuilder;

use log::{debug, info};
use serde_json::Value;

use crate::{
    collectors::Collector,
    error::{Error, Result},
    ioutils::{read_bytes, read_from},
    renderer::{BaseTemplates, FunctionSet, TemplateAwareFunctions, TemplateRenderer},
    template::{Template, TemplateProvider},
};

/// Transforms the context before the first template is rendered.
pub type DataPreprocessor = Box<dyn Fn(Value) -> Result<Value>>;

/// Drives templates from a provider through the renderer into the collector chain.
///
/// Templates are handled strictly one at a time, in provider order. Any error
/// stops the run and is returned unchanged; the collectors are then not
/// notified of completion.
pub struct Pipeline {
    data_preprocessor: Option<DataPreprocessor>,
    functions: FunctionSet,
    template_aware_functions: TemplateAwareFunctions,
    collector: Box<dyn Collector>,
    template_provider: Box<dyn TemplateProvider>,
    shared_templates_provider: Option<Box<dyn TemplateProvider>>,
    renderer: Box<dyn TemplateRenderer>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Runs the pipeline against `data`.
    ///
    /// Providers are consumed by the run, so a pipeline is meant to be
    /// processed once.
    pub fn process(&mut self, data: Value) -> Result<()> {
        let data = match &self.data_preprocessor {
            Some(preprocessor) => preprocessor(data)?,
            None => data,
        };

        // Common templates are compiled once and shared by every render.
        let base_templates = self.load_common_templates()?;

        let mut processed = 0usize;
        while self.process_next(&data, base_templates.as_ref())? {
            processed += 1;
        }
        info!("Processed {processed} template(s)");

        self.collector.on_pipeline_completed()
    }

    fn load_common_templates(&mut self) -> Result<Option<BaseTemplates>> {
        let Some(provider) = self.shared_templates_provider.as_mut() else {
            return Ok(None);
        };

        let mut base_templates = BaseTemplates::new();
        while let Some(template) = provider.next_template()? {
            let Template { name, path, reader } = template;
            let name = match name {
                Some(name) if !name.is_empty() => name,
                _ => return Err(Error::MissingTemplateName { path }),
            };

            info!("Loading common template: {name}");
            let source = read_from(reader)?;
            base_templates.add(&name, source)?;
        }

        Ok(Some(base_templates))
    }

    /// Renders and collects the next template; `false` once the provider is exhausted.
    ///
    /// A body that is not valid UTF-8 skips the renderer and reaches the
    /// collectors byte for byte.
    fn process_next(
        &mut self,
        data: &Value,
        base_templates: Option<&BaseTemplates>,
    ) -> Result<bool> {
        let Some(template) = self.template_provider.next_template()? else {
            return Ok(false);
        };

        let Template { name, path, reader } = template;
        debug!("Processing template: {path}");
        let body = match String::from_utf8(read_bytes(reader)?) {
            Ok(body) => body,
            Err(err) => {
                // Binary assets are copied, not rendered.
                debug!("Passing through non-UTF-8 template: {path}");
                let template = Template::from_bytes(path, err.into_bytes()).with_name(name);
                self.collector.collect(template)?;
                return Ok(true);
            }
        };

        let rendered = self.renderer.render(
            Some(&path),
            &body,
            data,
            &self.functions,
            &self.template_aware_functions,
            base_templates,
        )?;

        self.collector.collect(Template { name, path, reader: rendered })?;
        Ok(true)
    }
}

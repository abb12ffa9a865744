use log::debug;

use super::{BaseCollector, Collector};
use crate::{error::Result, filter::Filter, template::Template};

/// Forwards templates accepted by its filter and silently drops the rest.
pub struct FilterCollector {
    filter: Box<dyn Filter>,
    base: BaseCollector,
}

impl FilterCollector {
    pub fn new(filter: impl Filter + 'static, next: Option<Box<dyn Collector>>) -> Self {
        Self { filter: Box::new(filter), base: BaseCollector::new(next) }
    }
}

impl Collector for FilterCollector {
    fn collect(&mut self, template: Template) -> Result<()> {
        if self.filter.accept(&template.path) {
            return self.base.forward(template);
        }
        debug!("Filtered out template: {}", template.path);
        Ok(())
    }

    fn on_pipeline_completed(&mut self) -> Result<()> {
        self.base.complete()
    }
}

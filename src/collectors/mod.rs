//! Collector chain receiving rendered templates.
//!
//! Every link implements [`Collector`] and optionally owns the next link.
//! A link without successor turns forwarding into a successful no-op.
//!
//! - `filter`: drops templates rejected by a path predicate
//! - `splitter`: explodes multi-file templates into one template per file
//! - `file_writer`: persists templates below an output directory
//! - `memory`: buffers templates in memory

pub mod file_writer;
pub mod filter;
pub mod memory;
pub mod splitter;

pub use file_writer::{FileWriterCollector, FileWriterOptions};
pub use filter::FilterCollector;
pub use memory::{CollectedTemplate, MemoryCollector, MemoryCollectorHandle};
pub use splitter::SplitterCollector;

use crate::{error::Result, template::Template};

/// A stage of the collector chain.
pub trait Collector {
    /// Consumes one rendered template.
    fn collect(&mut self, template: Template) -> Result<()>;

    /// Called once after the last template of a successful run.
    fn on_pipeline_completed(&mut self) -> Result<()>;
}

impl<C: Collector + ?Sized> Collector for Box<C> {
    fn collect(&mut self, template: Template) -> Result<()> {
        (**self).collect(template)
    }

    fn on_pipeline_completed(&mut self) -> Result<()> {
        (**self).on_pipeline_completed()
    }
}

/// Optional successor shared by every link of the chain.
#[derive(Default)]
pub(crate) struct BaseCollector {
    next: Option<Box<dyn Collector>>,
}

impl BaseCollector {
    pub(crate) fn new(next: Option<Box<dyn Collector>>) -> Self {
        Self { next }
    }

    pub(crate) fn forward(&mut self, template: Template) -> Result<()> {
        match self.next.as_mut() {
            Some(next) => next.collect(template),
            None => Ok(()),
        }
    }

    pub(crate) fn complete(&mut self) -> Result<()> {
        match self.next.as_mut() {
            Some(next) => next.on_pipeline_completed(),
            None => Ok(()),
        }
    }
}
